//! crosswin
//!
//! Window creation, window state and input events behind one platform
//! independent API. The XCB backend lives in [`x11`].

pub mod config;
pub mod error;
pub mod event;
pub mod keys;
pub mod registry;
pub mod surface;
pub mod window;
pub mod x11;

pub use error::{Error, Result};
pub use event::{Event, EventKind, EventType};
pub use keys::Key;
pub use registry::{MAX_WINDOWS, WindowId, WindowRegistry};
pub use surface::{REQUIRED_VULKAN_EXTENSIONS, SurfaceError, SurfaceFactory};
pub use window::{
    ActionPermissions, NativeWindow, Position, Size, Window, WindowState, WindowType,
};
pub use x11::Connection;
