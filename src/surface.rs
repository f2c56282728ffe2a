//! Graphics surfaces
//!
//! crosswin does not link a graphics API. A caller that owns a Vulkan (or
//! other) instance implements [`SurfaceFactory`] and gets the native window
//! handle through [`Connection::create_surface`](crate::Connection::create_surface).

use crate::window::NativeWindow;

/// Instance extensions a Vulkan instance needs before it can present to an
/// XCB window.
pub const REQUIRED_VULKAN_EXTENSIONS: [&str; 2] = ["VK_KHR_surface", "VK_KHR_xcb_surface"];

/// Failure reported by the graphics API, carrying its raw result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("surface creation failed with code {code}")]
pub struct SurfaceError {
    pub code: i32,
}

/// Binds a native window to a presentable surface of some graphics API.
pub trait SurfaceFactory {
    type Instance;
    type Surface;

    fn create_surface(
        &self,
        window: NativeWindow,
        instance: &Self::Instance,
    ) -> Result<Self::Surface, SurfaceError>;
}
