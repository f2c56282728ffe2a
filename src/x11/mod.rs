//! XCB backend
//!
//! Talks to the X server through x11rb, decodes core protocol events into
//! [`Event`](crate::Event)s and keeps the EWMH window state in sync.

pub mod atoms;
pub mod connection;
pub mod decoder;
pub mod keyboard;
pub mod state;
pub mod transport;
mod window;

pub use atoms::AtomTable;
pub use connection::Connection;
pub use decoder::EventDecoder;
pub use keyboard::{KeyboardMapper, key_for_keysym};
pub use state::{StateAction, StateSynchronizer};
pub use transport::{KeyboardMapping, Transport, X11Transport};
