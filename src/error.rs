//! Error Module
//!
//! Crate-wide error type and result alias.

use x11rb::errors::{ConnectError, ConnectionError, ReplyError, ReplyOrIdError};

use crate::registry::WindowId;
use crate::window::Size;

/// Result type returned by every fallible crosswin operation.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to connect to the X server")]
    Connect(#[from] ConnectError),

    #[error("X11 connection error")]
    Connection(#[from] ConnectionError),

    #[error("X11 request failed")]
    Reply(#[from] ReplyError),

    #[error("X11 request or id allocation failed")]
    ReplyOrId(#[from] ReplyOrIdError),

    #[error("failed to intern atom {0}")]
    AtomUnavailable(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("size {requested:?} is outside [{min:?}, {max:?}]")]
    OutOfBounds { requested: Size, min: Size, max: Size },

    #[error("window registry is full ({capacity} windows)")]
    RegistryFull { capacity: usize },

    #[error("no live window in slot {0}")]
    UnknownWindow(WindowId),

    #[error("{what}: count {count} exceeds capacity {capacity}")]
    CapacityExceeded {
        what: &'static str,
        count: usize,
        capacity: usize,
    },

    #[error(transparent)]
    Surface(#[from] crate::surface::SurfaceError),

    #[error("connection is closed")]
    Closed,
}

impl Error {
    /// Errors that leave the connection unusable: the caller is expected to
    /// shut the process down.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::AtomUnavailable(_))
    }
}
