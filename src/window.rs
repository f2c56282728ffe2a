//! Window Module
//!
//! Platform-independent window record. Every getter reads the cached value;
//! the backend keeps the cache in step with the server as notifications
//! arrive.

use std::path::{Path, PathBuf};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Window size in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when both dimensions lie inside `[min, max]`.
    pub fn fits_within(self, min: Size, max: Size) -> bool {
        (min.width..=max.width).contains(&self.width)
            && (min.height..=max.height).contains(&self.height)
    }

    /// Clamp each dimension down to `max`.
    pub fn clamp_to(self, max: Size) -> Self {
        Self {
            width: self.width.min(max.width),
            height: self.height.min(max.height),
        }
    }
}

/// Window position relative to the root window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Native window handle as handed out by the windowing server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeWindow(pub u32);

bitflags! {
    /// Extended window state, as advertised by the window manager.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct WindowState: u16 {
        const MODAL             = 1 << 0;
        const STICKY            = 1 << 1;
        const MAXIMIZED_VERT    = 1 << 2;
        const MAXIMIZED_HORZ    = 1 << 3;
        const SHADED            = 1 << 4;
        const SKIP_TASKBAR      = 1 << 5;
        const SKIP_PAGER        = 1 << 6;
        const HIDDEN            = 1 << 7;
        const FULLSCREEN        = 1 << 8;
        const ABOVE             = 1 << 9;
        const BELOW             = 1 << 10;
        const DEMANDS_ATTENTION = 1 << 11;
        const FOCUSED           = 1 << 12;

        // Composite only, has no bit of its own.
        const MAXIMIZED = Self::MAXIMIZED_VERT.bits() | Self::MAXIMIZED_HORZ.bits();
    }
}

impl WindowState {
    /// Both maximized bits are set
    pub fn is_maximized(&self) -> bool {
        self.contains(Self::MAXIMIZED)
    }

    /// Parse a config-style name such as `maximized_vert`.
    pub fn from_config_name(name: &str) -> Option<Self> {
        Self::from_name(&name.trim().to_ascii_uppercase())
    }
}

bitflags! {
    /// Operations the window manager allows on a window.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct ActionPermissions: u16 {
        const MOVE           = 1 << 0;
        const RESIZE         = 1 << 1;
        const MINIMIZE       = 1 << 2;
        const SHADE          = 1 << 3;
        const STICK          = 1 << 4;
        const MAXIMIZE_HORZ  = 1 << 5;
        const MAXIMIZE_VERT  = 1 << 6;
        const FULLSCREEN     = 1 << 7;
        const CHANGE_DESKTOP = 1 << 8;
        const CLOSE          = 1 << 9;
        const ABOVE          = 1 << 10;
        const BELOW          = 1 << 11;
    }
}

/// Functional window type hint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    Desktop,
    Dock,
    Toolbar,
    Menu,
    Utility,
    Splash,
    Dialog,
    #[default]
    Normal,
}

/// Cached view of one native window.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    native: NativeWindow,
    title: String,
    icon_path: Option<PathBuf>,
    size: Size,
    min_size: Size,
    max_size: Size,
    position: Position,
    border_width: u32,
    state: WindowState,
    /// Last absolute cursor position seen in a motion event
    cursor: Position,
}

impl Window {
    /// Fresh record for a window that was just created. `size` is clamped to
    /// `max_size`; the minimum starts at zero.
    pub(crate) fn new(
        native: NativeWindow,
        title: impl Into<String>,
        size: Size,
        position: Position,
        max_size: Size,
    ) -> Self {
        Self {
            native,
            title: title.into(),
            icon_path: None,
            size: size.clamp_to(max_size),
            min_size: Size::default(),
            max_size,
            position,
            border_width: 0,
            state: WindowState::empty(),
            cursor: Position::default(),
        }
    }

    pub fn native(&self) -> NativeWindow {
        self.native
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon_path(&self) -> Option<&Path> {
        self.icon_path.as_deref()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    pub fn max_size(&self) -> Size {
        self.max_size
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn border_width(&self) -> u32 {
        self.border_width
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Record the icon location. Loading and uploading the image is left to
    /// the caller.
    pub fn set_icon_path(&mut self, path: impl Into<PathBuf>) {
        self.icon_path = Some(path.into());
    }

    pub(crate) fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub(crate) fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub(crate) fn set_min_size(&mut self, size: Size) {
        self.min_size = size;
    }

    pub(crate) fn set_max_size(&mut self, size: Size) {
        self.max_size = size;
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn set_border_width(&mut self, width: u32) {
        self.border_width = width;
    }

    pub(crate) fn set_state(&mut self, state: WindowState) {
        self.state = state;
    }

    /// Store a new absolute cursor position and return the delta from the
    /// previous one.
    pub(crate) fn move_cursor(&mut self, to: Position) -> (i32, i32) {
        let delta = (to.x - self.cursor.x, to.y - self.cursor.y);
        self.cursor = to;
        delta
    }
}
