//! Events Module
//!
//! The unified event model. Backends decode their native notifications into
//! an [`Event`] that the caller owns and reuses between polls.

use bitflags::bitflags;
use strum::EnumDiscriminants;

use crate::error::{Error, Result};
use crate::keys::Key;
use crate::registry::WindowId;
use crate::window::WindowState;

/// Maximum number of simultaneous touch points in one event
pub const TOUCH_COUNT_MAX: usize = 32;
/// Maximum number of analog axes reported by one gamepad event
pub const GAMEPAD_AXES_COUNT_MAX: usize = 64;
/// Maximum number of buttons reported by one gamepad event
pub const GAMEPAD_BUTTON_COUNT_MAX: usize = 64;

/// Press/release state of a key or button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ButtonState {
    #[default]
    Released,
    Pressed,
}

/// Modifier keys held while an input event was generated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModifierState {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub caps_lock: bool,
    pub num_lock: bool,
    pub meta: bool,
}

bitflags! {
    /// Mouse buttons held during an input event
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct MouseButtons: u8 {
        const LEFT    = 1 << 0;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BUTTON4 = 1 << 3;
        const BUTTON5 = 1 << 4;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// One contact in a touch event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchPoint {
    pub id: usize,
    pub x: u32,
    pub y: u32,
    pub changed: bool,
}

/// Touch contacts, bounded by [`TOUCH_COUNT_MAX`].
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    count: usize,
    points: [TouchPoint; TOUCH_COUNT_MAX],
}

impl TouchEvent {
    /// Copy `points` into a touch payload. More than [`TOUCH_COUNT_MAX`]
    /// points is an error, never a truncation.
    pub fn new(points: &[TouchPoint]) -> Result<Self> {
        if points.len() > TOUCH_COUNT_MAX {
            return Err(Error::CapacityExceeded {
                what: "touch points",
                count: points.len(),
                capacity: TOUCH_COUNT_MAX,
            });
        }

        let mut event = Self {
            count: points.len(),
            points: [TouchPoint::default(); TOUCH_COUNT_MAX],
        };
        event.points[..points.len()].copy_from_slice(points);
        Ok(event)
    }

    pub fn points(&self) -> &[TouchPoint] {
        &self.points[..self.count]
    }
}

/// Well-known button slots in a gamepad event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    Start,
    Back,
    LeftThumbClick,
    RightThumbClick,
    LeftShoulder,
    RightShoulder,
    A,
    B,
    X,
    Y,
}

/// Well-known axis slots in a gamepad event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalogInput {
    LeftTrigger,
    RightTrigger,
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
}

/// Analog value and digital pressed flag of one gamepad button
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GamepadButtonSample {
    pub value: f64,
    pub pressed: bool,
}

/// Gamepad snapshot, bounded by [`GAMEPAD_AXES_COUNT_MAX`] axes and
/// [`GAMEPAD_BUTTON_COUNT_MAX`] buttons.
#[derive(Debug, Clone, PartialEq)]
pub struct GamepadEvent {
    pub connected: bool,
    pub index: usize,
    /// Vendor/brand id string
    pub id: String,
    /// Layout name
    pub mapping: String,
    axes_count: usize,
    axes: [f64; GAMEPAD_AXES_COUNT_MAX],
    button_count: usize,
    buttons: [GamepadButtonSample; GAMEPAD_BUTTON_COUNT_MAX],
}

impl GamepadEvent {
    pub fn new(
        index: usize,
        connected: bool,
        axes: &[f64],
        buttons: &[GamepadButtonSample],
    ) -> Result<Self> {
        if axes.len() > GAMEPAD_AXES_COUNT_MAX {
            return Err(Error::CapacityExceeded {
                what: "gamepad axes",
                count: axes.len(),
                capacity: GAMEPAD_AXES_COUNT_MAX,
            });
        }
        if buttons.len() > GAMEPAD_BUTTON_COUNT_MAX {
            return Err(Error::CapacityExceeded {
                what: "gamepad buttons",
                count: buttons.len(),
                capacity: GAMEPAD_BUTTON_COUNT_MAX,
            });
        }

        let mut event = Self {
            connected,
            index,
            id: String::new(),
            mapping: String::new(),
            axes_count: axes.len(),
            axes: [0.0; GAMEPAD_AXES_COUNT_MAX],
            button_count: buttons.len(),
            buttons: [GamepadButtonSample::default(); GAMEPAD_BUTTON_COUNT_MAX],
        };
        event.axes[..axes.len()].copy_from_slice(axes);
        event.buttons[..buttons.len()].copy_from_slice(buttons);
        Ok(event)
    }

    pub fn with_id(mut self, id: impl Into<String>, mapping: impl Into<String>) -> Self {
        self.id = id.into();
        self.mapping = mapping.into();
        self
    }

    pub fn axes(&self) -> &[f64] {
        &self.axes[..self.axes_count]
    }

    pub fn buttons(&self) -> &[GamepadButtonSample] {
        &self.buttons[..self.button_count]
    }

    pub fn axis(&self, input: AnalogInput) -> Option<f64> {
        self.axes().get(input as usize).copied()
    }

    pub fn button(&self, button: GamepadButton) -> Option<GamepadButtonSample> {
        self.buttons().get(button as usize).copied()
    }
}

/// Payload of an event. Each variant carries only the data that is valid
/// for that kind of event.
#[derive(Debug, Clone, PartialEq, Default, EnumDiscriminants)]
#[strum_discriminants(name(EventType), derive(Hash))]
pub enum EventKind {
    /// Unrecognized notification, or one for a window that is not registered
    #[default]
    None,
    StateChange {
        state: WindowState,
    },
    CloseWindow,
    Visibility {
        visible: bool,
    },
    Enter {
        x: i32,
        y: i32,
    },
    Leave {
        x: i32,
        y: i32,
    },
    Focus {
        focused: bool,
    },
    Paint,
    BorderWidthChange {
        width: u32,
    },
    Reposition {
        x: i32,
        y: i32,
    },
    Resize {
        width: u32,
        height: u32,
    },
    Restack {
        above: WindowId,
    },
    DpiChange {
        scale: f32,
    },
    KeyboardInput {
        key: Key,
        state: ButtonState,
        modifiers: ModifierState,
    },
    MouseMove {
        x: i32,
        y: i32,
        dx: i32,
        dy: i32,
    },
    MouseWheel {
        x: i32,
        y: i32,
        direction: ScrollDirection,
        modifiers: ModifierState,
    },
    MouseInput {
        buttons: MouseButtons,
        state: ButtonState,
        x: i32,
        y: i32,
        modifiers: ModifierState,
    },
    Touch(TouchEvent),
    Gamepad(Box<GamepadEvent>),
    DropFile,
    HoverFile,
}

/// A decoded event and the window it concerns.
///
/// Callers keep one `Event` around and hand it to every poll/wait; the
/// decoder overwrites it in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Event {
    pub window: Option<WindowId>,
    pub kind: EventKind,
}

impl Event {
    pub fn new(window: WindowId, kind: EventKind) -> Self {
        Self {
            window: Some(window),
            kind,
        }
    }

    /// Reset to the NONE event.
    pub fn clear(&mut self) {
        self.window = None;
        self.kind = EventKind::None;
    }

    pub(crate) fn fill(&mut self, window: WindowId, kind: EventKind) {
        self.window = Some(window);
        self.kind = kind;
    }

    pub fn event_type(&self) -> EventType {
        EventType::from(&self.kind)
    }

    pub fn is_none(&self) -> bool {
        matches!(self.kind, EventKind::None)
    }
}
