//! Event decoder
//!
//! Turns one raw X11 event into one [`Event`]. Structural and state
//! notifications also update the cached fields of the window they concern.

use tracing::{debug, trace};
use x11rb::protocol::Event as RawEvent;
use x11rb::protocol::xproto::{
    ButtonPressEvent, ClientMessageEvent, ConfigureNotifyEvent, KeyButMask, KeyPressEvent,
    MotionNotifyEvent, PropertyNotifyEvent,
};

use crate::error::Result;
use crate::event::{
    ButtonState, Event, EventKind, ModifierState, MouseButtons, ScrollDirection,
};
use crate::registry::{WindowId, WindowRegistry};
use crate::window::{NativeWindow, Position, Size};
use crate::x11::atoms::AtomTable;
use crate::x11::keyboard::KeyboardMapper;
use crate::x11::state::{StateAction, StateSynchronizer};
use crate::x11::transport::Transport;

type Decoded = Option<(WindowId, EventKind)>;

/// Borrowed view of the connection state needed to decode one event.
pub struct EventDecoder<'a, T: Transport> {
    pub transport: &'a T,
    pub atoms: &'a AtomTable,
    pub registry: &'a mut WindowRegistry,
    pub keyboard: &'a mut KeyboardMapper,
}

fn has(state: KeyButMask, flag: KeyButMask) -> bool {
    u16::from(state) & u16::from(flag) != 0
}

/// Modifier record from the core protocol state mask
pub fn modifiers(state: KeyButMask) -> ModifierState {
    ModifierState {
        ctrl: has(state, KeyButMask::CONTROL),
        alt: has(state, KeyButMask::MOD1),
        shift: has(state, KeyButMask::SHIFT),
        caps_lock: has(state, KeyButMask::LOCK),
        num_lock: has(state, KeyButMask::MOD2),
        meta: has(state, KeyButMask::MOD4),
    }
}

/// Held buttons from the state mask, plus the button the event is about.
pub fn mouse_buttons(state: KeyButMask, detail: u8) -> MouseButtons {
    let mut buttons = MouseButtons::empty();
    for (mask, button) in [
        (KeyButMask::BUTTON1, MouseButtons::LEFT),
        (KeyButMask::BUTTON2, MouseButtons::MIDDLE),
        (KeyButMask::BUTTON3, MouseButtons::RIGHT),
        (KeyButMask::BUTTON4, MouseButtons::BUTTON4),
        (KeyButMask::BUTTON5, MouseButtons::BUTTON5),
    ] {
        buttons.set(button, has(state, mask));
    }

    buttons
        | match detail {
            1 => MouseButtons::LEFT,
            2 => MouseButtons::MIDDLE,
            3 => MouseButtons::RIGHT,
            4 => MouseButtons::BUTTON4,
            5 => MouseButtons::BUTTON5,
            _ => MouseButtons::empty(),
        }
}

impl<'a, T: Transport> EventDecoder<'a, T> {
    /// Decode `raw` into `out`. Unknown event types and events for windows
    /// outside the registry leave `out` as NONE.
    pub fn decode(&mut self, raw: &RawEvent, out: &mut Event) -> Result<()> {
        out.clear();

        let decoded = match raw {
            RawEvent::MapNotify(e) => self.simple(e.window, EventKind::Visibility { visible: true }),
            RawEvent::UnmapNotify(e) => {
                self.simple(e.window, EventKind::Visibility { visible: false })
            }
            RawEvent::FocusIn(e) => self.simple(e.event, EventKind::Focus { focused: true }),
            RawEvent::FocusOut(e) => self.simple(e.event, EventKind::Focus { focused: false }),
            RawEvent::EnterNotify(e) => self.simple(
                e.event,
                EventKind::Enter {
                    x: e.event_x.into(),
                    y: e.event_y.into(),
                },
            ),
            RawEvent::LeaveNotify(e) => self.simple(
                e.event,
                EventKind::Leave {
                    x: e.event_x.into(),
                    y: e.event_y.into(),
                },
            ),
            RawEvent::Expose(e) => self.simple(e.window, EventKind::Paint),
            RawEvent::ResizeRequest(e) => self.simple(
                e.window,
                EventKind::Resize {
                    width: e.width.into(),
                    height: e.height.into(),
                },
            ),
            RawEvent::ConfigureNotify(e) => self.configure(e),
            RawEvent::ClientMessage(e) => self.client_message(e),
            RawEvent::PropertyNotify(e) => self.property(e)?,
            RawEvent::MotionNotify(e) => self.motion(e),
            RawEvent::ButtonPress(e) => self.button(e, ButtonState::Pressed),
            RawEvent::ButtonRelease(e) => self.button(e, ButtonState::Released),
            RawEvent::KeyPress(e) => self.key(e, ButtonState::Pressed)?,
            RawEvent::KeyRelease(e) => self.key(e, ButtonState::Released)?,
            other => {
                trace!("Ignoring X11 event {:?}", other);
                None
            }
        };

        if let Some((window, kind)) = decoded {
            trace!("Decoded {:?} for window {}", kind, window);
            out.fill(window, kind);
        }
        Ok(())
    }

    fn resolve(&self, native: u32) -> Option<WindowId> {
        let id = self.registry.lookup_by_native_id(NativeWindow(native));
        if id.is_none() {
            debug!("Event for unregistered window {:#x}, dropping", native);
        }
        id
    }

    fn simple(&self, native: u32, kind: EventKind) -> Decoded {
        Some((self.resolve(native)?, kind))
    }

    /// Size, then position, then border width, then stacking. Only the
    /// first difference is reported, every cached field is refreshed.
    fn configure(&mut self, e: &ConfigureNotifyEvent) -> Decoded {
        let id = self.resolve(e.window)?;
        let above = (e.above_sibling != x11rb::NONE)
            .then(|| self.registry.lookup_by_native_id(NativeWindow(e.above_sibling)));

        let window = self.registry.get_mut(id)?;
        let size = Size::new(e.width.into(), e.height.into());
        let position = Position::new(e.x.into(), e.y.into());
        let border_width = u32::from(e.border_width);

        let kind = if size != window.size() {
            EventKind::Resize {
                width: size.width,
                height: size.height,
            }
        } else if position != window.position() {
            EventKind::Reposition {
                x: position.x,
                y: position.y,
            }
        } else if border_width != window.border_width() {
            EventKind::BorderWidthChange {
                width: border_width,
            }
        } else {
            match above {
                Some(Some(sibling)) => EventKind::Restack { above: sibling },
                Some(None) => {
                    debug!(
                        "Restack above unregistered window {:#x}, dropping",
                        e.above_sibling
                    );
                    EventKind::None
                }
                None => EventKind::None,
            }
        };

        window.set_size(size);
        window.set_position(position);
        window.set_border_width(border_width);

        (kind != EventKind::None).then_some((id, kind))
    }

    fn client_message(&self, e: &ClientMessageEvent) -> Decoded {
        let is_close = e.format == 32
            && e.type_ == self.atoms.wm_protocols
            && e.data.as_data32()[0] == self.atoms.wm_delete_window;
        if !is_close {
            trace!("Ignoring client message of type {}", e.type_);
            return None;
        }
        self.simple(e.window, EventKind::CloseWindow)
    }

    fn property(&mut self, e: &PropertyNotifyEvent) -> Result<Decoded> {
        if e.atom != self.atoms.net_wm_state {
            return Ok(None);
        }
        let Some(id) = self.resolve(e.window) else {
            return Ok(None);
        };

        let tokens = self.transport.get_atom_list(e.window, self.atoms.net_wm_state)?;
        let action = StateAction::from_property(e.state);

        let Some(window) = self.registry.get_mut(id) else {
            return Ok(None);
        };
        let state = StateSynchronizer::new(self.atoms).synchronize(window.state(), action, &tokens);
        window.set_state(state);

        Ok(Some((id, EventKind::StateChange { state })))
    }

    fn motion(&mut self, e: &MotionNotifyEvent) -> Decoded {
        let id = self.resolve(e.event)?;
        let position = Position::new(e.root_x.into(), e.root_y.into());
        let (dx, dy) = self.registry.get_mut(id)?.move_cursor(position);

        Some((
            id,
            EventKind::MouseMove {
                x: position.x,
                y: position.y,
                dx,
                dy,
            },
        ))
    }

    fn button(&self, e: &ButtonPressEvent, state: ButtonState) -> Decoded {
        let id = self.resolve(e.event)?;
        let buttons = mouse_buttons(e.state, e.detail);
        let modifiers = modifiers(e.state);
        let (x, y) = (i32::from(e.event_x), i32::from(e.event_y));

        let wheel = MouseButtons::BUTTON4 | MouseButtons::BUTTON5;
        let kind = if state == ButtonState::Released && buttons.intersects(wheel) {
            let direction = if buttons.contains(MouseButtons::BUTTON4) {
                ScrollDirection::Up
            } else {
                ScrollDirection::Down
            };
            EventKind::MouseWheel {
                x,
                y,
                direction,
                modifiers,
            }
        } else {
            EventKind::MouseInput {
                buttons,
                state,
                x,
                y,
                modifiers,
            }
        };
        Some((id, kind))
    }

    fn key(&mut self, e: &KeyPressEvent, state: ButtonState) -> Result<Decoded> {
        let Some(id) = self.resolve(e.event) else {
            return Ok(None);
        };
        let key = self.keyboard.resolve(self.transport, e.detail)?;

        Ok(Some((
            id,
            EventKind::KeyboardInput {
                key,
                state,
                modifiers: modifiers(e.state),
            },
        )))
    }
}
