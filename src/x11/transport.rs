//! X11 Transport
//!
//! The only place that talks to the X server. Everything above it goes
//! through the [`Transport`] trait so the decoder and window operations can
//! run against an in-memory server in tests.

use tracing::{debug, info};
use x11rb::connection::Connection;
use x11rb::protocol::Event;
use x11rb::protocol::xproto::{
    Atom, AtomEnum, ClientMessageEvent, ConfigureWindowAux, ConnectionExt as _, CreateWindowAux,
    EventMask, Keycode, PropMode, WindowClass,
};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;
use x11rb::COPY_DEPTH_FROM_PARENT;

use crate::error::{Error, Result};
use crate::window::{Position, Size};

/// Keysyms for a run of keycodes, `keysyms_per_keycode` columns per keycode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardMapping {
    pub first_keycode: Keycode,
    pub keysyms_per_keycode: u8,
    pub keysyms: Vec<u32>,
}

impl KeyboardMapping {
    /// Keysym in column 0 (unshifted, first group) for `keycode`.
    pub fn primary_keysym(&self, keycode: Keycode) -> Option<u32> {
        let offset = keycode.checked_sub(self.first_keycode)? as usize;
        self.keysyms
            .get(offset * self.keysyms_per_keycode as usize)
            .copied()
    }
}

/// Requests the backend issues to the X server.
///
/// Every call either succeeds or fails for good; nothing retries.
pub trait Transport {
    /// Size of the default screen in pixels
    fn screen_size(&self) -> Size;

    /// Root window of the default screen
    fn root(&self) -> u32;

    /// Smallest and largest keycode the server reports
    fn keycode_range(&self) -> (Keycode, Keycode);

    fn generate_id(&self) -> Result<u32>;

    fn intern_atom(&self, name: &str) -> Result<Atom>;

    fn create_window(
        &self,
        window: u32,
        position: Position,
        size: Size,
        event_mask: EventMask,
    ) -> Result<()>;

    fn destroy_window(&self, window: u32) -> Result<()>;

    fn map_window(&self, window: u32) -> Result<()>;

    fn unmap_window(&self, window: u32) -> Result<()>;

    fn configure_window(&self, window: u32, aux: &ConfigureWindowAux) -> Result<()>;

    fn change_property32(
        &self,
        mode: PropMode,
        window: u32,
        property: Atom,
        type_: Atom,
        data: &[u32],
    ) -> Result<()>;

    fn change_property8(
        &self,
        mode: PropMode,
        window: u32,
        property: Atom,
        type_: Atom,
        data: &[u8],
    ) -> Result<()>;

    fn send_event(
        &self,
        destination: u32,
        event_mask: EventMask,
        event: &ClientMessageEvent,
    ) -> Result<()>;

    /// Full value of an ATOM-typed property; empty when unset.
    fn get_atom_list(&self, window: u32, property: Atom) -> Result<Vec<Atom>>;

    fn keyboard_mapping(&self, first: Keycode, count: u8) -> Result<KeyboardMapping>;

    fn flush(&self) -> Result<()>;

    fn poll_for_event(&self) -> Result<Option<Event>>;

    fn wait_for_event(&self) -> Result<Event>;
}

/// [`Transport`] over an x11rb socket connection.
pub struct X11Transport {
    conn: RustConnection,
    screen_num: usize,
}

impl X11Transport {
    /// Connect to `display`, or `$DISPLAY` when `None`.
    pub fn connect(display: Option<&str>) -> Result<Self> {
        let (conn, screen_num) = RustConnection::connect(display)?;
        let screen = &conn.setup().roots[screen_num];
        info!(
            "Connected to X server: screen {} ({}x{})",
            screen_num, screen.width_in_pixels, screen.height_in_pixels
        );
        Ok(Self { conn, screen_num })
    }

    pub fn connection(&self) -> &RustConnection {
        &self.conn
    }

    fn screen(&self) -> &x11rb::protocol::xproto::Screen {
        &self.conn.setup().roots[self.screen_num]
    }
}

fn to_i16(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

fn to_u16(value: u32) -> u16 {
    value.min(u16::MAX as u32) as u16
}

impl Transport for X11Transport {
    fn screen_size(&self) -> Size {
        let screen = self.screen();
        Size::new(
            u32::from(screen.width_in_pixels),
            u32::from(screen.height_in_pixels),
        )
    }

    fn root(&self) -> u32 {
        self.screen().root
    }

    fn keycode_range(&self) -> (Keycode, Keycode) {
        let setup = self.conn.setup();
        (setup.min_keycode, setup.max_keycode)
    }

    fn generate_id(&self) -> Result<u32> {
        Ok(self.conn.generate_id()?)
    }

    fn intern_atom(&self, name: &str) -> Result<Atom> {
        Ok(self.conn.intern_atom(false, name.as_bytes())?.reply()?.atom)
    }

    fn create_window(
        &self,
        window: u32,
        position: Position,
        size: Size,
        event_mask: EventMask,
    ) -> Result<()> {
        let screen = self.screen();
        let aux = CreateWindowAux::new()
            .background_pixel(screen.black_pixel)
            .event_mask(event_mask);

        self.conn.create_window(
            COPY_DEPTH_FROM_PARENT,
            window,
            screen.root,
            to_i16(position.x),
            to_i16(position.y),
            to_u16(size.width),
            to_u16(size.height),
            0,
            WindowClass::INPUT_OUTPUT,
            screen.root_visual,
            &aux,
        )?;
        debug!("CreateWindow {} {:?} {:?}", window, position, size);
        Ok(())
    }

    fn destroy_window(&self, window: u32) -> Result<()> {
        self.conn.destroy_window(window)?;
        Ok(())
    }

    fn map_window(&self, window: u32) -> Result<()> {
        self.conn.map_window(window)?;
        Ok(())
    }

    fn unmap_window(&self, window: u32) -> Result<()> {
        self.conn.unmap_window(window)?;
        Ok(())
    }

    fn configure_window(&self, window: u32, aux: &ConfigureWindowAux) -> Result<()> {
        self.conn.configure_window(window, aux)?;
        Ok(())
    }

    fn change_property32(
        &self,
        mode: PropMode,
        window: u32,
        property: Atom,
        type_: Atom,
        data: &[u32],
    ) -> Result<()> {
        self.conn
            .change_property32(mode, window, property, type_, data)?;
        Ok(())
    }

    fn change_property8(
        &self,
        mode: PropMode,
        window: u32,
        property: Atom,
        type_: Atom,
        data: &[u8],
    ) -> Result<()> {
        self.conn
            .change_property8(mode, window, property, type_, data)?;
        Ok(())
    }

    fn send_event(
        &self,
        destination: u32,
        event_mask: EventMask,
        event: &ClientMessageEvent,
    ) -> Result<()> {
        self.conn
            .send_event(false, destination, event_mask, event)?;
        Ok(())
    }

    fn get_atom_list(&self, window: u32, property: Atom) -> Result<Vec<Atom>> {
        let reply = self
            .conn
            .get_property(false, window, property, AtomEnum::ATOM, 0, u32::MAX)?
            .reply()?;
        Ok(reply
            .value32()
            .map(|values| values.collect())
            .unwrap_or_default())
    }

    fn keyboard_mapping(&self, first: Keycode, count: u8) -> Result<KeyboardMapping> {
        let reply = self.conn.get_keyboard_mapping(first, count)?.reply()?;
        Ok(KeyboardMapping {
            first_keycode: first,
            keysyms_per_keycode: reply.keysyms_per_keycode,
            keysyms: reply.keysyms,
        })
    }

    fn flush(&self) -> Result<()> {
        self.conn.flush().map_err(Error::from)
    }

    fn poll_for_event(&self) -> Result<Option<Event>> {
        Ok(self.conn.poll_for_event()?)
    }

    fn wait_for_event(&self) -> Result<Event> {
        Ok(self.conn.wait_for_event()?)
    }
}
