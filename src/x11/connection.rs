//! Connection Module
//!
//! Owns everything one X11 connection needs: the transport, the interned
//! atoms, the window registry and the keymap. There is no global state;
//! every operation goes through a `Connection`.
//!
//! A `Connection` is single-threaded. Outbound requests are buffered by the
//! transport and flushed before every poll or wait.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::event::Event;
use crate::registry::{WindowId, WindowRegistry};
use crate::window::Window;
use crate::x11::atoms::AtomTable;
use crate::x11::decoder::EventDecoder;
use crate::x11::keyboard::KeyboardMapper;
use crate::x11::transport::{Transport, X11Transport};

pub struct Connection<T: Transport = X11Transport> {
    pub(super) transport: Option<T>,
    pub(super) atoms: AtomTable,
    pub(super) registry: WindowRegistry,
    pub(super) keyboard: KeyboardMapper,
}

impl Connection<X11Transport> {
    /// Connect to `$DISPLAY` and intern the atom table.
    ///
    /// Errors here are fatal (see [`Error::is_fatal`]).
    pub fn init() -> Result<Self> {
        Self::init_display(None)
    }

    pub fn init_display(display: Option<&str>) -> Result<Self> {
        Self::with_transport(X11Transport::connect(display)?)
    }
}

impl<T: Transport> Connection<T> {
    pub fn with_transport(transport: T) -> Result<Self> {
        let atoms = AtomTable::intern(&transport)?;
        info!("X11 connection ready");

        Ok(Self {
            transport: Some(transport),
            atoms,
            registry: WindowRegistry::new(),
            keyboard: KeyboardMapper::new(),
        })
    }

    /// Close the connection. Safe to call more than once.
    pub fn deinit(&mut self) {
        let Some(transport) = self.transport.take() else {
            return;
        };
        let live = self.registry.drain();
        if !live.is_empty() {
            debug!("Closing connection with {} live window(s)", live.len());
        }
        self.keyboard.reset();
        drop(transport);
        info!("X11 connection closed");
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    pub fn transport(&self) -> Result<&T> {
        self.transport.as_ref().ok_or(Error::Closed)
    }

    pub fn atoms(&self) -> &AtomTable {
        &self.atoms
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn window(&self, id: WindowId) -> Result<&Window> {
        self.registry.get(id).ok_or(Error::UnknownWindow(id))
    }

    pub fn window_mut(&mut self, id: WindowId) -> Result<&mut Window> {
        self.registry.get_mut(id).ok_or(Error::UnknownWindow(id))
    }

    /// Decode the next queued event into `event` without blocking.
    ///
    /// Returns `false`, with `event` set to NONE, when nothing was queued.
    pub fn poll_event(&mut self, event: &mut Event) -> Result<bool> {
        let transport = self.transport.as_ref().ok_or(Error::Closed)?;
        transport.flush()?;

        let Some(raw) = transport.poll_for_event()? else {
            event.clear();
            return Ok(false);
        };

        EventDecoder {
            transport,
            atoms: &self.atoms,
            registry: &mut self.registry,
            keyboard: &mut self.keyboard,
        }
        .decode(&raw, event)?;
        Ok(true)
    }

    /// Block until an event arrives and decode it into `event`.
    pub fn wait_event(&mut self, event: &mut Event) -> Result<()> {
        let transport = self.transport.as_ref().ok_or(Error::Closed)?;
        transport.flush()?;
        let raw = transport.wait_for_event()?;

        EventDecoder {
            transport,
            atoms: &self.atoms,
            registry: &mut self.registry,
            keyboard: &mut self.keyboard,
        }
        .decode(&raw, event)
    }
}

impl<T: Transport> Drop for Connection<T> {
    fn drop(&mut self) {
        self.deinit();
    }
}
