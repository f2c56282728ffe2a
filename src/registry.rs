//! Window Registry
//!
//! Fixed-capacity slot table mapping native window handles to the cached
//! `Window` records. Slot indices double as the public `WindowId`.

use std::fmt;

use tracing::debug;

use crate::error::{Error, Result};
use crate::window::{NativeWindow, Window};

/// Maximum number of live windows per connection
pub const MAX_WINDOWS: usize = 64;

/// Index of a registry slot. Stable for the life of the window it names;
/// reused once that window is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(usize);

impl WindowId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub struct WindowRegistry {
    slots: [Option<Window>; MAX_WINDOWS],
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Store `window` in the first empty slot.
    ///
    /// Fails with [`Error::RegistryFull`] when every slot is taken; nothing
    /// is modified in that case.
    pub fn create(&mut self, window: Window) -> Result<WindowId> {
        let Some(index) = self.slots.iter().position(Option::is_none) else {
            return Err(Error::RegistryFull {
                capacity: MAX_WINDOWS,
            });
        };

        debug!("Registered window {:?} in slot {}", window.native(), index);
        self.slots[index] = Some(window);
        Ok(WindowId(index))
    }

    /// Clear a slot, returning the window it held.
    pub fn remove(&mut self, id: WindowId) -> Option<Window> {
        let window = self.slots.get_mut(id.0)?.take();
        if let Some(w) = &window {
            debug!("Removed window {:?} from slot {}", w.native(), id.0);
        }
        window
    }

    /// Linear scan for the slot owning `native`.
    pub fn lookup_by_native_id(&self, native: NativeWindow) -> Option<WindowId> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|w| w.native() == native))
            .map(WindowId)
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.slots.get(id.0)?.as_ref()
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    /// Number of live windows
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live windows in slot order
    pub fn iter(&self) -> impl Iterator<Item = (WindowId, &Window)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|w| (WindowId(i), w)))
    }

    /// Drop every window, returning the native handles that were live.
    pub(crate) fn drain(&mut self) -> Vec<NativeWindow> {
        self.slots
            .iter_mut()
            .filter_map(|slot| slot.take().map(|w| w.native()))
            .collect()
    }
}
