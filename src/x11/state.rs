//! Window state synchronization
//!
//! Translation between `_NET_WM_STATE` / `_NET_WM_ALLOWED_ACTIONS` atom
//! lists and the cached bitmasks.

use x11rb::protocol::xproto::{Atom, ClientMessageEvent, Property};

use crate::window::{ActionPermissions, WindowState};
use crate::x11::atoms::AtomTable;

/// `_NET_WM_STATE` client message action. Discriminants are the wire
/// values `_NET_WM_STATE_REMOVE` and `_NET_WM_STATE_ADD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateAction {
    Retract = 0,
    Assert = 1,
}

impl StateAction {
    /// A property that got a new value asserts its tokens; a deleted one
    /// retracts them.
    pub fn from_property(state: Property) -> Self {
        if state == Property::NEW_VALUE {
            Self::Assert
        } else {
            Self::Retract
        }
    }
}

pub struct StateSynchronizer<'a> {
    atoms: &'a AtomTable,
}

impl<'a> StateSynchronizer<'a> {
    pub fn new(atoms: &'a AtomTable) -> Self {
        Self { atoms }
    }

    /// Apply `action` to every known state token in `tokens`.
    ///
    /// Only bits named in `tokens` change; unknown atoms are skipped.
    pub fn synchronize(
        &self,
        mut mask: WindowState,
        action: StateAction,
        tokens: &[Atom],
    ) -> WindowState {
        let table = self.atoms.state_atoms();
        for token in tokens {
            let Some((_, bit)) = table.iter().find(|(atom, _)| atom == token) else {
                continue;
            };
            match action {
                StateAction::Assert => mask.insert(*bit),
                StateAction::Retract => mask.remove(*bit),
            }
        }
        mask
    }

    /// One add/remove declaration per state bit, in table order.
    pub fn declarations(&self, target: WindowState) -> [(StateAction, Atom); 13] {
        self.atoms.state_atoms().map(|(atom, bit)| {
            let action = if target.contains(bit) {
                StateAction::Assert
            } else {
                StateAction::Retract
            };
            (action, atom)
        })
    }

    /// Atoms of the bits set in `mask`
    pub fn state_atoms_for(&self, mask: WindowState) -> Vec<Atom> {
        self.atoms
            .state_atoms()
            .into_iter()
            .filter(|(_, bit)| mask.contains(*bit))
            .map(|(atom, _)| atom)
            .collect()
    }

    /// `_NET_WM_STATE` request for `window`, addressed to the root window
    /// per EWMH.
    pub fn state_message(&self, window: u32, action: StateAction, atom: Atom) -> ClientMessageEvent {
        ClientMessageEvent::new(
            32,
            window,
            self.atoms.net_wm_state,
            [action as u32, atom, 0, 1, 0],
        )
    }

    pub fn permissions_from_atoms(&self, atoms: &[Atom]) -> ActionPermissions {
        self.atoms
            .action_atoms()
            .into_iter()
            .filter(|(atom, _)| atoms.contains(atom))
            .map(|(_, bit)| bit)
            .collect()
    }

    pub fn permission_atoms_for(&self, permissions: ActionPermissions) -> Vec<Atom> {
        self.atoms
            .action_atoms()
            .into_iter()
            .filter(|(_, bit)| permissions.contains(*bit))
            .map(|(atom, _)| atom)
            .collect()
    }
}
