//! Atom table
//!
//! ICCCM, EWMH and Motif atoms the backend needs, interned once when the
//! connection is set up.

use tracing::{debug, warn};
use x11rb::protocol::xproto::Atom;

use crate::error::{Error, Result};
use crate::window::{ActionPermissions, WindowState, WindowType};
use crate::x11::transport::Transport;

/// Holds every interned atom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomTable {
    pub wm_protocols: Atom,
    pub wm_delete_window: Atom,
    pub wm_state: Atom,
    pub utf8_string: Atom,
    pub net_wm_name: Atom,
    pub net_wm_state: Atom,
    pub net_wm_state_modal: Atom,
    pub net_wm_state_sticky: Atom,
    pub net_wm_state_maximized_vert: Atom,
    pub net_wm_state_maximized_horz: Atom,
    pub net_wm_state_shaded: Atom,
    pub net_wm_state_skip_taskbar: Atom,
    pub net_wm_state_skip_pager: Atom,
    pub net_wm_state_hidden: Atom,
    pub net_wm_state_fullscreen: Atom,
    pub net_wm_state_above: Atom,
    pub net_wm_state_below: Atom,
    pub net_wm_state_demands_attention: Atom,
    pub net_wm_state_focused: Atom,
    // Action atoms
    pub net_wm_allowed_actions: Atom,
    pub net_wm_action_move: Atom,
    pub net_wm_action_resize: Atom,
    pub net_wm_action_minimize: Atom,
    pub net_wm_action_shade: Atom,
    pub net_wm_action_stick: Atom,
    pub net_wm_action_maximize_horz: Atom,
    pub net_wm_action_maximize_vert: Atom,
    pub net_wm_action_fullscreen: Atom,
    pub net_wm_action_change_desktop: Atom,
    pub net_wm_action_close: Atom,
    pub net_wm_action_above: Atom,
    pub net_wm_action_below: Atom,
    // MOTIF WM Hints (for decoration control)
    pub motif_wm_hints: Atom,
    pub net_wm_window_type: Atom,
    pub net_wm_window_type_desktop: Atom,
    pub net_wm_window_type_dock: Atom,
    pub net_wm_window_type_toolbar: Atom,
    pub net_wm_window_type_menu: Atom,
    pub net_wm_window_type_utility: Atom,
    pub net_wm_window_type_splash: Atom,
    pub net_wm_window_type_dialog: Atom,
    pub net_wm_window_type_normal: Atom,
}

impl AtomTable {
    /// Intern all required atoms. Any failure, including the server
    /// answering NONE, is reported as [`Error::AtomUnavailable`].
    pub fn intern<T: Transport>(transport: &T) -> Result<Self> {
        let intern = |name: &'static str| -> Result<Atom> {
            match transport.intern_atom(name) {
                Ok(x11rb::NONE) => Err(Error::AtomUnavailable(name)),
                Ok(atom) => Ok(atom),
                Err(e) => {
                    warn!("InternAtom {} failed: {}", name, e);
                    Err(Error::AtomUnavailable(name))
                }
            }
        };

        let atoms = Self {
            wm_protocols: intern("WM_PROTOCOLS")?,
            wm_delete_window: intern("WM_DELETE_WINDOW")?,
            wm_state: intern("WM_STATE")?,
            utf8_string: intern("UTF8_STRING")?,
            net_wm_name: intern("_NET_WM_NAME")?,
            net_wm_state: intern("_NET_WM_STATE")?,
            net_wm_state_modal: intern("_NET_WM_STATE_MODAL")?,
            net_wm_state_sticky: intern("_NET_WM_STATE_STICKY")?,
            net_wm_state_maximized_vert: intern("_NET_WM_STATE_MAXIMIZED_VERT")?,
            net_wm_state_maximized_horz: intern("_NET_WM_STATE_MAXIMIZED_HORZ")?,
            net_wm_state_shaded: intern("_NET_WM_STATE_SHADED")?,
            net_wm_state_skip_taskbar: intern("_NET_WM_STATE_SKIP_TASKBAR")?,
            net_wm_state_skip_pager: intern("_NET_WM_STATE_SKIP_PAGER")?,
            net_wm_state_hidden: intern("_NET_WM_STATE_HIDDEN")?,
            net_wm_state_fullscreen: intern("_NET_WM_STATE_FULLSCREEN")?,
            net_wm_state_above: intern("_NET_WM_STATE_ABOVE")?,
            net_wm_state_below: intern("_NET_WM_STATE_BELOW")?,
            net_wm_state_demands_attention: intern("_NET_WM_STATE_DEMANDS_ATTENTION")?,
            net_wm_state_focused: intern("_NET_WM_STATE_FOCUSED")?,
            net_wm_allowed_actions: intern("_NET_WM_ALLOWED_ACTIONS")?,
            net_wm_action_move: intern("_NET_WM_ACTION_MOVE")?,
            net_wm_action_resize: intern("_NET_WM_ACTION_RESIZE")?,
            net_wm_action_minimize: intern("_NET_WM_ACTION_MINIMIZE")?,
            net_wm_action_shade: intern("_NET_WM_ACTION_SHADE")?,
            net_wm_action_stick: intern("_NET_WM_ACTION_STICK")?,
            net_wm_action_maximize_horz: intern("_NET_WM_ACTION_MAXIMIZE_HORZ")?,
            net_wm_action_maximize_vert: intern("_NET_WM_ACTION_MAXIMIZE_VERT")?,
            net_wm_action_fullscreen: intern("_NET_WM_ACTION_FULLSCREEN")?,
            net_wm_action_change_desktop: intern("_NET_WM_ACTION_CHANGE_DESKTOP")?,
            net_wm_action_close: intern("_NET_WM_ACTION_CLOSE")?,
            net_wm_action_above: intern("_NET_WM_ACTION_ABOVE")?,
            net_wm_action_below: intern("_NET_WM_ACTION_BELOW")?,
            motif_wm_hints: intern("_MOTIF_WM_HINTS")?,
            net_wm_window_type: intern("_NET_WM_WINDOW_TYPE")?,
            net_wm_window_type_desktop: intern("_NET_WM_WINDOW_TYPE_DESKTOP")?,
            net_wm_window_type_dock: intern("_NET_WM_WINDOW_TYPE_DOCK")?,
            net_wm_window_type_toolbar: intern("_NET_WM_WINDOW_TYPE_TOOLBAR")?,
            net_wm_window_type_menu: intern("_NET_WM_WINDOW_TYPE_MENU")?,
            net_wm_window_type_utility: intern("_NET_WM_WINDOW_TYPE_UTILITY")?,
            net_wm_window_type_splash: intern("_NET_WM_WINDOW_TYPE_SPLASH")?,
            net_wm_window_type_dialog: intern("_NET_WM_WINDOW_TYPE_DIALOG")?,
            net_wm_window_type_normal: intern("_NET_WM_WINDOW_TYPE_NORMAL")?,
        };

        debug!("Interned atom table: {:?}", atoms);
        Ok(atoms)
    }

    /// The 13 `_NET_WM_STATE_*` atoms paired with their state bit.
    pub fn state_atoms(&self) -> [(Atom, WindowState); 13] {
        [
            (self.net_wm_state_modal, WindowState::MODAL),
            (self.net_wm_state_sticky, WindowState::STICKY),
            (self.net_wm_state_maximized_vert, WindowState::MAXIMIZED_VERT),
            (self.net_wm_state_maximized_horz, WindowState::MAXIMIZED_HORZ),
            (self.net_wm_state_shaded, WindowState::SHADED),
            (self.net_wm_state_skip_taskbar, WindowState::SKIP_TASKBAR),
            (self.net_wm_state_skip_pager, WindowState::SKIP_PAGER),
            (self.net_wm_state_hidden, WindowState::HIDDEN),
            (self.net_wm_state_fullscreen, WindowState::FULLSCREEN),
            (self.net_wm_state_above, WindowState::ABOVE),
            (self.net_wm_state_below, WindowState::BELOW),
            (self.net_wm_state_demands_attention, WindowState::DEMANDS_ATTENTION),
            (self.net_wm_state_focused, WindowState::FOCUSED),
        ]
    }

    /// The 12 `_NET_WM_ACTION_*` atoms paired with their permission bit.
    pub fn action_atoms(&self) -> [(Atom, ActionPermissions); 12] {
        [
            (self.net_wm_action_move, ActionPermissions::MOVE),
            (self.net_wm_action_resize, ActionPermissions::RESIZE),
            (self.net_wm_action_minimize, ActionPermissions::MINIMIZE),
            (self.net_wm_action_shade, ActionPermissions::SHADE),
            (self.net_wm_action_stick, ActionPermissions::STICK),
            (self.net_wm_action_maximize_horz, ActionPermissions::MAXIMIZE_HORZ),
            (self.net_wm_action_maximize_vert, ActionPermissions::MAXIMIZE_VERT),
            (self.net_wm_action_fullscreen, ActionPermissions::FULLSCREEN),
            (self.net_wm_action_change_desktop, ActionPermissions::CHANGE_DESKTOP),
            (self.net_wm_action_close, ActionPermissions::CLOSE),
            (self.net_wm_action_above, ActionPermissions::ABOVE),
            (self.net_wm_action_below, ActionPermissions::BELOW),
        ]
    }

    pub fn window_type_atom(&self, window_type: WindowType) -> Atom {
        match window_type {
            WindowType::Desktop => self.net_wm_window_type_desktop,
            WindowType::Dock => self.net_wm_window_type_dock,
            WindowType::Toolbar => self.net_wm_window_type_toolbar,
            WindowType::Menu => self.net_wm_window_type_menu,
            WindowType::Utility => self.net_wm_window_type_utility,
            WindowType::Splash => self.net_wm_window_type_splash,
            WindowType::Dialog => self.net_wm_window_type_dialog,
            WindowType::Normal => self.net_wm_window_type_normal,
        }
    }
}
