//! Window operations
//!
//! Create, destroy and configure native windows. Each setter writes to the
//! server first and updates the cache only once the request went out.

use tracing::{debug, info};
use x11rb::protocol::xproto::{AtomEnum, ConfigureWindowAux, EventMask, PropMode};

use crate::error::{Error, Result};
use crate::registry::{MAX_WINDOWS, WindowId};
use crate::surface::SurfaceFactory;
use crate::window::{
    ActionPermissions, NativeWindow, Position, Size, Window, WindowState, WindowType,
};
use crate::x11::atoms::AtomTable;
use crate::x11::connection::Connection;
use crate::x11::state::StateSynchronizer;
use crate::x11::transport::Transport;

// ICCCM WM_SIZE_HINTS flags
const P_MIN_SIZE: u32 = 1 << 4;
const P_MAX_SIZE: u32 = 1 << 5;

// Motif hints flag: the decorations field is valid
const MWM_HINTS_DECORATIONS: u32 = 1 << 1;

fn window_event_mask() -> EventMask {
    EventMask::EXPOSURE
        | EventMask::KEY_PRESS
        | EventMask::KEY_RELEASE
        | EventMask::BUTTON_PRESS
        | EventMask::BUTTON_RELEASE
        | EventMask::ENTER_WINDOW
        | EventMask::LEAVE_WINDOW
        | EventMask::FOCUS_CHANGE
        | EventMask::VISIBILITY_CHANGE
        | EventMask::STRUCTURE_NOTIFY
        | EventMask::PROPERTY_CHANGE
        | EventMask::POINTER_MOTION
        | EventMask::SUBSTRUCTURE_NOTIFY
}

/// WM_NORMAL_HINTS payload carrying only the min/max size.
fn size_hints(min: Size, max: Size) -> [u32; 18] {
    let mut hints = [0; 18];
    hints[0] = P_MIN_SIZE | P_MAX_SIZE;
    hints[5] = min.width;
    hints[6] = min.height;
    hints[7] = max.width;
    hints[8] = max.height;
    hints
}

fn check_nonzero(size: Size) -> Result<()> {
    if size.width == 0 || size.height == 0 {
        return Err(Error::InvalidArgument("window width and height must be non-zero"));
    }
    Ok(())
}

fn write_title<T: Transport>(
    transport: &T,
    atoms: &AtomTable,
    native: NativeWindow,
    title: &str,
) -> Result<()> {
    transport.change_property8(
        PropMode::REPLACE,
        native.0,
        AtomEnum::WM_NAME.into(),
        AtomEnum::STRING.into(),
        title.as_bytes(),
    )?;
    transport.change_property8(
        PropMode::REPLACE,
        native.0,
        atoms.net_wm_name,
        atoms.utf8_string,
        title.as_bytes(),
    )
}

fn realize<T: Transport>(transport: &T, atoms: &AtomTable, window: &Window) -> Result<()> {
    let native = window.native();
    transport.create_window(native.0, window.position(), window.size(), window_event_mask())?;
    transport.change_property32(
        PropMode::REPLACE,
        native.0,
        atoms.wm_protocols,
        AtomEnum::ATOM.into(),
        &[atoms.wm_delete_window],
    )?;
    write_title(transport, atoms, native, window.title())?;
    transport.map_window(native.0)?;
    transport.flush()
}

impl<T: Transport> Connection<T> {
    fn native(&self, id: WindowId) -> Result<NativeWindow> {
        Ok(self.window(id)?.native())
    }

    /// Create, register and map a window.
    ///
    /// The size is clamped to the screen; the screen size also becomes the
    /// window's maximum size.
    pub fn create_window(&mut self, title: &str, size: Size, position: Position) -> Result<WindowId> {
        check_nonzero(size)?;
        let transport = self.transport.as_ref().ok_or(Error::Closed)?;
        if self.registry.len() >= MAX_WINDOWS {
            return Err(Error::RegistryFull {
                capacity: MAX_WINDOWS,
            });
        }

        let native = NativeWindow(transport.generate_id()?);
        let window = Window::new(native, title, size, position, transport.screen_size());
        let id = self.registry.create(window)?;

        let created = self
            .registry
            .get(id)
            .ok_or(Error::UnknownWindow(id))
            .and_then(|window| realize(transport, &self.atoms, window));
        if let Err(e) = created {
            self.registry.remove(id);
            return Err(e);
        }

        info!("Created window {:#x} ({}) as {}", native.0, title, id);
        Ok(id)
    }

    /// Unregister and destroy a window. The slot is cleared before the
    /// native window goes away.
    pub fn destroy_window(&mut self, id: WindowId) -> Result<()> {
        let transport = self.transport.as_ref().ok_or(Error::Closed)?;
        let window = self.registry.remove(id).ok_or(Error::UnknownWindow(id))?;

        transport.destroy_window(window.native().0)?;
        transport.flush()?;
        info!("Destroyed window {:#x}", window.native().0);
        Ok(())
    }

    pub fn show(&mut self, id: WindowId) -> Result<()> {
        let native = self.native(id)?;
        let transport = self.transport()?;
        transport.map_window(native.0)?;
        transport.flush()
    }

    pub fn hide(&mut self, id: WindowId) -> Result<()> {
        let native = self.native(id)?;
        let transport = self.transport()?;
        transport.unmap_window(native.0)?;
        transport.flush()
    }

    pub fn set_title(&mut self, id: WindowId, title: &str) -> Result<()> {
        let native = self.native(id)?;
        let transport = self.transport()?;
        write_title(transport, &self.atoms, native, title)?;
        transport.flush()?;

        self.window_mut(id)?.set_title(title);
        Ok(())
    }

    pub fn set_icon_path(&mut self, id: WindowId, path: impl Into<std::path::PathBuf>) -> Result<()> {
        self.window_mut(id)?.set_icon_path(path);
        Ok(())
    }

    /// Resize within the window's `[min, max]` bounds.
    pub fn set_size(&mut self, id: WindowId, size: Size) -> Result<()> {
        check_nonzero(size)?;
        let window = self.window(id)?;
        let (min, max) = (window.min_size(), window.max_size());
        if !size.fits_within(min, max) {
            return Err(Error::OutOfBounds {
                requested: size,
                min,
                max,
            });
        }

        let native = window.native();
        let transport = self.transport()?;
        transport.configure_window(
            native.0,
            &ConfigureWindowAux::new().width(size.width).height(size.height),
        )?;
        transport.flush()?;

        self.window_mut(id)?.set_size(size);
        Ok(())
    }

    pub fn set_min_size(&mut self, id: WindowId, min: Size) -> Result<()> {
        let window = self.window(id)?;
        let max = window.max_size();
        if min.width > max.width || min.height > max.height {
            return Err(Error::InvalidArgument("minimum size exceeds maximum size"));
        }

        self.write_size_hints(window.native(), min, max)?;
        self.window_mut(id)?.set_min_size(min);
        Ok(())
    }

    pub fn set_max_size(&mut self, id: WindowId, max: Size) -> Result<()> {
        check_nonzero(max)?;
        let window = self.window(id)?;
        let min = window.min_size();
        if max.width < min.width || max.height < min.height {
            return Err(Error::InvalidArgument("maximum size is below minimum size"));
        }

        self.write_size_hints(window.native(), min, max)?;
        self.window_mut(id)?.set_max_size(max);
        Ok(())
    }

    fn write_size_hints(&self, native: NativeWindow, min: Size, max: Size) -> Result<()> {
        let transport = self.transport()?;
        transport.change_property32(
            PropMode::REPLACE,
            native.0,
            AtomEnum::WM_NORMAL_HINTS.into(),
            AtomEnum::WM_SIZE_HINTS.into(),
            &size_hints(min, max),
        )?;
        transport.flush()
    }

    pub fn set_position(&mut self, id: WindowId, position: Position) -> Result<()> {
        let native = self.native(id)?;
        let transport = self.transport()?;
        transport.configure_window(
            native.0,
            &ConfigureWindowAux::new().x(position.x).y(position.y),
        )?;
        transport.flush()?;

        self.window_mut(id)?.set_position(position);
        Ok(())
    }

    /// Ask the window manager for exactly `target`.
    ///
    /// `_NET_WM_STATE` is rewritten and one add/remove request goes out per
    /// state bit. The cache takes `target` as is, without waiting for the
    /// window manager to confirm.
    pub fn set_state(&mut self, id: WindowId, target: WindowState) -> Result<()> {
        let native = self.native(id)?;
        let transport = self.transport()?;
        let sync = StateSynchronizer::new(&self.atoms);

        transport.change_property32(
            PropMode::REPLACE,
            native.0,
            self.atoms.net_wm_state,
            AtomEnum::ATOM.into(),
            &[],
        )?;
        for atom in sync.state_atoms_for(target) {
            transport.change_property32(
                PropMode::APPEND,
                native.0,
                self.atoms.net_wm_state,
                AtomEnum::ATOM.into(),
                &[atom],
            )?;
        }

        let mask = EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY;
        for (action, atom) in sync.declarations(target) {
            let message = sync.state_message(native.0, action, atom);
            transport.send_event(transport.root(), mask, &message)?;
        }
        transport.flush()?;

        debug!("Window {:#x} state set to {:?}", native.0, target);
        self.window_mut(id)?.set_state(target);
        Ok(())
    }

    /// Live `_NET_WM_ALLOWED_ACTIONS` of the window; not cached.
    pub fn action_permissions(&self, id: WindowId) -> Result<ActionPermissions> {
        let native = self.native(id)?;
        let atoms = self
            .transport()?
            .get_atom_list(native.0, self.atoms.net_wm_allowed_actions)?;
        Ok(StateSynchronizer::new(&self.atoms).permissions_from_atoms(&atoms))
    }

    pub fn set_action_permissions(
        &mut self,
        id: WindowId,
        permissions: ActionPermissions,
    ) -> Result<()> {
        let native = self.native(id)?;
        let transport = self.transport()?;
        let atoms = StateSynchronizer::new(&self.atoms).permission_atoms_for(permissions);

        transport.change_property32(
            PropMode::REPLACE,
            native.0,
            self.atoms.net_wm_allowed_actions,
            AtomEnum::ATOM.into(),
            &atoms,
        )?;
        transport.flush()
    }

    /// Toggle window manager decorations through `_MOTIF_WM_HINTS`.
    pub fn set_bordered(&mut self, id: WindowId, bordered: bool) -> Result<()> {
        let native = self.native(id)?;
        let transport = self.transport()?;
        let hints = [MWM_HINTS_DECORATIONS, 0, u32::from(bordered), 0, 0];

        transport.change_property32(
            PropMode::REPLACE,
            native.0,
            self.atoms.motif_wm_hints,
            self.atoms.motif_wm_hints,
            &hints,
        )?;
        transport.flush()
    }

    pub fn set_window_type(&mut self, id: WindowId, window_type: WindowType) -> Result<()> {
        let native = self.native(id)?;
        let transport = self.transport()?;

        transport.change_property32(
            PropMode::REPLACE,
            native.0,
            self.atoms.net_wm_window_type,
            AtomEnum::ATOM.into(),
            &[self.atoms.window_type_atom(window_type)],
        )?;
        transport.flush()
    }

    /// Hand the native window to a graphics API surface factory.
    pub fn create_surface<F: SurfaceFactory>(
        &self,
        id: WindowId,
        factory: &F,
        instance: &F::Instance,
    ) -> Result<F::Surface> {
        let native = self.native(id)?;
        Ok(factory.create_surface(native, instance)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, EventKind};
    use crate::surface::SurfaceError;
    use crate::x11::transport::mock::{MockTransport, ROOT, Request};
    use pretty_assertions::assert_eq;
    use x11rb::protocol::Event as RawEvent;
    use x11rb::protocol::xproto::{Property, PropertyNotifyEvent, PROPERTY_NOTIFY_EVENT};

    fn connection() -> Connection<MockTransport> {
        Connection::with_transport(MockTransport::default()).unwrap()
    }

    fn mock(conn: &Connection<MockTransport>) -> &MockTransport {
        conn.transport().unwrap()
    }

    #[test]
    fn create_rejects_zero_size() {
        let mut conn = connection();
        let err = conn
            .create_window("zero", Size::new(0, 10), Position::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(conn.registry().is_empty());
        assert!(mock(&conn).requests().is_empty());
    }

    #[test]
    fn create_registers_then_maps() {
        let mut conn = connection();
        let id = conn
            .create_window("hello", Size::new(4000, 540), Position::new(10, 20))
            .unwrap();
        assert_eq!(id.index(), 0);

        let window = conn.window(id).unwrap();
        let native = window.native().0;
        assert_eq!(window.title(), "hello");
        assert_eq!(window.size(), Size::new(1920, 540));
        assert_eq!(window.max_size(), Size::new(1920, 1080));
        assert_eq!(window.state(), WindowState::empty());

        let m = mock(&conn);
        let requests = m.requests();
        assert_eq!(
            requests.first(),
            Some(&Request::CreateWindow {
                window: native,
                position: Position::new(10, 20),
                size: Size::new(1920, 540),
            })
        );
        assert_eq!(
            &requests[requests.len() - 2..],
            &[Request::MapWindow(native), Request::Flush]
        );
        assert_eq!(
            m.property(native, m.atom("WM_PROTOCOLS")),
            vec![m.atom("WM_DELETE_WINDOW")]
        );
        assert_eq!(m.string_property(native, m.atom("_NET_WM_NAME")), b"hello");
    }

    #[test]
    fn full_registry_makes_no_native_requests() {
        let mut conn = connection();
        for i in 0..crate::registry::MAX_WINDOWS {
            conn.create_window(&format!("w{i}"), Size::new(10, 10), Position::default())
                .unwrap();
        }
        mock(&conn).clear_requests();
        let next_id = mock(&conn).next_id.get();

        let err = conn
            .create_window("overflow", Size::new(10, 10), Position::default())
            .unwrap_err();
        assert!(matches!(err, Error::RegistryFull { capacity: 64 }));
        assert!(mock(&conn).requests().is_empty());
        assert_eq!(mock(&conn).next_id.get(), next_id);
    }

    #[test]
    fn destroy_clears_slot_before_native_destroy() {
        let mut conn = connection();
        let id = conn
            .create_window("gone", Size::new(10, 10), Position::default())
            .unwrap();
        let native = conn.window(id).unwrap().native().0;
        mock(&conn).clear_requests();

        conn.destroy_window(id).unwrap();
        assert!(conn.window(id).is_err());
        assert_eq!(
            mock(&conn).requests(),
            vec![Request::DestroyWindow(native), Request::Flush]
        );
        assert!(matches!(conn.destroy_window(id), Err(Error::UnknownWindow(_))));

        let reused = conn
            .create_window("again", Size::new(10, 10), Position::default())
            .unwrap();
        assert_eq!(reused, id);
    }

    #[test]
    fn show_and_hide_map_and_unmap() {
        let mut conn = connection();
        let id = conn
            .create_window("toggle", Size::new(10, 10), Position::default())
            .unwrap();
        let native = conn.window(id).unwrap().native().0;
        mock(&conn).clear_requests();

        conn.hide(id).unwrap();
        conn.show(id).unwrap();
        assert_eq!(
            mock(&conn).requests(),
            vec![
                Request::UnmapWindow(native),
                Request::Flush,
                Request::MapWindow(native),
                Request::Flush
            ]
        );
    }

    #[test]
    fn set_size_respects_bounds() {
        let mut conn = connection();
        let id = conn
            .create_window("sized", Size::new(800, 600), Position::default())
            .unwrap();
        conn.set_min_size(id, Size::new(200, 100)).unwrap();
        conn.set_max_size(id, Size::new(1000, 900)).unwrap();

        let err = conn.set_size(id, Size::new(1200, 300)).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { .. }));
        assert_eq!(conn.window(id).unwrap().size(), Size::new(800, 600));

        conn.set_size(id, Size::new(640, 480)).unwrap();
        assert_eq!(conn.window(id).unwrap().size(), Size::new(640, 480));
        let native = conn.window(id).unwrap().native().0;
        assert!(mock(&conn).requests().contains(&Request::Configure {
            window: native,
            x: None,
            y: None,
            width: Some(640),
            height: Some(480),
        }));
    }

    #[test]
    fn zero_sizes_are_invalid() {
        let mut conn = connection();
        let id = conn
            .create_window("zero", Size::new(800, 600), Position::default())
            .unwrap();
        mock(&conn).clear_requests();

        for size in [Size::new(0, 0), Size::new(0, 300), Size::new(300, 0)] {
            assert!(matches!(conn.set_size(id, size), Err(Error::InvalidArgument(_))));
            assert!(matches!(
                conn.set_max_size(id, size),
                Err(Error::InvalidArgument(_))
            ));
        }

        let window = conn.window(id).unwrap();
        assert_eq!(window.size(), Size::new(800, 600));
        assert_eq!(window.max_size(), Size::new(1920, 1080));
        assert!(mock(&conn).requests().is_empty());
    }

    #[test]
    fn bounds_must_stay_ordered() {
        let mut conn = connection();
        let id = conn
            .create_window("bounds", Size::new(800, 600), Position::default())
            .unwrap();

        assert!(conn.set_min_size(id, Size::new(3000, 10)).is_err());
        conn.set_min_size(id, Size::new(300, 200)).unwrap();
        assert!(conn.set_max_size(id, Size::new(299, 5000)).is_err());
        assert_eq!(conn.window(id).unwrap().min_size(), Size::new(300, 200));
        assert_eq!(conn.window(id).unwrap().max_size(), Size::new(1920, 1080));

        let native = conn.window(id).unwrap().native().0;
        let hints = mock(&conn).property(native, AtomEnum::WM_NORMAL_HINTS.into());
        assert_eq!(hints[0], P_MIN_SIZE | P_MAX_SIZE);
        assert_eq!(&hints[5..9], &[300, 200, 1920, 1080]);
    }

    #[test]
    fn set_position_and_title_update_cache() {
        let mut conn = connection();
        let id = conn
            .create_window("before", Size::new(10, 10), Position::default())
            .unwrap();

        conn.set_position(id, Position::new(-5, 40)).unwrap();
        conn.set_title(id, "after").unwrap();
        conn.set_icon_path(id, "/usr/share/icons/app.png").unwrap();

        let window = conn.window(id).unwrap();
        assert_eq!(window.position(), Position::new(-5, 40));
        assert_eq!(window.title(), "after");
        assert_eq!(
            window.icon_path(),
            Some(std::path::Path::new("/usr/share/icons/app.png"))
        );
        assert_eq!(
            mock(&conn).string_property(window.native().0, AtomEnum::WM_NAME.into()),
            b"after"
        );
    }

    #[test]
    fn set_state_declares_every_bit_and_replaces_cache() {
        let mut conn = connection();
        let id = conn
            .create_window("state", Size::new(10, 10), Position::default())
            .unwrap();
        let native = conn.window(id).unwrap().native().0;
        conn.set_state(id, WindowState::ABOVE | WindowState::STICKY).unwrap();
        mock(&conn).clear_requests();

        conn.set_state(id, WindowState::FULLSCREEN).unwrap();
        assert_eq!(conn.window(id).unwrap().state(), WindowState::FULLSCREEN);

        let m = mock(&conn);
        assert_eq!(
            m.property(native, m.atom("_NET_WM_STATE")),
            vec![m.atom("_NET_WM_STATE_FULLSCREEN")]
        );

        let messages: Vec<_> = m
            .requests()
            .into_iter()
            .filter_map(|r| match r {
                Request::SendEvent {
                    destination,
                    window,
                    data,
                    ..
                } => Some((destination, window, data[0], data[1])),
                _ => None,
            })
            .collect();
        assert_eq!(messages.len(), 13);
        assert!(messages.iter().all(|(dest, win, _, _)| *dest == ROOT && *win == native));
        let asserted: Vec<_> = messages
            .iter()
            .filter(|(_, _, action, _)| *action == 1)
            .map(|(_, _, _, atom)| *atom)
            .collect();
        assert_eq!(asserted, vec![m.atom("_NET_WM_STATE_FULLSCREEN")]);
        assert_eq!(m.requests().last(), Some(&Request::Flush));
    }

    #[test]
    fn maximize_survives_window_manager_confirmation() {
        let mut conn = connection();
        let id = conn
            .create_window("main", Size::new(960, 540), Position::new(10, 20))
            .unwrap();
        let native = conn.window(id).unwrap().native().0;

        conn.set_state(id, WindowState::MAXIMIZED_VERT | WindowState::MAXIMIZED_HORZ)
            .unwrap();

        let net_wm_state = conn.atoms().net_wm_state;
        mock(&conn).set_property(
            native,
            net_wm_state,
            &[
                conn.atoms().net_wm_state_maximized_vert,
                conn.atoms().net_wm_state_maximized_horz,
            ],
        );
        mock(&conn).push_event(RawEvent::PropertyNotify(PropertyNotifyEvent {
            response_type: PROPERTY_NOTIFY_EVENT,
            sequence: 0,
            window: native,
            atom: net_wm_state,
            time: 0,
            state: Property::NEW_VALUE,
        }));

        let mut event = Event::default();
        assert!(conn.poll_event(&mut event).unwrap());
        assert_eq!(
            event,
            Event::new(
                id,
                EventKind::StateChange {
                    state: WindowState::MAXIMIZED
                }
            )
        );

        let state = conn.window(id).unwrap().state();
        assert_eq!(state, WindowState::MAXIMIZED_VERT | WindowState::MAXIMIZED_HORZ);
        assert!(state.is_maximized());
        assert_eq!(state.bits().count_ones(), 2);
    }

    #[test]
    fn permissions_are_read_live() {
        let mut conn = connection();
        let id = conn
            .create_window("perm", Size::new(10, 10), Position::default())
            .unwrap();
        assert_eq!(conn.action_permissions(id).unwrap(), ActionPermissions::empty());

        let wanted = ActionPermissions::MOVE | ActionPermissions::RESIZE | ActionPermissions::CLOSE;
        conn.set_action_permissions(id, wanted).unwrap();
        assert_eq!(conn.action_permissions(id).unwrap(), wanted);

        // The window manager narrows them behind our back.
        let native = conn.window(id).unwrap().native().0;
        let atoms = conn.atoms().clone();
        mock(&conn).set_property(
            native,
            atoms.net_wm_allowed_actions,
            &[atoms.net_wm_action_close, 4242],
        );
        assert_eq!(conn.action_permissions(id).unwrap(), ActionPermissions::CLOSE);
    }

    #[test]
    fn bordered_and_window_type_write_hints() {
        let mut conn = connection();
        let id = conn
            .create_window("hints", Size::new(10, 10), Position::default())
            .unwrap();
        let native = conn.window(id).unwrap().native().0;

        conn.set_bordered(id, false).unwrap();
        conn.set_window_type(id, WindowType::Dialog).unwrap();

        let atoms = conn.atoms().clone();
        let m = mock(&conn);
        assert_eq!(
            m.property(native, atoms.motif_wm_hints),
            vec![MWM_HINTS_DECORATIONS, 0, 0, 0, 0]
        );
        assert_eq!(
            m.property(native, atoms.net_wm_window_type),
            vec![atoms.net_wm_window_type_dialog]
        );

        conn.set_bordered(id, true).unwrap();
        assert_eq!(mock(&conn).property(native, atoms.motif_wm_hints)[2], 1);
    }

    struct FakeVulkan;

    impl SurfaceFactory for FakeVulkan {
        type Instance = u64;
        type Surface = (u64, u32);

        fn create_surface(
            &self,
            window: NativeWindow,
            instance: &u64,
        ) -> std::result::Result<(u64, u32), SurfaceError> {
            if *instance == 0 {
                return Err(SurfaceError { code: -3 });
            }
            Ok((*instance, window.0))
        }
    }

    #[test]
    fn surface_factory_gets_the_native_handle() {
        let mut conn = connection();
        let id = conn
            .create_window("vk", Size::new(10, 10), Position::default())
            .unwrap();
        let native = conn.window(id).unwrap().native().0;

        assert_eq!(conn.create_surface(id, &FakeVulkan, &7).unwrap(), (7, native));
        assert!(matches!(
            conn.create_surface(id, &FakeVulkan, &0),
            Err(Error::Surface(SurfaceError { code: -3 }))
        ));
    }
}
