use log::{debug, error, info, warn};
use xcb::{
    x::{self, Window},
    Connection,
};

use crate::{
    config::{
        AUTOSTART, BINDINGS, CLIENT_CAPACITY, FRAME_BACKGROUND_PIXEL, FRAME_BORDER_PIXEL,
        FRAME_BORDER_WIDTH,
    },
    effect::Effect,
    error::WmError,
    geometry::Point,
    key_mapping::clean_modifiers,
    keyboard::{fetch_keyboard_mapping, Bindings},
    spawn,
    state::{ButtonPress, FrameStyle, Placement, State},
    x11::{window_changes, X11},
};

pub struct WindowManager {
    x11: X11,
    state: State,
}

impl WindowManager {
    pub fn new() -> Result<Self, WmError> {
        let (conn, screen_num) = Connection::connect(None).map_err(WmError::Connection)?;
        info!("Connected to X.");

        let root = conn
            .get_setup()
            .roots()
            .nth(usize::try_from(screen_num).unwrap_or(0))
            .ok_or(WmError::NoScreen)?
            .root();
        let x11 = X11::new(conn, root);

        if let Err(e) = x11.set_root_event_mask() {
            debug!("Substructure redirect on root rejected: {e:?}");
            return Err(WmError::AnotherWmRunning);
        }
        info!("Successfully set substructure redirect");

        let bindings = Self::resolve_bindings(x11.connection());
        let style = FrameStyle {
            border_width: FRAME_BORDER_WIDTH,
            border_pixel: FRAME_BORDER_PIXEL,
            background_pixel: FRAME_BACKGROUND_PIXEL,
        };
        let state = State::new(root, style, bindings, CLIENT_CAPACITY);

        let mut wm = Self { x11, state };
        wm.set_root_keygrabs();
        spawn::launch(AUTOSTART);
        wm.adopt_existing_windows();

        Ok(wm)
    }

    fn resolve_bindings(conn: &Connection) -> Bindings {
        let (keysyms, keysyms_per_keycode) = fetch_keyboard_mapping(conn);
        Bindings::resolve(
            BINDINGS,
            conn.get_setup().min_keycode(),
            &keysyms,
            keysyms_per_keycode,
        )
    }

    fn set_root_keygrabs(&self) {
        for binding in self.state.bindings().keys() {
            match self.x11.grab_key_checked(binding.keycode, binding.modifiers) {
                Ok(()) => info!(
                    "Successfully grabbed key: keycode {} with modifiers {:?}",
                    binding.keycode, binding.modifiers
                ),
                Err(e) => warn!("Failed to grab key {}: {e:?}", binding.keycode),
            }
        }
    }

    fn adopt_existing_windows(&mut self) {
        let children = match self.x11.get_root_window_children() {
            Ok(children) => children,
            Err(e) => {
                warn!("Failed to query existing windows: {e:?}");
                return;
            }
        };

        for window in children {
            if !self.x11.is_adoptable(window) {
                continue;
            }
            if let Err(e) = self.state.ensure_room() {
                error!("Cannot adopt {window:?}: {e}");
                break;
            }
            let Some(placement) = self.placement_for(window) else {
                continue;
            };
            match self.state.frame(window, placement) {
                Ok(effects) => self.x11.apply_effects(&effects),
                Err(e) => {
                    error!("Cannot adopt {window:?}: {e}");
                    break;
                }
            }
        }
    }

    fn placement_for(&self, window: Window) -> Option<Placement> {
        match self.x11.get_geometry(window) {
            Ok(geometry) => Some(Placement {
                frame: self.x11.generate_id(),
                geometry,
            }),
            Err(e) => {
                warn!("Failed to query geometry of {window:?}: {e:?}");
                None
            }
        }
    }

    fn handle_map_request(&mut self, window: Window) -> Vec<Effect> {
        let placement = if self.state.is_framed(window) {
            None
        } else {
            // Refuse before allocating a frame id that would go unused.
            if let Err(e) = self.state.ensure_room() {
                error!("Leaving {window:?} unframed: {e}");
                return vec![Effect::Map(window)];
            }
            self.placement_for(window)
        };

        match self.state.on_map_request(window, placement) {
            Ok(effects) => effects,
            Err(e) => {
                error!("Leaving {window:?} unframed: {e}");
                vec![Effect::Map(window)]
            }
        }
    }

    fn handle_button_press(&mut self, ev: &x::ButtonPressEvent) -> Vec<Effect> {
        let window = ev.event();
        let frame_geometry = self
            .state
            .find_frame(window)
            .and_then(|frame| match self.x11.get_geometry(frame) {
                Ok(geometry) => Some(geometry),
                Err(e) => {
                    warn!("Failed to query frame geometry of {window:?}: {e:?}");
                    None
                }
            });

        let press = ButtonPress {
            window,
            button: ev.detail(),
            modifiers: clean_modifiers(ev.state()),
            pointer: Point::new(i32::from(ev.root_x()), i32::from(ev.root_y())),
        };
        self.state.on_button_press(press, frame_geometry)
    }

    fn handle_motion_notify(&mut self, ev: x::MotionNotifyEvent) -> Vec<Effect> {
        let ev = self.x11.coalesce_motion(ev);
        let pointer = Point::new(i32::from(ev.root_x()), i32::from(ev.root_y()));
        self.state.on_motion_notify(ev.event(), pointer, ev.state())
    }

    fn handle_focus_in(&mut self, ev: &x::FocusInEvent) -> Vec<Effect> {
        match ev.mode() {
            x::NotifyMode::Grab | x::NotifyMode::Ungrab => vec![],
            _ => self.state.on_focus_in(ev.event()),
        }
    }

    fn dispatch(&mut self, event: xcb::Event) {
        let effects = match event {
            xcb::Event::X(x::Event::MapRequest(ev)) => {
                debug!("Received MapRequest event for window: {:?}", ev.window());
                self.handle_map_request(ev.window())
            }

            xcb::Event::X(x::Event::UnmapNotify(ev)) => {
                debug!(
                    "Received UnmapNotify for {:?} reported to {:?}",
                    ev.window(),
                    ev.event()
                );
                self.state.on_unmap_notify(ev.event(), ev.window())
            }

            xcb::Event::X(x::Event::ConfigureRequest(ev)) => {
                debug!("Received ConfigureRequest for window: {:?}", ev.window());
                self.state
                    .on_configure_request(ev.window(), window_changes(&ev))
            }

            xcb::Event::X(x::Event::ButtonPress(ev)) => {
                debug!("Received ButtonPress event: {:?}", ev);
                self.handle_button_press(&ev)
            }

            xcb::Event::X(x::Event::KeyPress(ev)) => {
                debug!("Received KeyPress event: {:?}", ev);
                self.state
                    .on_key_press(ev.detail(), clean_modifiers(ev.state()))
            }

            xcb::Event::X(x::Event::MotionNotify(ev)) => self.handle_motion_notify(ev),

            xcb::Event::X(x::Event::FocusIn(ev)) => {
                debug!("Received FocusIn for window: {:?}", ev.event());
                self.handle_focus_in(&ev)
            }

            xcb::Event::X(x::Event::EnterNotify(ev)) => self.state.on_enter_notify(ev.event()),

            ev => {
                debug!("Ignoring event: {:?}", ev);
                vec![]
            }
        };

        self.x11.apply_effects(&effects);
    }

    pub fn run(&mut self) -> Result<(), WmError> {
        while self.state.is_running() {
            match self.x11.wait_for_event() {
                Ok(event) => self.dispatch(event),
                Err(xcb::Error::Protocol(e)) => error!("X error: {e:?}"),
                Err(e) => return Err(e.into()),
            }
        }

        info!("Releasing {} clients", self.state.client_count());
        let effects = self.state.release_clients();
        self.x11.apply_effects(&effects);
        self.x11.sync();
        Ok(())
    }
}
