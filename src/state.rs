use log::{debug, info};
use xcb::x::{KeyButMask, ModMask, Window};

use crate::{
    client::{Client, ClientRegistry},
    drag::{DragMode, DragSession},
    effect::{Effect, WindowChanges},
    error::WmError,
    geometry::{Point, Rect},
    key_mapping::Action,
    keyboard::Bindings,
};

mod framing;

pub use framing::Placement;

#[derive(Clone, Copy, Debug)]
pub struct FrameStyle {
    pub border_width: u32,
    pub border_pixel: u32,
    pub background_pixel: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct ButtonPress {
    pub window: Window,
    pub button: u8,
    pub modifiers: ModMask,
    pub pointer: Point,
}

pub struct State {
    root: Window,
    style: FrameStyle,
    bindings: Bindings,
    clients: ClientRegistry,
    focused: Option<Window>,
    drag: Option<DragSession>,
    running: bool,
}

impl State {
    pub fn new(root: Window, style: FrameStyle, bindings: Bindings, capacity: usize) -> Self {
        Self {
            root,
            style,
            bindings,
            clients: ClientRegistry::with_capacity(capacity),
            focused: None,
            drag: None,
            running: true,
        }
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    pub const fn focused_window(&self) -> Option<Window> {
        self.focused
    }

    #[cfg(test)]
    pub const fn drag_session(&self) -> Option<DragSession> {
        self.drag
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn find_frame(&self, window: Window) -> Option<Window> {
        self.clients.find_frame(window)
    }

    pub fn is_framed(&self, window: Window) -> bool {
        self.clients.contains(window)
    }

    pub fn ensure_room(&self) -> Result<(), WmError> {
        self.clients.ensure_room()
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    fn set_focus(&mut self, window: Window) -> Vec<Effect> {
        self.focused = Some(window);
        vec![Effect::Focus(window)]
    }

    fn close_focused(&self) -> Vec<Effect> {
        match self.focused {
            Some(window) => {
                info!("Killing client window: {window:?}");
                vec![Effect::KillClient(window)]
            }
            None => {
                debug!("No focused window to close");
                vec![]
            }
        }
    }

    pub fn apply_action(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::CloseFocused => self.close_focused(),
            Action::Launch(argv) => vec![Effect::Spawn(argv)],
            Action::Move | Action::Resize => {
                debug!("{action:?} only applies to pointer bindings");
                vec![]
            }
            Action::Quit => {
                info!("Quit requested");
                self.running = false;
                vec![]
            }
        }
    }

    /// `placement` is `None` when the window is already framed or its
    /// geometry could not be queried; the window is then only mapped.
    pub fn on_map_request(
        &mut self,
        window: Window,
        placement: Option<Placement>,
    ) -> Result<Vec<Effect>, WmError> {
        let mut effects = match placement {
            Some(placement) => self.frame(window, placement)?,
            None => Vec::new(),
        };
        effects.push(Effect::Map(window));
        Ok(effects)
    }

    pub fn on_unmap_notify(&mut self, event_window: Window, window: Window) -> Vec<Effect> {
        // Reparenting a window out of root reports an unmap to root.
        if event_window == self.root {
            debug!("Ignoring unmap of {window:?} reported to root");
            return vec![];
        }
        self.unframe(window)
    }

    pub fn on_configure_request(&mut self, window: Window, changes: WindowChanges) -> Vec<Effect> {
        let mut effects = Vec::with_capacity(3);
        if let Some(frame) = self.clients.find_frame(window) {
            effects.push(Effect::Configure {
                window: frame,
                changes,
            });
        }
        effects.push(Effect::Configure { window, changes });
        effects.push(Effect::Sync);
        effects
    }

    pub fn on_button_press(&mut self, press: ButtonPress, frame_geometry: Option<Rect>) -> Vec<Effect> {
        let Some(frame) = self.clients.find_frame(press.window) else {
            debug!("Button press on unmanaged window {:?}", press.window);
            return vec![];
        };

        let mut effects = vec![Effect::Raise(frame)];
        effects.extend(self.set_focus(press.window));

        let mode = match self.bindings.button_action(press.button, press.modifiers) {
            Some(Action::Move) => Some(DragMode::Move),
            Some(Action::Resize) => Some(DragMode::Resize),
            Some(action) => {
                effects.extend(self.apply_action(action));
                None
            }
            None => DragMode::for_button(press.button),
        };

        self.drag = mode.zip(frame_geometry).map(|(mode, geometry)| {
            debug!("Starting {mode:?} of {:?} from {geometry:?}", press.window);
            DragSession::new(press.window, press.button, mode, press.pointer, geometry)
        });

        effects
    }

    pub fn on_motion_notify(&mut self, window: Window, pointer: Point, state: KeyButMask) -> Vec<Effect> {
        let Some(drag) = self.drag else {
            return vec![];
        };
        if drag.window() != window || !drag.is_held(state) {
            return vec![];
        }
        let Some(frame) = self.clients.find_frame(window) else {
            return vec![];
        };

        let geometry = drag.geometry_at(pointer);
        match drag.mode() {
            DragMode::Move => vec![Effect::Move {
                window: frame,
                x: geometry.x,
                y: geometry.y,
            }],
            DragMode::Resize => vec![
                Effect::Resize {
                    window: frame,
                    w: geometry.w,
                    h: geometry.h,
                },
                Effect::Resize {
                    window,
                    w: geometry.w,
                    h: geometry.h,
                },
            ],
        }
    }

    pub fn on_key_press(&mut self, keycode: u8, modifiers: ModMask) -> Vec<Effect> {
        match self.bindings.key_action(keycode, modifiers) {
            Some(action) => self.apply_action(action),
            None => {
                debug!("No binding found for keycode: {keycode} with modifiers: {modifiers:?}");
                vec![]
            }
        }
    }

    pub fn on_focus_in(&mut self, window: Window) -> Vec<Effect> {
        let Some(frame) = self.clients.find_frame(window) else {
            return vec![];
        };
        self.focused = Some(window);
        vec![Effect::Raise(frame)]
    }

    pub fn on_enter_notify(&mut self, window: Window) -> Vec<Effect> {
        debug!("Pointer entered {window:?}");
        vec![]
    }

    /// Hands every client back to root, used on shutdown.
    pub fn release_clients(&mut self) -> Vec<Effect> {
        let windows: Vec<Window> = self.clients.iter().map(Client::window).collect();
        let mut effects = Vec::new();
        for window in windows {
            effects.extend(self.unframe(window));
        }
        effects
    }
}
