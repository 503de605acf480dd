use log::info;
use xcb::x::Window;

use super::State;
use crate::{effect::Effect, error::WmError, geometry::Rect};

/// Where a new frame goes: a freshly allocated id and the client's current
/// geometry as reported by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub frame: Window,
    pub geometry: Rect,
}

impl State {
    /// Wraps `window` in a new frame. Registration happens before any effect
    /// is produced, so a full registry leaves the window untouched.
    pub fn frame(&mut self, window: Window, placement: Placement) -> Result<Vec<Effect>, WmError> {
        if self.clients.contains(window) {
            return Ok(vec![]);
        }
        self.clients.register(window, placement.frame)?;

        let frame = placement.frame;
        let mut effects = vec![
            Effect::CreateFrame {
                frame,
                parent: self.root,
                geometry: placement.geometry,
                border_width: self.style.border_width,
                border_pixel: self.style.border_pixel,
                background_pixel: self.style.background_pixel,
            },
            Effect::AddToSaveSet(window),
            Effect::Reparent {
                window,
                parent: frame,
                x: 0,
                y: 0,
            },
            Effect::Map(frame),
            Effect::SelectClientInput(window),
        ];
        effects.extend(self.grab_bindings(window));

        info!("Framed {window:?} in {frame:?}");
        Ok(effects)
    }

    /// Puts `window` back under root and destroys its frame. Windows that
    /// were never framed are ignored.
    pub fn unframe(&mut self, window: Window) -> Vec<Effect> {
        let Some(client) = self.clients.remove(window) else {
            return vec![];
        };
        let frame = client.frame();

        if self.focused == Some(window) {
            self.focused = None;
        }
        if self.drag.is_some_and(|drag| drag.window() == window) {
            self.drag = None;
        }

        info!("Unframed {window:?} from {frame:?}");
        vec![
            Effect::Unmap(frame),
            Effect::Reparent {
                window,
                parent: self.root,
                x: 0,
                y: 0,
            },
            Effect::RemoveFromSaveSet(window),
            Effect::Destroy(frame),
        ]
    }

    fn grab_bindings(&self, window: Window) -> Vec<Effect> {
        let keys = self.bindings.keys().iter().map(|binding| Effect::GrabKey {
            keycode: binding.keycode,
            modifiers: binding.modifiers,
            grab_window: window,
        });
        let buttons = self.bindings.buttons().iter().map(|binding| Effect::GrabButton {
            button: binding.button,
            modifiers: binding.modifiers,
            grab_window: window,
        });
        keys.chain(buttons).collect()
    }
}
