use std::collections::VecDeque;

use crate::{
    effect::{Effect, WindowChanges},
    geometry::Rect,
    spawn,
};
use log::{debug, error, warn};
use xcb::{
    x::{self, EventMask, Window},
    Connection, ProtocolError, Xid,
};

pub struct X11 {
    conn: Connection,
    root: Window,
    backlog: VecDeque<xcb::Result<xcb::Event>>,
}

impl X11 {
    pub fn new(conn: Connection, root: Window) -> Self {
        Self {
            conn,
            root,
            backlog: VecDeque::new(),
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn generate_id(&self) -> Window {
        self.conn.generate_id()
    }

    pub fn wait_for_event(&mut self) -> xcb::Result<xcb::Event> {
        match self.backlog.pop_front() {
            Some(event) => event,
            None => self.conn.wait_for_event(),
        }
    }

    /// Replaces `latest` with the newest pending motion for the same window.
    /// Whatever ends the drain is kept for the next `wait_for_event`.
    pub fn coalesce_motion(&mut self, latest: x::MotionNotifyEvent) -> x::MotionNotifyEvent {
        // poll_for_event also reads the socket, so a fast drag folds more than
        // what xcb has already buffered.
        let (latest, pending) = drain_motion(latest, || self.conn.poll_for_event());
        self.backlog.extend(pending);
        latest
    }

    pub fn apply_effects(&self, effects: &[Effect]) {
        for effect in effects {
            self.send_effect(effect);
        }

        if let Err(e) = self.flush() {
            error!("Failed to flush X connection: {e:?}");
        }
    }

    pub fn send_effect(&self, effect: &Effect) {
        match effect {
            Effect::Map(window) => {
                self.conn.send_request(&x::MapWindow { window: *window });
            }
            Effect::Unmap(window) => {
                self.conn.send_request(&x::UnmapWindow { window: *window });
            }
            Effect::Focus(window) => self.focus_window(*window),
            Effect::Raise(window) => self.raise_window(*window),
            Effect::Destroy(window) => {
                self.conn.send_request(&x::DestroyWindow { window: *window });
            }
            Effect::CreateFrame {
                frame,
                parent,
                geometry,
                border_width,
                border_pixel,
                background_pixel,
            } => self.create_frame(
                *frame,
                *parent,
                *geometry,
                *border_width,
                *border_pixel,
                *background_pixel,
            ),
            Effect::Reparent {
                window,
                parent,
                x,
                y,
            } => {
                self.conn.send_request(&x::ReparentWindow {
                    window: *window,
                    parent: *parent,
                    x: clamp_i16(*x),
                    y: clamp_i16(*y),
                });
            }
            Effect::AddToSaveSet(window) => self.change_save_set(*window, x::SetMode::Insert),
            Effect::RemoveFromSaveSet(window) => self.change_save_set(*window, x::SetMode::Delete),
            Effect::SelectClientInput(window) => {
                self.conn.send_request(&x::ChangeWindowAttributes {
                    window: *window,
                    value_list: &[x::Cw::EventMask(
                        EventMask::ENTER_WINDOW | EventMask::FOCUS_CHANGE,
                    )],
                });
            }
            Effect::Move { window, x, y } => {
                self.configure(*window, &[x::ConfigWindow::X(*x), x::ConfigWindow::Y(*y)]);
            }
            Effect::Resize { window, w, h } => {
                self.configure(
                    *window,
                    &[x::ConfigWindow::Width(*w), x::ConfigWindow::Height(*h)],
                );
            }
            Effect::Configure { window, changes } => {
                self.configure(*window, &config_values(changes));
            }
            Effect::Sync => self.sync(),
            Effect::KillClient(window) => {
                self.conn.send_request(&x::KillClient {
                    resource: window.resource_id(),
                });
            }
            Effect::GrabKey {
                keycode,
                modifiers,
                grab_window,
            } => {
                self.conn.send_request(&x::GrabKey {
                    owner_events: false,
                    grab_window: *grab_window,
                    modifiers: *modifiers,
                    key: *keycode,
                    pointer_mode: x::GrabMode::Async,
                    keyboard_mode: x::GrabMode::Async,
                });
            }
            Effect::GrabButton {
                button,
                modifiers,
                grab_window,
            } => {
                self.conn.send_request(&x::GrabButton {
                    owner_events: false,
                    grab_window: *grab_window,
                    event_mask: EventMask::BUTTON_PRESS
                        | EventMask::BUTTON_RELEASE
                        | EventMask::BUTTON_MOTION,
                    pointer_mode: x::GrabMode::Async,
                    keyboard_mode: x::GrabMode::Async,
                    confine_to: Window::none(),
                    cursor: x::Cursor::none(),
                    button: *button,
                    modifiers: *modifiers,
                });
            }
            Effect::Spawn(argv) => spawn::launch(argv),
        }
    }

    fn focus_window(&self, window: Window) {
        self.conn.send_request(&x::SetInputFocus {
            revert_to: x::InputFocus::PointerRoot,
            focus: window,
            time: x::CURRENT_TIME,
        });
    }

    fn raise_window(&self, window: Window) {
        self.configure(window, &[x::ConfigWindow::StackMode(x::StackMode::Above)]);
    }

    fn configure(&self, window: Window, value_list: &[x::ConfigWindow]) {
        self.conn.send_request(&x::ConfigureWindow { window, value_list });
    }

    fn change_save_set(&self, window: Window, mode: x::SetMode) {
        self.conn.send_request(&x::ChangeSaveSet { mode, window });
    }

    fn create_frame(
        &self,
        frame: Window,
        parent: Window,
        geometry: Rect,
        border_width: u32,
        border_pixel: u32,
        background_pixel: u32,
    ) {
        let values = [
            x::Cw::BackPixel(background_pixel),
            x::Cw::BorderPixel(border_pixel),
            x::Cw::EventMask(EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY),
        ];
        self.conn.send_request(&x::CreateWindow {
            depth: 0,
            wid: frame,
            parent,
            x: clamp_i16(geometry.x),
            y: clamp_i16(geometry.y),
            width: clamp_u16(geometry.w.max(1)),
            height: clamp_u16(geometry.h.max(1)),
            border_width: clamp_u16(border_width),
            class: x::WindowClass::InputOutput,
            visual: 0,
            value_list: &values,
        });
    }

    /// Round-trip to the server so every request sent so far has been
    /// processed.
    pub fn sync(&self) {
        let cookie = self.conn.send_request(&x::GetInputFocus {});
        if let Err(e) = self.conn.wait_for_reply(cookie) {
            warn!("Sync with X server failed: {e:?}");
        }
    }

    pub fn flush(&self) -> xcb::Result<()> {
        self.conn.flush().map_err(Into::into)
    }

    pub fn set_root_event_mask(&self) -> Result<(), ProtocolError> {
        let values = [x::Cw::EventMask(
            EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY,
        )];
        self.conn
            .send_and_check_request(&x::ChangeWindowAttributes {
                window: self.root,
                value_list: &values,
            })
    }

    pub fn grab_key_checked(&self, keycode: u8, modifiers: x::ModMask) -> Result<(), ProtocolError> {
        self.conn.send_and_check_request(&x::GrabKey {
            owner_events: false,
            grab_window: self.root,
            modifiers,
            key: keycode,
            pointer_mode: x::GrabMode::Async,
            keyboard_mode: x::GrabMode::Async,
        })
    }

    pub fn get_geometry(&self, window: Window) -> xcb::Result<Rect> {
        let cookie = self.conn.send_request(&x::GetGeometry {
            drawable: x::Drawable::Window(window),
        });
        let reply = self.conn.wait_for_reply(cookie)?;
        Ok(Rect::new(
            i32::from(reply.x()),
            i32::from(reply.y()),
            u32::from(reply.width()),
            u32::from(reply.height()),
        ))
    }

    pub fn get_root_window_children(&self) -> Result<Vec<Window>, xcb::Error> {
        let cookie = self.conn.send_request(&x::QueryTree { window: self.root });
        let reply = self.conn.wait_for_reply(cookie)?;
        Ok(reply.children().to_vec())
    }

    /// Whether `window` is a mapped top-level the manager should adopt.
    pub fn is_adoptable(&self, window: Window) -> bool {
        let cookie = self.conn.send_request(&x::GetWindowAttributes { window });
        match self.conn.wait_for_reply(cookie) {
            Ok(attrs) => !attrs.override_redirect() && attrs.map_state() == x::MapState::Viewable,
            Err(e) => {
                debug!("Skipping {window:?}: {e:?}");
                false
            }
        }
    }
}

/// Folds motion events for `latest.event()` into the newest one. Draining
/// stops at the first other event or error, which is returned unconsumed so
/// event order is preserved.
fn drain_motion(
    mut latest: x::MotionNotifyEvent,
    mut next: impl FnMut() -> xcb::Result<Option<xcb::Event>>,
) -> (x::MotionNotifyEvent, Option<xcb::Result<xcb::Event>>) {
    let mut dropped = 0usize;
    let pending = loop {
        match next() {
            Ok(Some(xcb::Event::X(x::Event::MotionNotify(ev)))) if ev.event() == latest.event() => {
                latest = ev;
                dropped += 1;
            }
            Ok(Some(other)) => break Some(Ok(other)),
            Ok(None) => break None,
            Err(e) => break Some(Err(e)),
        }
    };
    if dropped > 0 {
        debug!("Coalesced {dropped} motion events");
    }
    (latest, pending)
}

pub fn window_changes(ev: &x::ConfigureRequestEvent) -> WindowChanges {
    let mask = ev.value_mask();
    let has = |flag: x::ConfigWindowMask| mask.contains(flag);
    WindowChanges {
        x: has(x::ConfigWindowMask::X).then(|| i32::from(ev.x())),
        y: has(x::ConfigWindowMask::Y).then(|| i32::from(ev.y())),
        width: has(x::ConfigWindowMask::WIDTH).then(|| u32::from(ev.width())),
        height: has(x::ConfigWindowMask::HEIGHT).then(|| u32::from(ev.height())),
        border_width: has(x::ConfigWindowMask::BORDER_WIDTH).then(|| u32::from(ev.border_width())),
        sibling: has(x::ConfigWindowMask::SIBLING).then(|| ev.sibling()),
        stack_mode: has(x::ConfigWindowMask::STACK_MODE).then(|| ev.stack_mode()),
    }
}

/// ConfigureWindow values in the order the protocol requires.
fn config_values(changes: &WindowChanges) -> Vec<x::ConfigWindow> {
    let mut values = Vec::with_capacity(7);
    if let Some(x) = changes.x {
        values.push(x::ConfigWindow::X(x));
    }
    if let Some(y) = changes.y {
        values.push(x::ConfigWindow::Y(y));
    }
    if let Some(width) = changes.width {
        values.push(x::ConfigWindow::Width(width));
    }
    if let Some(height) = changes.height {
        values.push(x::ConfigWindow::Height(height));
    }
    if let Some(border_width) = changes.border_width {
        values.push(x::ConfigWindow::BorderWidth(border_width));
    }
    if let Some(sibling) = changes.sibling {
        values.push(x::ConfigWindow::Sibling(sibling));
    }
    if let Some(stack_mode) = changes.stack_mode {
        values.push(x::ConfigWindow::StackMode(stack_mode));
    }
    values
}

fn clamp_i16(v: i32) -> i16 {
    v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

fn clamp_u16(v: u32) -> u16 {
    v.min(u32::from(u16::MAX)) as u16
}
