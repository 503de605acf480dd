use xcb::x::{ButtonIndex, ModMask, StackMode, Window};

use crate::geometry::Rect;

/// Fields of a ConfigureWindow request; `None` leaves the attribute as is.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowChanges {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub border_width: Option<u32>,
    pub sibling: Option<Window>,
    pub stack_mode: Option<StackMode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Map(Window),
    Unmap(Window),
    Focus(Window),
    Raise(Window),
    Destroy(Window),
    CreateFrame {
        frame: Window,
        parent: Window,
        geometry: Rect,
        border_width: u32,
        border_pixel: u32,
        background_pixel: u32,
    },
    Reparent {
        window: Window,
        parent: Window,
        x: i32,
        y: i32,
    },
    AddToSaveSet(Window),
    RemoveFromSaveSet(Window),
    SelectClientInput(Window),
    Move {
        window: Window,
        x: i32,
        y: i32,
    },
    Resize {
        window: Window,
        w: u32,
        h: u32,
    },
    Configure {
        window: Window,
        changes: WindowChanges,
    },
    Sync,
    KillClient(Window),
    GrabKey {
        keycode: u8,
        modifiers: ModMask,
        grab_window: Window,
    },
    GrabButton {
        button: ButtonIndex,
        modifiers: ModMask,
        grab_window: Window,
    },
    Spawn(&'static [&'static str]),
}
