use xcb::x::{KeyButMask, Window};

use crate::geometry::{Point, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Move,
    Resize,
}

impl DragMode {
    /// Mode for a press that matched no pointer binding.
    pub const fn for_button(button: u8) -> Option<Self> {
        match button {
            1 => Some(DragMode::Move),
            3 => Some(DragMode::Resize),
            _ => None,
        }
    }
}

/// Snapshot taken on button press. Overwritten by the next press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragSession {
    window: Window,
    button: u8,
    mode: DragMode,
    pointer_start: Point,
    frame_start: Rect,
}

impl DragSession {
    pub const fn new(
        window: Window,
        button: u8,
        mode: DragMode,
        pointer_start: Point,
        frame_start: Rect,
    ) -> Self {
        Self {
            window,
            button,
            mode,
            pointer_start,
            frame_start,
        }
    }

    pub const fn window(&self) -> Window {
        self.window
    }

    pub const fn mode(&self) -> DragMode {
        self.mode
    }

    /// Whether the button that started the session is still down in `state`.
    pub fn is_held(&self, state: KeyButMask) -> bool {
        if !(1..=5).contains(&self.button) {
            return false;
        }
        let mask = KeyButMask::BUTTON1.bits() << (self.button - 1);
        state.bits() & mask != 0
    }

    /// Frame geometry for the pointer at `pointer`, in root coordinates.
    pub fn geometry_at(&self, pointer: Point) -> Rect {
        let delta = pointer - self.pointer_start;
        match self.mode {
            DragMode::Move => self.frame_start.translate(delta),
            DragMode::Resize => self.frame_start.grow(delta),
        }
    }
}

#[cfg(test)]
mod drag_tests {
    use xcb::XidNew;

    use super::*;

    fn session(mode: DragMode, button: u8) -> DragSession {
        DragSession::new(
            Window::new(1),
            button,
            mode,
            Point::new(50, 50),
            Rect::new(100, 100, 200, 150),
        )
    }

    #[test]
    fn test_move_follows_pointer_delta() {
        let drag = session(DragMode::Move, 1);
        assert_eq!(
            drag.geometry_at(Point::new(70, 45)),
            Rect::new(120, 95, 200, 150)
        );
    }

    #[test]
    fn test_resize_clamps_to_one_pixel() {
        let drag = session(DragMode::Resize, 3);
        assert_eq!(
            drag.geometry_at(Point::new(50 - 250, 50 + 10)),
            Rect::new(100, 100, 1, 160)
        );
    }

    #[test]
    fn test_deltas_are_relative_to_press_not_previous_motion() {
        let drag = session(DragMode::Move, 1);
        let _ = drag.geometry_at(Point::new(500, 500));
        assert_eq!(
            drag.geometry_at(Point::new(51, 51)),
            Rect::new(101, 101, 200, 150)
        );
    }

    #[test]
    fn test_is_held() {
        let move_drag = session(DragMode::Move, 1);
        assert!(move_drag.is_held(KeyButMask::BUTTON1));
        assert!(move_drag.is_held(KeyButMask::BUTTON1 | KeyButMask::CONTROL));
        assert!(!move_drag.is_held(KeyButMask::BUTTON3));
        assert!(!move_drag.is_held(KeyButMask::empty()));

        let resize_drag = session(DragMode::Resize, 3);
        assert!(resize_drag.is_held(KeyButMask::BUTTON3));
        assert!(!resize_drag.is_held(KeyButMask::BUTTON1));

        assert!(!session(DragMode::Move, 0).is_held(KeyButMask::BUTTON1));
    }

    #[test]
    fn test_mode_for_unbound_button() {
        assert_eq!(DragMode::for_button(1), Some(DragMode::Move));
        assert_eq!(DragMode::for_button(3), Some(DragMode::Resize));
        assert_eq!(DragMode::for_button(2), None);
    }
}
