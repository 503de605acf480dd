use xcb::x::{ButtonIndex, KeyButMask, ModMask};
use xkbcommon::xkb::Keysym;

#[derive(Debug, Copy, Clone)]
pub enum Trigger {
    Key(Keysym),
    Button(ButtonIndex),
}

pub struct Binding {
    pub trigger: Trigger,
    pub modifiers: &'static [ModMask],
    pub action: Action,
}

impl Binding {
    pub fn modifier_mask(&self) -> ModMask {
        self.modifiers
            .iter()
            .copied()
            .reduce(|acc, modkey| acc | modkey)
            .unwrap_or(ModMask::empty())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    CloseFocused,
    Launch(&'static [&'static str]),
    Move,
    Resize,
    Quit,
}

/// Modifier state of an input event with caps lock and num lock ignored.
pub fn clean_modifiers(state: KeyButMask) -> ModMask {
    let ignored = ModMask::LOCK.bits() | ModMask::N2.bits();
    ModMask::from_bits_truncate(state.bits() & !ignored)
}
