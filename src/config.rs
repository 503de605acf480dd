use crate::key_mapping::{Action, Binding, Trigger};
use xcb::x::{ButtonIndex, ModMask};
use xkbcommon::xkb::Keysym;

pub const FRAME_BORDER_WIDTH: u32 = 2;
pub const FRAME_BORDER_PIXEL: u32 = 0x00ff97;
pub const FRAME_BACKGROUND_PIXEL: u32 = 0xffffff;
pub const CLIENT_CAPACITY: usize = 256;

const MOD: &[ModMask] = &[ModMask::N1, ModMask::CONTROL];
const MOD_SHIFT: &[ModMask] = &[ModMask::N1, ModMask::CONTROL, ModMask::SHIFT];

const TERMINAL: &[&str] = &["st"];

pub const AUTOSTART: &[&str] = &[
    "/bin/sh",
    "-c",
    "f=\"${XDG_CONFIG_HOME:-$HOME/.config}/framewm/autostart.sh\"; [ -x \"$f\" ] && exec \"$f\"",
];

pub static BINDINGS: &[Binding] = &[
    Binding {
        trigger: Trigger::Key(Keysym::c),
        modifiers: MOD,
        action: Action::CloseFocused,
    },
    Binding {
        trigger: Trigger::Key(Keysym::s),
        modifiers: MOD,
        action: Action::Launch(TERMINAL),
    },
    Binding {
        trigger: Trigger::Key(Keysym::q),
        modifiers: MOD_SHIFT,
        action: Action::Quit,
    },
    Binding {
        trigger: Trigger::Button(ButtonIndex::N1),
        modifiers: MOD,
        action: Action::Move,
    },
    Binding {
        trigger: Trigger::Button(ButtonIndex::N3),
        modifiers: MOD,
        action: Action::Resize,
    },
];
