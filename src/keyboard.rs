use log::{info, warn};
use xcb::x::{self, ButtonIndex, ModMask};
use xcb::Connection;

use crate::key_mapping::{Action, Binding, Trigger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub keycode: u8,
    pub modifiers: ModMask,
    pub action: Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonBinding {
    pub button: ButtonIndex,
    pub modifiers: ModMask,
    pub action: Action,
}

/// The binding table with keysyms resolved to this server's keycodes.
/// Order follows the configured table; the first match wins.
#[derive(Debug, Default, Clone)]
pub struct Bindings {
    keys: Vec<KeyBinding>,
    buttons: Vec<ButtonBinding>,
}

impl Bindings {
    pub fn resolve(
        table: &[Binding],
        min_keycode: u8,
        keysyms: &[u32],
        keysyms_per_keycode: usize,
    ) -> Self {
        let mut bindings = Self::default();

        for mapping in table {
            let modifiers = mapping.modifier_mask();
            match mapping.trigger {
                Trigger::Button(button) => bindings.buttons.push(ButtonBinding {
                    button,
                    modifiers,
                    action: mapping.action,
                }),
                Trigger::Key(keysym) => {
                    if keysyms_per_keycode == 0 {
                        warn!("No keyboard mapping, dropping binding for {keysym:?}");
                        continue;
                    }
                    let found = keysyms
                        .chunks(keysyms_per_keycode)
                        .position(|chunk| chunk.contains(&keysym.raw()));
                    let Some(keycode) = found.and_then(|i| {
                        u8::try_from(i).ok().and_then(|i| min_keycode.checked_add(i))
                    }) else {
                        warn!("Keysym {keysym:?} is not on the keyboard, dropping binding");
                        continue;
                    };
                    info!(
                        "Mapped key {:?} (keycode: {}) with modifiers {:?} to action: {:?}",
                        keysym, keycode, modifiers, mapping.action
                    );
                    bindings.keys.push(KeyBinding {
                        keycode,
                        modifiers,
                        action: mapping.action,
                    });
                }
            }
        }

        bindings
    }

    pub fn key_action(&self, keycode: u8, modifiers: ModMask) -> Option<Action> {
        self.keys
            .iter()
            .find(|binding| binding.keycode == keycode && binding.modifiers == modifiers)
            .map(|binding| binding.action)
    }

    pub fn button_action(&self, button: u8, modifiers: ModMask) -> Option<Action> {
        self.buttons
            .iter()
            .find(|binding| binding.button as u8 == button && binding.modifiers == modifiers)
            .map(|binding| binding.action)
    }

    pub fn keys(&self) -> &[KeyBinding] {
        &self.keys
    }

    pub fn buttons(&self) -> &[ButtonBinding] {
        &self.buttons
    }
}

pub fn fetch_keyboard_mapping(conn: &Connection) -> (Vec<u32>, usize) {
    let setup = conn.get_setup();
    if let Ok(keyboard_mapping) = conn.wait_for_reply(conn.send_request(&x::GetKeyboardMapping {
        first_keycode: setup.min_keycode(),
        count: setup.max_keycode() - setup.min_keycode() + 1,
    })) {
        let keysyms_per_keycode = keyboard_mapping.keysyms_per_keycode() as usize;
        let keysyms = keyboard_mapping.keysyms().to_vec();
        (keysyms, keysyms_per_keycode)
    } else {
        warn!("Failed to get keyboard mapping, using empty keysyms");
        (vec![], 0)
    }
}
