use xcb::x::Window;

use crate::error::WmError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Client {
    window: Window,
    frame: Window,
}

impl Client {
    pub const fn window(&self) -> Window {
        self.window
    }

    pub const fn frame(&self) -> Window {
        self.frame
    }
}

/// Fixed-capacity table of application windows and the frames wrapping them.
///
/// Slots are never compacted: removing a client empties its slot in place,
/// and `register` fills the lowest empty slot before advancing `top`.
#[derive(Debug)]
pub struct ClientRegistry {
    slots: Box<[Option<Client>]>,
    top: usize,
}

impl ClientRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity].into_boxed_slice(),
            top: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find_frame(&self, window: Window) -> Option<Window> {
        self.iter()
            .find(|client| client.window == window)
            .map(Client::frame)
    }

    pub fn contains(&self, window: Window) -> bool {
        self.find_frame(window).is_some()
    }

    /// Fails with `CapacityExceeded` when no slot is free for a new client.
    pub fn ensure_room(&self) -> Result<(), WmError> {
        if self.len() < self.capacity() {
            Ok(())
        } else {
            Err(WmError::CapacityExceeded {
                capacity: self.capacity(),
            })
        }
    }

    /// Returns `Ok(false)` without touching the table when `window` is
    /// already registered.
    pub fn register(&mut self, window: Window, frame: Window) -> Result<bool, WmError> {
        if self.contains(window) {
            return Ok(false);
        }

        let slot = match self.slots[..self.top].iter().position(Option::is_none) {
            Some(idx) => idx,
            None if self.top < self.capacity() => {
                self.top += 1;
                self.top - 1
            }
            None => {
                return Err(WmError::CapacityExceeded {
                    capacity: self.capacity(),
                })
            }
        };

        self.slots[slot] = Some(Client { window, frame });
        Ok(true)
    }

    pub fn remove(&mut self, window: Window) -> Option<Client> {
        self.slots[..self.top]
            .iter_mut()
            .find(|slot| matches!(slot, Some(client) if client.window == window))
            .and_then(Option::take)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Client> {
        self.slots[..self.top].iter().flatten()
    }
}

#[cfg(test)]
mod client_tests {
    use xcb::XidNew;

    use super::*;

    fn window(id: u32) -> Window {
        Window::new(id)
    }

    #[test]
    fn test_register_and_find() {
        let mut registry = ClientRegistry::with_capacity(4);
        assert_eq!(registry.register(window(1), window(101)).unwrap(), true);
        assert_eq!(registry.register(window(2), window(102)).unwrap(), true);

        assert_eq!(registry.find_frame(window(1)), Some(window(101)));
        assert_eq!(registry.find_frame(window(2)), Some(window(102)));
        assert_eq!(registry.find_frame(window(3)), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_register_is_noop() {
        let mut registry = ClientRegistry::with_capacity(4);
        registry.register(window(1), window(101)).unwrap();

        assert_eq!(registry.register(window(1), window(999)).unwrap(), false);
        assert_eq!(registry.find_frame(window(1)), Some(window(101)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut registry = ClientRegistry::with_capacity(2);
        registry.register(window(1), window(101)).unwrap();
        registry.register(window(2), window(102)).unwrap();

        let err = registry.register(window(3), window(103)).unwrap_err();
        assert!(matches!(err, WmError::CapacityExceeded { capacity: 2 }));
        assert_eq!(registry.find_frame(window(3)), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_ensure_room_tracks_free_slots() {
        let mut registry = ClientRegistry::with_capacity(1);
        assert!(registry.ensure_room().is_ok());

        registry.register(window(1), window(101)).unwrap();
        let err = registry.ensure_room().unwrap_err();
        assert!(matches!(err, WmError::CapacityExceeded { capacity: 1 }));

        registry.remove(window(1));
        assert!(registry.ensure_room().is_ok());
    }

    #[test]
    fn test_duplicate_register_when_full_is_not_an_error() {
        let mut registry = ClientRegistry::with_capacity(1);
        registry.register(window(1), window(101)).unwrap();
        assert_eq!(registry.register(window(1), window(101)).unwrap(), false);
    }

    #[test]
    fn test_remove_empties_slot_in_place() {
        let mut registry = ClientRegistry::with_capacity(3);
        registry.register(window(1), window(101)).unwrap();
        registry.register(window(2), window(102)).unwrap();
        registry.register(window(3), window(103)).unwrap();

        let removed = registry.remove(window(2)).unwrap();
        assert_eq!(removed.frame(), window(102));
        assert_eq!(registry.find_frame(window(2)), None);

        let order: Vec<Window> = registry.iter().map(Client::window).collect();
        assert_eq!(order, vec![window(1), window(3)]);
    }

    #[test]
    fn test_freed_slot_is_reused() {
        let mut registry = ClientRegistry::with_capacity(2);
        registry.register(window(1), window(101)).unwrap();
        registry.register(window(2), window(102)).unwrap();
        registry.remove(window(1));

        assert!(registry.register(window(3), window(103)).unwrap());
        let order: Vec<Window> = registry.iter().map(Client::window).collect();
        assert_eq!(order, vec![window(3), window(2)]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut registry = ClientRegistry::with_capacity(2);
        registry.register(window(1), window(101)).unwrap();

        assert_eq!(registry.remove(window(7)), None);
        assert_eq!(registry.remove(window(1)).map(|c| c.window()), Some(window(1)));
        assert_eq!(registry.remove(window(1)), None);
        assert!(registry.is_empty());
    }
}
