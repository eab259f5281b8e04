//! Platform abstraction layer
//!
//! The simulation never polls a keyboard. Each tick receives an
//! [`InputSnapshot`] describing which keys are held and which changed state
//! since the previous frame; whatever owns the window fills it in.

use serde::{Deserialize, Serialize};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Space,
    RightShift,
    X,
    R,
    Escape,
}

impl Key {
    fn bit(self) -> u8 {
        match self {
            Key::Space => 1 << 0,
            Key::RightShift => 1 << 1,
            Key::X => 1 << 2,
            Key::R => 1 << 3,
            Key::Escape => 1 << 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Key::Space => "Space",
            Key::RightShift => "RightShift",
            Key::X => "X",
            Key::R => "R",
            Key::Escape => "Escape",
        }
    }
}

/// Compact set of keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeySet(u8);

impl KeySet {
    pub fn insert(&mut self, key: Key) {
        self.0 |= key.bit();
    }

    pub fn remove(&mut self, key: Key) {
        self.0 &= !key.bit();
    }

    pub fn contains(&self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: KeySet) -> KeySet {
        KeySet(self.0 | other.0)
    }
}

/// Keyboard state for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    held: KeySet,
    pressed: KeySet,
    released: KeySet,
}

impl InputSnapshot {
    /// Key went down this frame (also counts as held)
    pub fn press(mut self, key: Key) -> Self {
        self.held.insert(key);
        self.pressed.insert(key);
        self
    }

    /// Key is being held
    pub fn hold(mut self, key: Key) -> Self {
        self.held.insert(key);
        self
    }

    /// Key came up this frame
    pub fn release(mut self, key: Key) -> Self {
        self.held.remove(key);
        self.released.insert(key);
        self
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(key)
    }

    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(key)
    }

    pub fn was_released(&self, key: Key) -> bool {
        self.released.contains(key)
    }

    /// Drop press/release edges so they are seen by one substep only
    pub fn clear_edges(&mut self) {
        self.pressed = KeySet::default();
        self.released = KeySet::default();
    }

    /// Take `newer`'s held keys while keeping edges not yet consumed
    pub fn absorb(&mut self, newer: InputSnapshot) {
        self.held = newer.held;
        self.pressed = self.pressed.union(newer.pressed);
        self.released = self.released.union(newer.released);
    }

    /// Apply a raw key transition from the window layer
    pub fn set_key(&mut self, key: Key, down: bool) {
        match (down, self.held.contains(key)) {
            (true, false) => *self = self.press(key),
            (false, true) => *self = self.release(key),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_implies_held() {
        let input = InputSnapshot::default().press(Key::Space);
        assert!(input.is_held(Key::Space));
        assert!(input.was_pressed(Key::Space));
        assert!(!input.is_held(Key::RightShift));
    }

    #[test]
    fn test_release_clears_held() {
        let input = InputSnapshot::default().hold(Key::Space).release(Key::Space);
        assert!(!input.is_held(Key::Space));
        assert!(input.was_released(Key::Space));
    }

    #[test]
    fn test_clear_edges_keeps_held() {
        let mut input = InputSnapshot::default().press(Key::RightShift).release(Key::X);
        input.clear_edges();
        assert!(input.is_held(Key::RightShift));
        assert!(!input.was_pressed(Key::RightShift));
        assert!(!input.was_released(Key::X));
    }

    #[test]
    fn test_absorb_keeps_unconsumed_edges() {
        let mut input = InputSnapshot::default().press(Key::Space);
        input.absorb(InputSnapshot::default().release(Key::Space));
        assert!(input.was_pressed(Key::Space));
        assert!(input.was_released(Key::Space));
        assert!(!input.is_held(Key::Space));
    }

    #[test]
    fn test_set_key_only_reports_transitions() {
        let mut input = InputSnapshot::default();
        input.set_key(Key::Space, true);
        assert!(input.was_pressed(Key::Space));
        input.clear_edges();
        input.set_key(Key::Space, true);
        assert!(!input.was_pressed(Key::Space));
        input.set_key(Key::Space, false);
        assert!(input.was_released(Key::Space));
        assert!(!input.is_held(Key::Space));
    }
}
