//! Held-key-set tracking and chord matching
//!
//! A chord fires when the set of currently held keys is exactly the bound
//! set. Each binding carries an armed/fired flag: it fires once on the
//! transition into fully-held and cannot fire again until every key of the
//! chord has been released. Key auto-repeat never re-fires because a
//! repeated key-down does not change the held set.

use crate::core::command::Command;
use crate::hotkey::keys::Key;
use std::collections::HashSet;

/// One registered chord and its debounce state
struct ChordBinding {
    keys: HashSet<Key>,
    command: Command,
    fired: bool,
}

/// Tracks the held-key set and resolves chords to commands
#[derive(Default)]
pub struct ChordTracker {
    held: HashSet<Key>,
    bindings: Vec<ChordBinding>,
}

impl ChordTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a chord. Empty chords are ignored. Registration order is
    /// the tie-break for duplicate chords: the first registered binding
    /// wins and the rest never fire.
    pub fn bind(&mut self, keys: &[Key], command: Command) {
        if keys.is_empty() {
            return;
        }
        self.bindings.push(ChordBinding {
            keys: keys.iter().copied().collect(),
            command,
            fired: false,
        });
    }

    /// Drop all bindings, keeping the held-key set
    pub fn clear_bindings(&mut self) {
        self.bindings.clear();
    }

    /// Number of registered bindings
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Process a key-down event. Returns the command of the first
    /// registered chord that exactly matches the new held set, at most one
    /// per press.
    pub fn key_down(&mut self, key: Key) -> Option<Command> {
        if !self.held.insert(key) {
            // Auto-repeat while held; the set did not change.
            return None;
        }
        for binding in &mut self.bindings {
            if !binding.fired && binding.keys == self.held {
                binding.fired = true;
                return Some(binding.command);
            }
        }
        None
    }

    /// Process a key-up event. A fired binding re-arms only once every key
    /// of its chord has been released; releasing a single key of a held
    /// chord is not enough to let it fire again.
    pub fn key_up(&mut self, key: Key) {
        if !self.held.remove(&key) {
            return;
        }
        for binding in &mut self.bindings {
            if binding.fired && binding.keys.is_disjoint(&self.held) {
                binding.fired = false;
            }
        }
    }

    /// Forget all held keys (e.g. on focus loss, where key-ups get lost)
    pub fn release_all(&mut self) {
        self.held.clear();
        for binding in &mut self.bindings {
            binding.fired = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chord_fires_once_when_fully_held() {
        let mut tracker = ChordTracker::new();
        tracker.bind(&[Key::Ctrl, Key::Shift, Key::N], Command::AddCounter);

        assert_eq!(tracker.key_down(Key::Ctrl), None);
        assert_eq!(tracker.key_down(Key::Shift), None);
        assert_eq!(tracker.key_down(Key::N), Some(Command::AddCounter));
    }

    #[test]
    fn test_partial_release_does_not_rearm() {
        let mut tracker = ChordTracker::new();
        tracker.bind(&[Key::Ctrl, Key::Shift, Key::N], Command::AddCounter);
        tracker.key_down(Key::Ctrl);
        tracker.key_down(Key::Shift);
        assert_eq!(tracker.key_down(Key::N), Some(Command::AddCounter));

        // Release and re-press N with Ctrl+Shift still held: no re-fire.
        tracker.key_up(Key::N);
        assert_eq!(tracker.key_down(Key::N), None);

        // Full release and re-press fires again.
        tracker.key_up(Key::N);
        tracker.key_up(Key::Shift);
        tracker.key_up(Key::Ctrl);
        tracker.key_down(Key::Ctrl);
        tracker.key_down(Key::Shift);
        assert_eq!(tracker.key_down(Key::N), Some(Command::AddCounter));
    }

    #[test]
    fn test_auto_repeat_does_not_refire() {
        let mut tracker = ChordTracker::new();
        tracker.bind(&[Key::Space], Command::Play);
        assert_eq!(tracker.key_down(Key::Space), Some(Command::Play));
        assert_eq!(tracker.key_down(Key::Space), None);
        assert_eq!(tracker.key_down(Key::Space), None);
    }

    #[test]
    fn test_superset_does_not_fire() {
        let mut tracker = ChordTracker::new();
        tracker.bind(&[Key::N], Command::AddCounter);
        tracker.key_down(Key::Ctrl);
        // Held set {Ctrl, N} is not an exact match for {N}.
        assert_eq!(tracker.key_down(Key::N), None);
    }

    #[test]
    fn test_unbound_keys_ignored() {
        let mut tracker = ChordTracker::new();
        tracker.bind(&[Key::F5], Command::Pause);
        assert_eq!(tracker.key_down(Key::A), None);
        tracker.key_up(Key::A);
        assert_eq!(tracker.key_down(Key::F5), Some(Command::Pause));
    }

    #[test]
    fn test_duplicate_chord_first_registered_wins() {
        let mut tracker = ChordTracker::new();
        tracker.bind(&[Key::M], Command::Mute);
        tracker.bind(&[Key::M], Command::Stop);
        assert_eq!(tracker.key_down(Key::M), Some(Command::Mute));
        tracker.key_up(Key::M);
        // Still resolves to the first binding on the next press.
        assert_eq!(tracker.key_down(Key::M), Some(Command::Mute));
    }

    #[test]
    fn test_empty_chord_never_registers() {
        let mut tracker = ChordTracker::new();
        tracker.bind(&[], Command::Play);
        assert_eq!(tracker.binding_count(), 0);
    }

    #[test]
    fn test_release_all_rearms() {
        let mut tracker = ChordTracker::new();
        tracker.bind(&[Key::F1], Command::OpenAbout);
        assert_eq!(tracker.key_down(Key::F1), Some(Command::OpenAbout));
        tracker.release_all();
        assert_eq!(tracker.key_down(Key::F1), Some(Command::OpenAbout));
    }
}
