//! Shortcut routing
//!
//! The single consumer of keyboard events. Builds the chord table from the
//! configuration (global shortcut sets plus the selected preset's per-item
//! chords) and resolves key events into logical commands. Enablement is
//! not checked here; the coordinator re-evaluates the command's gate at
//! dispatch time so a chord resolved under a stale mode is swallowed, not
//! queued.

use crate::core::command::Command;
use crate::core::config::Config;
use crate::hotkey::chord::ChordTracker;
use crate::hotkey::keys::Key;
use tracing::debug;

/// Maps key events to logical commands via the chord tracker
#[derive(Default)]
pub struct ShortcutRouter {
    tracker: ChordTracker,
}

impl ShortcutRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the chord table from the configuration. Called at startup
    /// and whenever bindings or the selected preset change. Registration
    /// order fixes the duplicate-chord tie-break: global counter
    /// shortcuts, global sound shortcuts, mute shortcuts, then the
    /// selected preset's per-item chords.
    pub fn rebuild(&mut self, config: &Config) {
        self.tracker.clear_bindings();

        let counters = &config.counter_shortcuts;
        self.tracker.bind(&counters.next, Command::NextCounter);
        self.tracker.bind(&counters.previous, Command::PreviousCounter);
        self.tracker.bind(&counters.increment, Command::Increment);
        self.tracker.bind(&counters.decrement, Command::Decrement);
        self.tracker.bind(&counters.reset, Command::Reset);

        let sounds = &config.sound_shortcuts;
        self.tracker.bind(&sounds.pause, Command::Pause);
        self.tracker.bind(&sounds.resume, Command::Continue);
        self.tracker.bind(&sounds.stop, Command::Stop);

        let mutes = &config.mute_shortcuts;
        self.tracker.bind(&mutes.master, Command::Mute);
        self.tracker.bind(&mutes.primary, Command::MutePrimary);
        self.tracker.bind(&mutes.secondary, Command::MuteSecondary);

        let preset = config.selected_preset();
        for counter in &preset.counters {
            self.tracker
                .bind(&counter.keys, Command::IncrementCounter(counter.id));
        }
        for sound in &preset.sounds {
            self.tracker.bind(&sound.keys, Command::PlaySound(sound.id));
        }

        debug!("Shortcut table rebuilt: {} chords", self.tracker.binding_count());
    }

    /// Route a key-down event; returns the resolved command, if any
    pub fn key_down(&mut self, key: Key) -> Option<Command> {
        let command = self.tracker.key_down(key);
        if let Some(command) = command {
            debug!("Chord resolved to {:?}", command);
        }
        command
    }

    /// Route a key-up event
    pub fn key_up(&mut self, key: Key) {
        self.tracker.key_up(key);
    }

    /// Forget held keys after focus loss
    pub fn release_all(&mut self) {
        self.tracker.release_all();
    }
}
