//! Preset data model
//!
//! A preset owns an ordered list of counters and an ordered list of sounds.
//! At most one counter and one sound are selected at a time, and a selection
//! must always reference a live member of the preset's own collection.
//! Removal clears the selection; it never auto-advances to a neighbor.

use crate::hotkey::keys::Key;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};
use uuid::Uuid;

/// Unique identifier for a counter
pub type CounterId = Uuid;

/// Unique identifier for a sound
pub type SoundId = Uuid;

/// A single counter: a running count plus its step size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    /// Unique id, stable across sessions
    pub id: CounterId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Current count, unbounded in both directions
    #[serde(default)]
    pub count: i64,
    /// Step applied by increment/decrement
    #[serde(default = "default_increment")]
    pub increment: i64,
    /// Optional file the count is re-read from when the preset is selected
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Chord that selects this counter and increments it
    #[serde(default)]
    pub keys: Vec<Key>,
}

fn default_increment() -> i64 {
    1
}

impl Counter {
    /// Create a counter with a fresh id and default step
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            count: 0,
            increment: default_increment(),
            file: None,
            keys: Vec::new(),
        }
    }

    /// Re-read the count from the associated file, if any.
    ///
    /// The file is expected to start with an integer; anything after the
    /// first whitespace is ignored. Read or parse failures leave the count
    /// untouched.
    pub fn read_from_file(&mut self) {
        let Some(path) = &self.file else {
            return;
        };
        match std::fs::read_to_string(path) {
            Ok(content) => {
                if let Some(value) = content.split_whitespace().next().and_then(|t| t.parse().ok())
                {
                    self.count = value;
                } else {
                    warn!("Counter file {:?} does not start with an integer", path);
                }
            }
            Err(e) => warn!("Failed to read counter file {:?}: {}", path, e),
        }
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new("New Counter")
    }
}

/// A sound: one or more files handed to the playback engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sound {
    /// Unique id, stable across sessions
    pub id: SoundId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Files played by the playback engine
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// Whether playback loops until stopped
    #[serde(default)]
    pub loop_playback: bool,
    /// Chord that plays this sound
    #[serde(default)]
    pub keys: Vec<Key>,
}

impl Sound {
    /// Create a sound with a fresh id and no files
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            files: Vec::new(),
            loop_playback: false,
            keys: Vec::new(),
        }
    }
}

impl Default for Sound {
    fn default() -> Self {
        Self::new("New Sound")
    }
}

/// A named collection of counters and sounds with independent selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    /// Unique id, stable across sessions
    pub id: Uuid,
    /// Display name, unique within the preset collection
    pub name: String,
    /// Ordered counters
    #[serde(default)]
    pub counters: Vec<Counter>,
    /// Ordered sounds
    #[serde(default)]
    pub sounds: Vec<Sound>,
    /// Selected counter, always a member of `counters` or None
    #[serde(default)]
    selected_counter: Option<CounterId>,
    /// Selected sound, always a member of `sounds` or None
    #[serde(default)]
    selected_sound: Option<SoundId>,
}

impl Preset {
    /// Create an empty preset
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            counters: Vec::new(),
            sounds: Vec::new(),
            selected_counter: None,
            selected_sound: None,
        }
    }

    /// Id of the selected counter, if any
    pub fn selected_counter_id(&self) -> Option<CounterId> {
        self.selected_counter
    }

    /// Id of the selected sound, if any
    pub fn selected_sound_id(&self) -> Option<SoundId> {
        self.selected_sound
    }

    /// The selected counter, if any
    pub fn selected_counter(&self) -> Option<&Counter> {
        let id = self.selected_counter?;
        self.counters.iter().find(|c| c.id == id)
    }

    /// Mutable access to the selected counter, if any
    pub fn selected_counter_mut(&mut self) -> Option<&mut Counter> {
        let id = self.selected_counter?;
        self.counters.iter_mut().find(|c| c.id == id)
    }

    /// The selected sound, if any
    pub fn selected_sound(&self) -> Option<&Sound> {
        let id = self.selected_sound?;
        self.sounds.iter().find(|s| s.id == id)
    }

    /// Select a counter by id, or clear with None.
    ///
    /// An id that is not a member of this preset's counters is ignored
    /// without mutating anything; that only happens on a binding bug.
    pub fn select_counter(&mut self, id: Option<CounterId>) {
        match id {
            Some(id) if !self.counters.iter().any(|c| c.id == id) => {
                debug!("Ignoring selection of counter {} not in preset", id);
            }
            other => self.selected_counter = other,
        }
    }

    /// Select a sound by id, or clear with None. Same membership contract
    /// as `select_counter`.
    pub fn select_sound(&mut self, id: Option<SoundId>) {
        match id {
            Some(id) if !self.sounds.iter().any(|s| s.id == id) => {
                debug!("Ignoring selection of sound {} not in preset", id);
            }
            other => self.selected_sound = other,
        }
    }

    /// Append a counter and make it the selection
    pub fn add_counter(&mut self, counter: Counter) {
        self.selected_counter = Some(counter.id);
        self.counters.push(counter);
    }

    /// Remove the selected counter. Selection becomes None; the next
    /// counter is deliberately not auto-selected.
    pub fn remove_selected_counter(&mut self) {
        let Some(id) = self.selected_counter else {
            return;
        };
        self.counters.retain(|c| c.id != id);
        self.selected_counter = None;
    }

    /// Append a sound and make it the selection
    pub fn add_sound(&mut self, sound: Sound) {
        self.selected_sound = Some(sound.id);
        self.sounds.push(sound);
    }

    /// Remove the selected sound. Selection becomes None, matching the
    /// counter removal behavior.
    pub fn remove_selected_sound(&mut self) {
        let Some(id) = self.selected_sound else {
            return;
        };
        self.sounds.retain(|s| s.id != id);
        self.selected_sound = None;
    }

    /// Index of the selected counter within the counter list
    pub fn selected_counter_index(&self) -> Option<usize> {
        let id = self.selected_counter?;
        self.counters.iter().position(|c| c.id == id)
    }

    /// Select the next counter, wrapping at the end. With no selection the
    /// first counter is selected; an empty list is a no-op.
    pub fn select_next_counter(&mut self) {
        if self.counters.is_empty() {
            return;
        }
        match self.selected_counter_index() {
            None => self.selected_counter = Some(self.counters[0].id),
            Some(index) => {
                let next = (index + 1) % self.counters.len();
                self.selected_counter = Some(self.counters[next].id);
            }
        }
    }

    /// Select the previous counter, wrapping at the start. Mirror of
    /// `select_next_counter`, including the first-selection behavior.
    pub fn select_previous_counter(&mut self) {
        if self.counters.is_empty() {
            return;
        }
        match self.selected_counter_index() {
            None => self.selected_counter = Some(self.counters[0].id),
            Some(index) => {
                let len = self.counters.len();
                let previous = (index + len - 1) % len;
                self.selected_counter = Some(self.counters[previous].id);
            }
        }
    }

    /// Re-read every counter that has an associated file
    pub fn read_counter_files(&mut self) {
        for counter in &mut self.counters {
            counter.read_from_file();
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("New Preset")
    }
}
