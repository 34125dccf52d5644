//! Application state management
//!
//! Transient per-process state the UI surface binds to: which panels are
//! open, which item an editor panel is pointed at, and the latest
//! update-check outcome. Nothing here is persisted.

use crate::core::preset::{CounterId, SoundId};

/// What a key-binding panel is capturing keys for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindTarget {
    Counter(CounterId),
    Sound(SoundId),
}

/// Outcome of the most recent update check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UpdateStatus {
    /// No check has completed yet
    #[default]
    Unknown,
    /// Running the latest release
    UpToDate,
    /// A newer release tag is available
    Available(String),
}

/// Global application state
#[derive(Debug, Default)]
pub struct AppState {
    /// Settings panel open
    pub settings_opened: bool,
    /// About panel open
    pub about_opened: bool,
    /// Counter editor open
    pub counter_opened: bool,
    /// Sound editor open
    pub sound_opened: bool,
    /// Key-binding capture panel open
    pub bind_keys_opened: bool,
    /// Counter the editor panel is pointed at
    pub modified_counter: Option<CounterId>,
    /// Sound the editor panel is pointed at
    pub modified_sound: Option<SoundId>,
    /// Item the binding panel is capturing for
    pub modified_bindable: Option<BindTarget>,
    /// Latest update-check outcome
    pub update_status: UpdateStatus,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the binding panel and drop its target
    pub fn cancel_bind_keys(&mut self) {
        self.bind_keys_opened = false;
        self.modified_bindable = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_default_state_is_closed() {
        let state = AppState::new();
        assert!(!state.settings_opened);
        assert!(!state.counter_opened);
        assert_eq!(state.update_status, UpdateStatus::Unknown);
    }

    #[test]
    fn test_cancel_bind_keys_clears_target() {
        let mut state = AppState::new();
        state.bind_keys_opened = true;
        state.modified_bindable = Some(BindTarget::Counter(Uuid::new_v4()));
        state.cancel_bind_keys();
        assert!(!state.bind_keys_opened);
        assert_eq!(state.modified_bindable, None);
    }
}
