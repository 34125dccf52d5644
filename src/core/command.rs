//! Logical commands and their enablement gates
//!
//! Every user-invocable operation is one `Command` value. The gate table is
//! a fixed match over the command set, re-evaluated on every invocation
//! attempt so a display-mode change between UI renders and shortcut firings
//! can never let a stale "enabled" state through.

use crate::core::config::DisplayMode;
use crate::core::preset::{CounterId, SoundId};
use crate::core::state::BindTarget;
use crate::core::volume::VolumeTarget;

/// Every operation a shortcut or UI action can invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    // Counter-scoped
    Increment,
    Decrement,
    Reset,
    NextCounter,
    PreviousCounter,
    AddCounter,
    RemoveCounter,
    OpenCounter,
    OpenCounterFile,
    /// Per-item chord on a specific counter: select it and increment
    IncrementCounter(CounterId),

    // Sound-scoped
    Play,
    Pause,
    Continue,
    Stop,
    AddSound,
    RemoveSound,
    OpenSound,
    OpenSoundFiles,
    /// Per-item chord on a specific sound: play it
    PlaySound(SoundId),

    // Administrative, never gated
    OpenSettings,
    OpenAbout,
    Mute,
    MutePrimary,
    MuteSecondary,
    /// Open the binding panel for a counter or sound
    BindKeys(BindTarget),
    CheckForUpdates,
}

impl Command {
    /// Evaluate this command's enablement predicate against the current
    /// display mode.
    pub fn is_enabled(self, mode: DisplayMode) -> bool {
        match self {
            Command::Increment
            | Command::Decrement
            | Command::Reset
            | Command::NextCounter
            | Command::PreviousCounter
            | Command::AddCounter
            | Command::RemoveCounter
            | Command::OpenCounter
            | Command::OpenCounterFile
            | Command::IncrementCounter(_) => mode.counters_active(),

            Command::Play
            | Command::Pause
            | Command::Continue
            | Command::Stop
            | Command::AddSound
            | Command::RemoveSound
            | Command::OpenSound
            | Command::OpenSoundFiles
            | Command::PlaySound(_) => mode.sounds_active(),

            Command::OpenSettings
            | Command::OpenAbout
            | Command::Mute
            | Command::MutePrimary
            | Command::MuteSecondary
            | Command::BindKeys(_)
            | Command::CheckForUpdates => true,
        }
    }

    /// The mute commands as (command, channel) pairs
    pub fn mute_target(self) -> Option<VolumeTarget> {
        match self {
            Command::Mute => Some(VolumeTarget::Master),
            Command::MutePrimary => Some(VolumeTarget::Primary),
            Command::MuteSecondary => Some(VolumeTarget::Secondary),
            _ => None,
        }
    }
}
