//! Tallyboard
//!
//! A keyboard-driven counter and soundboard control surface.
//!
//! # Features
//! - Presets grouping counters and sounds, with one of each selected
//! - Circular counter navigation plus increment/decrement/reset
//! - Chorded shortcuts for every operation, debounced per press
//! - Sound playback to a primary and an optional secondary output device
//! - Per-channel mute toggles that restore the pre-mute volume
//! - Display mode gating of counter and sound commands
//! - Configuration persisted on every change

pub mod audio;
pub mod core;
pub mod dialogs;
pub mod hotkey;
pub mod update;

pub use crate::core::command::Command;
pub use crate::core::config::{Config, DisplayMode};
pub use crate::core::coordinator::Coordinator;
pub use crate::core::events::{AppEvent, EventSender};
pub use crate::core::preset::{Counter, Preset, Sound};
pub use crate::core::state::AppState;
pub use crate::core::volume::VolumeTarget;
pub use crate::hotkey::keys::Key;
