//! Configuration management
//!
//! Everything the app persists lives here: the preset collection, display
//! mode, volume levels, output device routing, and the global shortcut
//! sets. Saved as TOML under the platform config directory after every
//! mutating operation; a missing file loads defaults.

use crate::audio::OutputDevice;
use crate::core::preset::Preset;
use crate::hotkey::keys::Key;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Which command categories are visible and enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Neither panel; all counter and sound commands disabled
    None,
    /// Counters only
    Counters,
    /// Sounds only
    Sounds,
    /// Both panels
    #[default]
    Both,
}

impl DisplayMode {
    /// True iff counter-scoped commands are enabled
    pub fn counters_active(self) -> bool {
        matches!(self, DisplayMode::Counters | DisplayMode::Both)
    }

    /// True iff sound-scoped commands are enabled
    pub fn sounds_active(self) -> bool {
        matches!(self, DisplayMode::Sounds | DisplayMode::Both)
    }
}

/// Global chords for counter operations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CounterShortcuts {
    #[serde(default)]
    pub next: Vec<Key>,
    #[serde(default)]
    pub previous: Vec<Key>,
    #[serde(default)]
    pub increment: Vec<Key>,
    #[serde(default)]
    pub decrement: Vec<Key>,
    #[serde(default)]
    pub reset: Vec<Key>,
}

/// Global chords for sound operations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoundShortcuts {
    #[serde(default)]
    pub pause: Vec<Key>,
    #[serde(default, rename = "continue")]
    pub resume: Vec<Key>,
    #[serde(default)]
    pub stop: Vec<Key>,
}

/// Global chords for the mute toggles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MuteShortcuts {
    #[serde(default)]
    pub master: Vec<Key>,
    #[serde(default)]
    pub primary: Vec<Key>,
    #[serde(default)]
    pub secondary: Vec<Key>,
}

fn default_volume() -> u8 {
    100
}

fn default_overlap() -> bool {
    true
}

fn default_secondary_device() -> OutputDevice {
    OutputDevice::disabled()
}

/// Main persisted configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Preset collection; never empty after `load`
    #[serde(default)]
    pub presets: Vec<Preset>,
    /// Index of the globally selected preset
    #[serde(default)]
    pub selected_preset: usize,
    /// Which command categories are active
    #[serde(default)]
    pub display_mode: DisplayMode,
    /// Master volume in percent
    #[serde(default = "default_volume")]
    pub volume: u8,
    /// Primary device volume in percent
    #[serde(default = "default_volume")]
    pub primary_volume: u8,
    /// Secondary device volume in percent
    #[serde(default = "default_volume")]
    pub secondary_volume: u8,
    /// Whether sounds layer over running playback
    #[serde(default = "default_overlap")]
    pub overlap: bool,
    /// Primary output device
    #[serde(default)]
    pub primary_device: OutputDevice,
    /// Secondary output device; defaults to the synthetic disabled entry
    #[serde(default = "default_secondary_device")]
    pub secondary_device: OutputDevice,
    /// Global counter shortcut chords
    #[serde(default)]
    pub counter_shortcuts: CounterShortcuts,
    /// Global sound shortcut chords
    #[serde(default)]
    pub sound_shortcuts: SoundShortcuts,
    /// Mute toggle chords
    #[serde(default)]
    pub mute_shortcuts: MuteShortcuts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            presets: Vec::new(),
            selected_preset: 0,
            display_mode: DisplayMode::default(),
            volume: default_volume(),
            primary_volume: default_volume(),
            secondary_volume: default_volume(),
            overlap: default_overlap(),
            primary_device: OutputDevice::default(),
            secondary_device: default_secondary_device(),
            counter_shortcuts: CounterShortcuts::default(),
            sound_shortcuts: SoundShortcuts::default(),
            mute_shortcuts: MuteShortcuts::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults when the
    /// file does not exist. Always leaves at least one preset and a valid
    /// selected index.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config: Config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?
        } else {
            Config::default()
        };
        config.normalize();
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "tallyboard", "Tallyboard")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Seed an empty preset collection and clamp a stale selected index.
    /// Hand-edited config files are the only way these go out of range.
    pub fn normalize(&mut self) {
        if self.presets.is_empty() {
            self.presets.push(Preset::new("New Preset"));
        }
        if self.selected_preset >= self.presets.len() {
            warn!(
                "Selected preset index {} out of range, resetting to 0",
                self.selected_preset
            );
            self.selected_preset = 0;
        }
    }

    /// The globally selected preset
    pub fn selected_preset(&self) -> &Preset {
        &self.presets[self.selected_preset]
    }

    /// Mutable access to the globally selected preset
    pub fn selected_preset_mut(&mut self) -> &mut Preset {
        &mut self.presets[self.selected_preset]
    }
}

/// Persistence collaborator: where the configuration is written on every
/// observed change. Injected into the coordinator so tests can run without
/// touching the real config directory.
pub trait ConfigStore {
    fn save(&self, config: &Config) -> Result<()>;
}

/// Stores the configuration as TOML under the platform config directory
#[derive(Default)]
pub struct TomlConfigStore;

impl ConfigStore for TomlConfigStore {
    fn save(&self, config: &Config) -> Result<()> {
        config.save()
    }
}
