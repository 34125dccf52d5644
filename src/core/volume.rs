//! Volume channels with mute/restore behavior
//!
//! Three independent channels (master, primary device, secondary device)
//! each remember the level they had before being muted so a second toggle
//! restores it. The remembered level is transient and never persisted.

/// Identifies one of the three volume channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeTarget {
    Master,
    Primary,
    Secondary,
}

/// A single volume channel: current level in percent plus the level
/// remembered by the last mute transition.
#[derive(Debug, Clone)]
pub struct VolumeChannel {
    level: u8,
    remembered: u8,
}

impl VolumeChannel {
    /// Create a channel at the given level (clamped to 0-100)
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(100),
            remembered: 0,
        }
    }

    /// Current level in percent (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Current level as a 0.0-1.0 gain factor for the playback engine
    pub fn gain(&self) -> f32 {
        f32::from(self.level) / 100.0
    }

    /// Set the level directly. Does not touch the remembered pre-mute
    /// level; only the mute path records it.
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(100);
    }

    /// Toggle mute. A non-zero level is remembered and zeroed; a zero
    /// level is restored to whatever the last mute recorded (0 if no mute
    /// ever happened).
    pub fn toggle_mute(&mut self) {
        if self.level == 0 {
            self.level = self.remembered;
        } else {
            self.remembered = self.level;
            self.level = 0;
        }
    }
}

impl Default for VolumeChannel {
    fn default() -> Self {
        Self::new(100)
    }
}
