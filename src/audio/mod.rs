//! Audio playback collaborator
//!
//! The coordinator only talks to the narrow [`Playback`] trait; the cpal
//! implementation lives in [`playback`]. Failures never cross this
//! boundary: the engine logs and carries on, so shortcut handling can never
//! be interrupted by a device error.

mod playback;

pub use playback::CpalPlayback;

use crate::core::preset::Sound;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Device number of the synthetic "Disabled" secondary output
pub const DISABLED_DEVICE_NUMBER: i32 = -2;

/// An output device as shown in settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDevice {
    /// Backend-assigned device number; -1 is the default device, -2 the
    /// synthetic "Disabled" entry
    pub number: i32,
    /// Human-readable device name
    pub name: String,
}

impl OutputDevice {
    pub fn new(number: i32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
        }
    }

    /// The synthetic secondary-only "Disabled" entry
    pub fn disabled() -> Self {
        Self::new(DISABLED_DEVICE_NUMBER, "Disabled")
    }

    pub fn is_disabled(&self) -> bool {
        self.number == DISABLED_DEVICE_NUMBER
    }
}

impl Default for OutputDevice {
    fn default() -> Self {
        Self::new(-1, "Default")
    }
}

/// Playback engine errors, contained inside the audio adapter
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("no output device available")]
    NoDevice,

    #[error("failed to query output config: {0}")]
    DeviceConfig(String),

    #[error("failed to build output stream: {0}")]
    Stream(String),

    #[error("failed to decode {path}: {message}")]
    Decode { path: String, message: String },
}

/// The narrow seam the coordinator drives playback through
pub trait Playback {
    /// Enumerate output devices in backend order
    fn enumerate_devices(&self) -> Vec<OutputDevice>;

    /// Start playing a sound's files
    fn play(&mut self, sound: &Sound);

    /// Pause whatever is currently playing
    fn pause(&mut self);

    /// Continue paused playback
    fn resume(&mut self);

    /// Stop and discard all active playback
    fn stop(&mut self);

    /// Master volume as a 0.0-1.0 gain
    fn set_volume(&mut self, gain: f32);

    /// Primary device volume as a 0.0-1.0 gain
    fn set_primary_volume(&mut self, gain: f32);

    /// Secondary device volume as a 0.0-1.0 gain
    fn set_secondary_volume(&mut self, gain: f32);

    /// Whether starting a sound layers over running playback or replaces it
    fn set_overlap(&mut self, overlap: bool);

    /// Route primary output to the given device
    fn change_primary_device(&mut self, device: &OutputDevice);

    /// Route secondary output to the given device; the disabled entry
    /// silences the secondary channel
    fn change_secondary_device(&mut self, device: &OutputDevice);
}

/// Secondary device lists get the synthetic "Disabled" entry prepended;
/// primary lists do not.
pub fn secondary_device_list(playback: &dyn Playback) -> Vec<OutputDevice> {
    let mut devices = playback.enumerate_devices();
    devices.insert(0, OutputDevice::disabled());
    devices
}
