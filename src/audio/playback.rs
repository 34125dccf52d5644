//! cpal-backed playback engine
//!
//! One output stream per routed device (primary, optional secondary). Each
//! stream owns a voice list behind a parking_lot mutex that the audio
//! callback drains; `play` decodes WAV files with hound and pushes a voice
//! into every active stream. The voice pool never allocates inside the
//! callback beyond what cpal itself does.

use super::{OutputDevice, Playback, PlaybackError};
use crate::core::preset::Sound;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// A decoded clip being mixed into one output stream
struct Voice {
    samples: Arc<Vec<f32>>,
    position: usize,
    looped: bool,
}

/// Per-stream mixer state shared with the audio callback
struct Mixer {
    voices: Vec<Voice>,
    paused: bool,
    /// master gain * device gain, pre-multiplied on the control thread
    gain: f32,
}

impl Mixer {
    fn new() -> Self {
        Self {
            voices: Vec::new(),
            paused: false,
            gain: 1.0,
        }
    }

    fn next_sample(&mut self) -> f32 {
        if self.paused {
            return 0.0;
        }
        let mut out = 0.0f32;
        for voice in &mut self.voices {
            if voice.position >= voice.samples.len() {
                if voice.looped && !voice.samples.is_empty() {
                    voice.position = 0;
                } else {
                    continue;
                }
            }
            out += voice.samples[voice.position];
            voice.position += 1;
        }
        self.voices
            .retain(|v| v.looped || v.position < v.samples.len());
        out * self.gain
    }
}

/// One routed output: the cpal stream plus its shared mixer
struct StreamSlot {
    // Held only to keep the stream alive; cpal stops playback on drop.
    _stream: cpal::Stream,
    mixer: Arc<Mutex<Mixer>>,
    device_gain: f32,
}

/// cpal implementation of the [`Playback`] seam
pub struct CpalPlayback {
    host: cpal::Host,
    primary: Option<StreamSlot>,
    secondary: Option<StreamSlot>,
    master_gain: f32,
    primary_gain: f32,
    secondary_gain: f32,
    overlap: bool,
}

impl CpalPlayback {
    /// Create the engine and route the primary (and optional secondary)
    /// output. Routing failures are logged and leave the slot empty, so a
    /// missing device can never block startup.
    pub fn new(primary: &OutputDevice, secondary: &OutputDevice) -> Self {
        let mut playback = Self {
            host: cpal::default_host(),
            primary: None,
            secondary: None,
            master_gain: 1.0,
            primary_gain: 1.0,
            secondary_gain: 1.0,
            overlap: true,
        };
        playback.change_primary_device(primary);
        playback.change_secondary_device(secondary);
        playback
    }

    fn open_device(&self, wanted: &OutputDevice) -> Result<cpal::Device, PlaybackError> {
        if wanted.number < 0 {
            return self
                .host
                .default_output_device()
                .ok_or(PlaybackError::NoDevice);
        }
        let devices = self
            .host
            .output_devices()
            .map_err(|e| PlaybackError::DeviceConfig(e.to_string()))?;
        for (index, device) in devices.enumerate() {
            if index as i32 == wanted.number {
                return Ok(device);
            }
        }
        Err(PlaybackError::NoDevice)
    }

    fn build_slot(&self, wanted: &OutputDevice, device_gain: f32) -> Result<StreamSlot, PlaybackError> {
        let device = self.open_device(wanted)?;
        info!(
            "Routing output to device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config: cpal::StreamConfig = device
            .default_output_config()
            .map_err(|e| PlaybackError::DeviceConfig(e.to_string()))?
            .into();
        let channels = config.channels as usize;

        let mixer = Arc::new(Mutex::new(Mixer::new()));
        mixer.lock().gain = self.master_gain * device_gain;
        let callback_mixer = Arc::clone(&mixer);

        let err_fn = |err| {
            error!("Audio output stream error: {}", err);
        };

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut mixer = callback_mixer.lock();
                    for frame in data.chunks_mut(channels) {
                        let sample = mixer.next_sample();
                        frame.fill(sample);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| PlaybackError::Stream(e.to_string()))?;
        stream
            .play()
            .map_err(|e| PlaybackError::Stream(e.to_string()))?;

        Ok(StreamSlot {
            _stream: stream,
            mixer,
            device_gain,
        })
    }

    fn update_gains(&mut self) {
        let master = self.master_gain;
        for slot in [self.primary.as_mut(), self.secondary.as_mut()]
            .into_iter()
            .flatten()
        {
            slot.mixer.lock().gain = master * slot.device_gain;
        }
    }

    fn slots(&mut self) -> impl Iterator<Item = &mut StreamSlot> + '_ {
        [self.primary.as_mut(), self.secondary.as_mut()]
            .into_iter()
            .flatten()
    }
}

/// Decode a sound's files into one mono clip, files back to back.
/// Undecodable files are skipped with a warning.
fn decode_files(paths: &[std::path::PathBuf]) -> Vec<f32> {
    let mut samples = Vec::new();
    for path in paths {
        match decode_wav(path) {
            Ok(mut decoded) => samples.append(&mut decoded),
            Err(e) => warn!("Skipping sound file: {}", e),
        }
    }
    samples
}

fn decode_wav(path: &Path) -> Result<Vec<f32>, PlaybackError> {
    let mut reader = hound::WavReader::open(path).map_err(|e| PlaybackError::Decode {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Result<Vec<f32>, hound::Error> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect(),
        hound::SampleFormat::Int => {
            let scale = f32::from(i16::MAX);
            reader
                .samples::<i16>()
                .map(|s| s.map(|v| f32::from(v) / scale))
                .collect()
        }
    };
    let interleaved = interleaved.map_err(|e| PlaybackError::Decode {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    // Downmix to mono; the output callback fans one sample out to every
    // channel of the device.
    Ok(interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect())
}

impl Playback for CpalPlayback {
    fn enumerate_devices(&self) -> Vec<OutputDevice> {
        match self.host.output_devices() {
            Ok(devices) => devices
                .enumerate()
                .map(|(index, device)| {
                    let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
                    OutputDevice::new(index as i32, name)
                })
                .collect(),
            Err(e) => {
                warn!("Failed to enumerate output devices: {}", e);
                Vec::new()
            }
        }
    }

    fn play(&mut self, sound: &Sound) {
        let samples = Arc::new(decode_files(&sound.files));
        if samples.is_empty() {
            debug!("Sound {} has no playable files", sound.name);
            return;
        }
        let overlap = self.overlap;
        let looped = sound.loop_playback;
        for slot in self.slots() {
            let mut mixer = slot.mixer.lock();
            if !overlap {
                mixer.voices.clear();
            }
            mixer.paused = false;
            mixer.voices.push(Voice {
                samples: Arc::clone(&samples),
                position: 0,
                looped,
            });
        }
    }

    fn pause(&mut self) {
        for slot in self.slots() {
            slot.mixer.lock().paused = true;
        }
    }

    fn resume(&mut self) {
        for slot in self.slots() {
            slot.mixer.lock().paused = false;
        }
    }

    fn stop(&mut self) {
        for slot in self.slots() {
            let mut mixer = slot.mixer.lock();
            mixer.voices.clear();
            mixer.paused = false;
        }
    }

    fn set_volume(&mut self, gain: f32) {
        self.master_gain = gain.clamp(0.0, 1.0);
        self.update_gains();
    }

    fn set_primary_volume(&mut self, gain: f32) {
        self.primary_gain = gain.clamp(0.0, 1.0);
        if let Some(slot) = self.primary.as_mut() {
            slot.device_gain = self.primary_gain;
        }
        self.update_gains();
    }

    fn set_secondary_volume(&mut self, gain: f32) {
        self.secondary_gain = gain.clamp(0.0, 1.0);
        if let Some(slot) = self.secondary.as_mut() {
            slot.device_gain = self.secondary_gain;
        }
        self.update_gains();
    }

    fn set_overlap(&mut self, overlap: bool) {
        self.overlap = overlap;
    }

    fn change_primary_device(&mut self, device: &OutputDevice) {
        self.primary = match self.build_slot(device, self.primary_gain) {
            Ok(slot) => Some(slot),
            Err(e) => {
                warn!("Failed to route primary output: {}", e);
                None
            }
        };
    }

    fn change_secondary_device(&mut self, device: &OutputDevice) {
        if device.is_disabled() {
            self.secondary = None;
            return;
        }
        self.secondary = match self.build_slot(device, self.secondary_gain) {
            Ok(slot) => Some(slot),
            Err(e) => {
                warn!("Failed to route secondary output: {}", e);
                None
            }
        };
    }
}
