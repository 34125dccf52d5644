//! Coordinator integration tests
//!
//! Drive the public API end to end against recording stubs for the
//! playback, dialog, and persistence collaborators.

use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tallyboard::audio::{OutputDevice, Playback};
use tallyboard::core::config::ConfigStore;
use tallyboard::core::preset::{Counter, Sound};
use tallyboard::core::state::UpdateStatus;
use tallyboard::dialogs::FileDialogs;
use tallyboard::{Command, Config, Coordinator, DisplayMode, Key, VolumeTarget};

/// Playback stub that records every call
#[derive(Default)]
struct RecordingPlayback {
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingPlayback {
    fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl Playback for RecordingPlayback {
    fn enumerate_devices(&self) -> Vec<OutputDevice> {
        vec![OutputDevice::new(0, "Speakers")]
    }

    fn play(&mut self, sound: &Sound) {
        self.calls.lock().push(format!("play:{}", sound.name));
    }

    fn pause(&mut self) {
        self.calls.lock().push("pause".to_string());
    }

    fn resume(&mut self) {
        self.calls.lock().push("resume".to_string());
    }

    fn stop(&mut self) {
        self.calls.lock().push("stop".to_string());
    }

    fn set_volume(&mut self, gain: f32) {
        self.calls.lock().push(format!("volume:{gain:.2}"));
    }

    fn set_primary_volume(&mut self, gain: f32) {
        self.calls.lock().push(format!("primary:{gain:.2}"));
    }

    fn set_secondary_volume(&mut self, gain: f32) {
        self.calls.lock().push(format!("secondary:{gain:.2}"));
    }

    fn set_overlap(&mut self, overlap: bool) {
        self.calls.lock().push(format!("overlap:{overlap}"));
    }

    fn change_primary_device(&mut self, device: &OutputDevice) {
        self.calls.lock().push(format!("route_primary:{}", device.name));
    }

    fn change_secondary_device(&mut self, device: &OutputDevice) {
        self.calls
            .lock()
            .push(format!("route_secondary:{}", device.name));
    }
}

/// Dialog stub with canned results
#[derive(Default)]
struct StubDialogs {
    counter_file: Option<PathBuf>,
    sound_files: Option<Vec<PathBuf>>,
}

impl FileDialogs for StubDialogs {
    fn open_counter_file(&self) -> Option<PathBuf> {
        self.counter_file.clone()
    }

    fn open_sound_files(&self) -> Option<Vec<PathBuf>> {
        self.sound_files.clone()
    }
}

/// Persistence stub that only counts saves
#[derive(Default, Clone)]
struct MemoryStore {
    saves: Arc<Mutex<usize>>,
}

impl ConfigStore for MemoryStore {
    fn save(&self, _config: &Config) -> anyhow::Result<()> {
        *self.saves.lock() += 1;
        Ok(())
    }
}

fn build(config: Config) -> (Coordinator, Arc<Mutex<Vec<String>>>) {
    let (playback, calls) = RecordingPlayback::new();
    let coordinator = Coordinator::new(
        config,
        Box::new(playback),
        Box::new(StubDialogs::default()),
        Box::new(MemoryStore::default()),
        None,
    );
    // Construction applies the persisted volumes; those calls are not
    // interesting to the scenarios below.
    calls.lock().clear();
    (coordinator, calls)
}

fn config_with_two_counters() -> Config {
    let mut config = Config::default();
    config.normalize();
    let mut a = Counter::new("A");
    a.increment = 5;
    let mut b = Counter::new("B");
    b.count = 10;
    b.increment = 1;
    config.presets[0].counters.push(a);
    config.presets[0].counters.push(b);
    config
}

fn selected_counter_name(coordinator: &Coordinator) -> Option<String> {
    coordinator
        .config()
        .selected_preset()
        .selected_counter()
        .map(|c| c.name.clone())
}

#[test]
fn test_navigation_and_mutation_scenario() {
    let (mut coordinator, _) = build(config_with_two_counters());

    coordinator.execute(Command::NextCounter);
    assert_eq!(selected_counter_name(&coordinator).as_deref(), Some("A"));

    coordinator.execute(Command::Increment);
    let a_count = coordinator.config().selected_preset().counters[0].count;
    assert_eq!(a_count, 5);

    coordinator.execute(Command::NextCounter);
    assert_eq!(selected_counter_name(&coordinator).as_deref(), Some("B"));

    coordinator.execute(Command::PreviousCounter);
    assert_eq!(selected_counter_name(&coordinator).as_deref(), Some("A"));

    // Wrap check: from A, previous lands on B.
    coordinator.execute(Command::PreviousCounter);
    assert_eq!(selected_counter_name(&coordinator).as_deref(), Some("B"));
}

#[test]
fn test_next_cycles_with_period_len() {
    let mut config = config_with_two_counters();
    config.presets[0].counters.push(Counter::new("C"));
    let (mut coordinator, _) = build(config);

    coordinator.execute(Command::NextCounter);
    let first = selected_counter_name(&coordinator);
    for _ in 0..3 {
        coordinator.execute(Command::NextCounter);
    }
    assert_eq!(selected_counter_name(&coordinator), first);
}

#[test]
fn test_navigation_on_empty_preset_is_noop() {
    let mut config = Config::default();
    config.normalize();
    let (mut coordinator, _) = build(config);

    coordinator.execute(Command::NextCounter);
    coordinator.execute(Command::PreviousCounter);
    assert_eq!(selected_counter_name(&coordinator), None);
}

#[test]
fn test_remove_counter_clears_selection_without_reassignment() {
    let (mut coordinator, _) = build(config_with_two_counters());
    coordinator.execute(Command::NextCounter);
    coordinator.execute(Command::RemoveCounter);

    assert_eq!(selected_counter_name(&coordinator), None);
    assert_eq!(coordinator.config().selected_preset().counters.len(), 1);

    // A second remove with no selection is a silent no-op.
    coordinator.execute(Command::RemoveCounter);
    assert_eq!(coordinator.config().selected_preset().counters.len(), 1);
}

#[test]
fn test_counter_commands_disabled_in_sound_mode() {
    let (mut coordinator, _) = build(config_with_two_counters());
    coordinator.execute(Command::NextCounter);
    coordinator.set_display_mode(DisplayMode::Sounds);

    coordinator.execute(Command::Increment);
    coordinator.execute(Command::NextCounter);
    let preset = coordinator.config().selected_preset();
    assert_eq!(preset.counters[0].count, 0);
    assert_eq!(preset.selected_counter().unwrap().name, "A");
}

#[test]
fn test_sound_commands_noop_when_sound_mode_inactive() {
    let mut config = Config::default();
    config.normalize();
    config.presets[0].add_sound(Sound::new("horn"));
    config.display_mode = DisplayMode::Counters;
    let (mut coordinator, calls) = build(config);

    coordinator.execute(Command::Play);
    coordinator.execute(Command::Pause);
    coordinator.execute(Command::Continue);
    coordinator.execute(Command::Stop);
    assert!(calls.lock().is_empty());
}

#[test]
fn test_play_requires_selection_but_transport_does_not() {
    let mut config = Config::default();
    config.normalize();
    config.presets[0].sounds.push(Sound::new("horn"));
    let (mut coordinator, calls) = build(config);

    // No sound selected: play degrades to a no-op.
    coordinator.execute(Command::Play);
    assert!(calls.lock().is_empty());

    // Pause/continue/stop forward regardless of selection.
    coordinator.execute(Command::Pause);
    coordinator.execute(Command::Continue);
    coordinator.execute(Command::Stop);
    assert_eq!(*calls.lock(), vec!["pause", "resume", "stop"]);

    calls.lock().clear();
    let id = coordinator.config().selected_preset().sounds[0].id;
    coordinator.select_sound(Some(id));
    coordinator.execute(Command::Play);
    assert_eq!(*calls.lock(), vec!["play:horn"]);
}

#[test]
fn test_leaving_sound_mode_forces_stop_exactly_once() {
    let mut config = Config::default();
    config.normalize();
    let (mut coordinator, calls) = build(config);

    coordinator.set_display_mode(DisplayMode::Counters);
    let stops = |calls: &Arc<Mutex<Vec<String>>>| {
        calls.lock().iter().filter(|c| *c == "stop").count()
    };
    // Forced even though nothing was playing.
    assert_eq!(stops(&calls), 1);

    // Counters -> None does not leave sound-active again.
    coordinator.set_display_mode(DisplayMode::None);
    assert_eq!(stops(&calls), 1);

    // Re-entering and leaving again forces another stop.
    coordinator.set_display_mode(DisplayMode::Both);
    coordinator.set_display_mode(DisplayMode::None);
    assert_eq!(stops(&calls), 2);
}

#[test]
fn test_mute_restores_pre_mute_level() {
    let mut config = Config::default();
    config.volume = 75;
    let (mut coordinator, calls) = build(config);

    coordinator.execute(Command::Mute);
    assert_eq!(coordinator.volume(VolumeTarget::Master), 0);
    assert!(calls.lock().contains(&"volume:0.00".to_string()));

    coordinator.execute(Command::Mute);
    assert_eq!(coordinator.volume(VolumeTarget::Master), 75);
    assert_eq!(coordinator.config().volume, 75);
}

#[test]
fn test_mute_after_manual_zero_restores_zero() {
    let (mut coordinator, _) = build(Config::default());

    coordinator.set_volume(VolumeTarget::Primary, 0);
    coordinator.execute(Command::MutePrimary);
    assert_eq!(coordinator.volume(VolumeTarget::Primary), 0);
}

#[test]
fn test_mute_channels_are_independent() {
    let mut config = Config::default();
    config.volume = 50;
    config.secondary_volume = 30;
    let (mut coordinator, _) = build(config);

    coordinator.execute(Command::MuteSecondary);
    assert_eq!(coordinator.volume(VolumeTarget::Secondary), 0);
    assert_eq!(coordinator.volume(VolumeTarget::Master), 50);
    coordinator.execute(Command::MuteSecondary);
    assert_eq!(coordinator.volume(VolumeTarget::Secondary), 30);
}

#[test]
fn test_chord_fires_gated_command_end_to_end() {
    let mut config = config_with_two_counters();
    config.counter_shortcuts.next = vec![Key::Ctrl, Key::Shift, Key::N];
    let (mut coordinator, _) = build(config);

    coordinator.key_down(Key::Ctrl);
    coordinator.key_down(Key::Shift);
    coordinator.key_down(Key::N);
    assert_eq!(selected_counter_name(&coordinator).as_deref(), Some("A"));

    // Held chord does not re-fire.
    coordinator.key_down(Key::N);
    assert_eq!(selected_counter_name(&coordinator).as_deref(), Some("A"));
}

#[test]
fn test_chord_swallowed_while_mode_inactive() {
    let mut config = config_with_two_counters();
    config.counter_shortcuts.increment = vec![Key::Up];
    config.display_mode = DisplayMode::None;
    let (mut coordinator, _) = build(config);

    coordinator.execute(Command::NextCounter); // swallowed too
    coordinator.key_down(Key::Up);
    coordinator.key_up(Key::Up);
    assert_eq!(coordinator.config().selected_preset().counters[0].count, 0);
}

#[test]
fn test_per_sound_chord_plays_that_sound() {
    let mut config = Config::default();
    config.normalize();
    let mut horn = Sound::new("horn");
    horn.keys = vec![Key::F2];
    config.presets[0].sounds.push(horn);
    let (mut coordinator, calls) = build(config);

    coordinator.key_down(Key::F2);
    assert_eq!(*calls.lock(), vec!["play:horn"]);
    // Selection is untouched by per-item playback.
    assert!(coordinator
        .config()
        .selected_preset()
        .selected_sound_id()
        .is_none());
}

#[test]
fn test_per_counter_chord_selects_and_increments() {
    let mut config = config_with_two_counters();
    config.presets[0].counters[1].keys = vec![Key::F3];
    let (mut coordinator, _) = build(config);

    coordinator.key_down(Key::F3);
    let preset = coordinator.config().selected_preset();
    assert_eq!(preset.selected_counter().unwrap().name, "B");
    assert_eq!(preset.counters[1].count, 11);
}

#[test]
fn test_add_counter_selects_and_opens_editor() {
    let (mut coordinator, _) = build(config_with_two_counters());

    coordinator.execute(Command::AddCounter);
    let preset = coordinator.config().selected_preset();
    assert_eq!(preset.counters.len(), 3);
    let selected = preset.selected_counter_id();
    assert_eq!(selected, Some(preset.counters[2].id));
    assert!(coordinator.state().counter_opened);
    assert_eq!(coordinator.state().modified_counter, selected);
}

#[test]
fn test_add_sound_selects_and_opens_editor() {
    let (mut coordinator, _) = build(Config::default());

    coordinator.execute(Command::AddSound);
    let preset = coordinator.config().selected_preset();
    assert_eq!(preset.sounds.len(), 1);
    assert_eq!(preset.selected_sound_id(), Some(preset.sounds[0].id));
    assert!(coordinator.state().sound_opened);
}

#[test]
fn test_remove_sound_clears_selection() {
    let (mut coordinator, _) = build(Config::default());
    coordinator.execute(Command::AddSound);
    coordinator.execute(Command::RemoveSound);

    let preset = coordinator.config().selected_preset();
    assert!(preset.sounds.is_empty());
    assert_eq!(preset.selected_sound_id(), None);
}

#[test]
fn test_preset_switch_rebuilds_shortcuts() {
    let mut config = config_with_two_counters();
    config.presets[0].counters[0].keys = vec![Key::F4];
    config.presets.push(tallyboard::Preset::new("second"));
    let (mut coordinator, _) = build(config);

    coordinator.select_preset(1);
    // The first preset's per-item chord no longer routes.
    coordinator.key_down(Key::F4);
    coordinator.select_preset(0);
    assert_eq!(coordinator.config().presets[0].counters[0].count, 0);
}

#[test]
fn test_last_preset_cannot_be_removed() {
    let (mut coordinator, _) = build(Config::default());
    coordinator.remove_selected_preset();
    assert_eq!(coordinator.config().presets.len(), 1);
}

#[test]
fn test_secondary_device_list_has_disabled_entry() {
    let (coordinator, _) = build(Config::default());

    let primary = coordinator.primary_devices();
    assert!(primary.iter().all(|d| !d.is_disabled()));

    let secondary = coordinator.secondary_devices();
    assert!(secondary[0].is_disabled());
    assert_eq!(secondary.len(), primary.len() + 1);
}

#[test]
fn test_volume_changes_persist() {
    let (playback, _) = RecordingPlayback::new();
    let store = MemoryStore::default();
    let mut coordinator = Coordinator::new(
        Config::default(),
        Box::new(playback),
        Box::new(StubDialogs::default()),
        Box::new(store.clone()),
        None,
    );

    coordinator.set_volume(VolumeTarget::Master, 40);
    coordinator.execute(Command::Mute);
    assert_eq!(*store.saves.lock(), 2);
}

#[test]
fn test_update_status_applies() {
    let (mut coordinator, _) = build(Config::default());
    assert_eq!(coordinator.state().update_status, UpdateStatus::Unknown);

    coordinator.set_update_status(Some("v2.0.0".to_string()));
    assert_eq!(
        coordinator.state().update_status,
        UpdateStatus::Available("v2.0.0".to_string())
    );

    coordinator.set_update_status(None);
    assert_eq!(coordinator.state().update_status, UpdateStatus::UpToDate);
}
