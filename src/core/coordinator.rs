//! The application coordinator
//!
//! Owns the configuration, transient state, volume channels, and shortcut
//! router, and is the only code allowed to mutate them. All command
//! execution funnels through [`Coordinator::execute`], which re-evaluates
//! the command's enablement gate on every attempt; a command whose gate is
//! false is swallowed silently. Runs entirely on the event-loop thread.

use crate::audio::Playback;
use crate::core::command::Command;
use crate::core::config::{Config, ConfigStore, DisplayMode};
use crate::core::events::EventSender;
use crate::core::preset::{Counter, CounterId, Preset, Sound, SoundId};
use crate::core::state::{AppState, BindTarget, UpdateStatus};
use crate::core::volume::{VolumeChannel, VolumeTarget};
use crate::dialogs::FileDialogs;
use crate::hotkey::keys::Key;
use crate::hotkey::router::ShortcutRouter;
use crate::update;
use tracing::{debug, warn};

/// Central owner of all mutable application state
pub struct Coordinator {
    config: Config,
    state: AppState,
    master: VolumeChannel,
    primary: VolumeChannel,
    secondary: VolumeChannel,
    router: ShortcutRouter,
    playback: Box<dyn Playback>,
    dialogs: Box<dyn FileDialogs>,
    store: Box<dyn ConfigStore>,
    /// Handoff channel for background work; None when running headless
    /// (tests), where the update check is unavailable.
    event_tx: Option<EventSender>,
}

impl Coordinator {
    /// Build the coordinator from loaded configuration. Applies the
    /// persisted volumes and overlap flag to the playback engine and
    /// registers all shortcut chords.
    pub fn new(
        mut config: Config,
        playback: Box<dyn Playback>,
        dialogs: Box<dyn FileDialogs>,
        store: Box<dyn ConfigStore>,
        event_tx: Option<EventSender>,
    ) -> Self {
        config.normalize();
        let master = VolumeChannel::new(config.volume);
        let primary = VolumeChannel::new(config.primary_volume);
        let secondary = VolumeChannel::new(config.secondary_volume);

        let mut coordinator = Self {
            config,
            state: AppState::new(),
            master,
            primary,
            secondary,
            router: ShortcutRouter::new(),
            playback,
            dialogs,
            store,
            event_tx,
        };
        coordinator.playback.set_volume(coordinator.master.gain());
        coordinator
            .playback
            .set_primary_volume(coordinator.primary.gain());
        coordinator
            .playback
            .set_secondary_volume(coordinator.secondary.gain());
        coordinator.playback.set_overlap(coordinator.config.overlap);
        coordinator.router.rebuild(&coordinator.config);
        coordinator
    }

    /// Current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Transient application state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Level of one volume channel in percent
    pub fn volume(&self, target: VolumeTarget) -> u8 {
        self.channel(target).level()
    }

    fn channel(&self, target: VolumeTarget) -> &VolumeChannel {
        match target {
            VolumeTarget::Master => &self.master,
            VolumeTarget::Primary => &self.primary,
            VolumeTarget::Secondary => &self.secondary,
        }
    }

    /// Persist the configuration. Fire-and-forget: a failed save is
    /// logged and the app keeps running.
    fn persist(&self) {
        if let Err(e) = self.store.save(&self.config) {
            warn!("Failed to save configuration: {:#}", e);
        }
    }

    // --- keyboard event handoff ---

    /// Route a key-down event through the shortcut router and execute the
    /// resolved command, if any.
    pub fn key_down(&mut self, key: Key) {
        if let Some(command) = self.router.key_down(key) {
            self.execute(command);
        }
    }

    /// Route a key-up event
    pub fn key_up(&mut self, key: Key) {
        self.router.key_up(key);
    }

    /// Forget held keys after window focus loss
    pub fn release_all_keys(&mut self) {
        self.router.release_all();
    }

    // --- command execution ---

    /// Execute a command if its gate allows it right now. Disabled
    /// commands are swallowed, never queued.
    pub fn execute(&mut self, command: Command) {
        if !command.is_enabled(self.config.display_mode) {
            debug!("Swallowing {:?}: disabled in current display mode", command);
            return;
        }
        match command {
            Command::Increment => self.increment(),
            Command::Decrement => self.decrement(),
            Command::Reset => self.reset(),
            Command::NextCounter => self.next_counter(),
            Command::PreviousCounter => self.previous_counter(),
            Command::AddCounter => self.add_counter(),
            Command::RemoveCounter => self.remove_counter(),
            Command::OpenCounter => self.open_counter(),
            Command::OpenCounterFile => self.open_counter_file(),
            Command::IncrementCounter(id) => self.increment_counter(id),

            Command::Play => self.play(),
            Command::Pause => self.playback.pause(),
            Command::Continue => self.playback.resume(),
            Command::Stop => self.playback.stop(),
            Command::AddSound => self.add_sound(),
            Command::RemoveSound => self.remove_sound(),
            Command::OpenSound => self.open_sound(),
            Command::OpenSoundFiles => self.open_sound_files(),
            Command::PlaySound(id) => self.play_sound(id),

            Command::OpenSettings => self.state.settings_opened = true,
            Command::OpenAbout => self.state.about_opened = true,
            Command::Mute => self.toggle_mute(VolumeTarget::Master),
            Command::MutePrimary => self.toggle_mute(VolumeTarget::Primary),
            Command::MuteSecondary => self.toggle_mute(VolumeTarget::Secondary),
            Command::BindKeys(target) => self.bind_keys(target),
            Command::CheckForUpdates => self.check_for_updates(),
        }
    }

    // --- counters ---

    fn increment(&mut self) {
        if let Some(counter) = self.config.selected_preset_mut().selected_counter_mut() {
            counter.count += counter.increment;
            self.persist();
        }
    }

    fn decrement(&mut self) {
        if let Some(counter) = self.config.selected_preset_mut().selected_counter_mut() {
            counter.count -= counter.increment;
            self.persist();
        }
    }

    fn reset(&mut self) {
        if let Some(counter) = self.config.selected_preset_mut().selected_counter_mut() {
            counter.count = 0;
            self.persist();
        }
    }

    fn next_counter(&mut self) {
        self.config.selected_preset_mut().select_next_counter();
        self.persist();
    }

    fn previous_counter(&mut self) {
        self.config.selected_preset_mut().select_previous_counter();
        self.persist();
    }

    /// Per-item chord: select the counter and apply its increment
    fn increment_counter(&mut self, id: CounterId) {
        let preset = self.config.selected_preset_mut();
        if !preset.counters.iter().any(|c| c.id == id) {
            debug!("Stale counter chord for {}", id);
            return;
        }
        preset.select_counter(Some(id));
        self.increment();
    }

    fn add_counter(&mut self) {
        let counter = Counter::new("New Counter");
        let id = counter.id;
        self.config.selected_preset_mut().add_counter(counter);
        self.state.modified_counter = Some(id);
        self.state.counter_opened = true;
        self.router.rebuild(&self.config);
        self.persist();
    }

    fn remove_counter(&mut self) {
        self.config.selected_preset_mut().remove_selected_counter();
        self.router.rebuild(&self.config);
        self.persist();
    }

    fn open_counter(&mut self) {
        if let Some(id) = self.config.selected_preset().selected_counter_id() {
            self.state.modified_counter = Some(id);
            self.state.counter_opened = true;
        }
    }

    fn open_counter_file(&mut self) {
        let Some(path) = self.dialogs.open_counter_file() else {
            return;
        };
        let Some(id) = self.state.modified_counter else {
            return;
        };
        let preset = self.config.selected_preset_mut();
        if let Some(counter) = preset.counters.iter_mut().find(|c| c.id == id) {
            counter.file = Some(path);
            counter.read_from_file();
            self.persist();
        }
    }

    // --- sounds ---

    fn play(&mut self) {
        if let Some(sound) = self.config.selected_preset().selected_sound() {
            self.playback.play(sound);
        }
    }

    /// Per-item chord: play that specific sound without moving selection
    fn play_sound(&mut self, id: SoundId) {
        let preset = self.config.selected_preset();
        if let Some(sound) = preset.sounds.iter().find(|s| s.id == id) {
            self.playback.play(sound);
        } else {
            debug!("Stale sound chord for {}", id);
        }
    }

    fn add_sound(&mut self) {
        let sound = Sound::new("New Sound");
        let id = sound.id;
        self.config.selected_preset_mut().add_sound(sound);
        self.state.modified_sound = Some(id);
        self.state.sound_opened = true;
        self.router.rebuild(&self.config);
        self.persist();
    }

    fn remove_sound(&mut self) {
        self.config.selected_preset_mut().remove_selected_sound();
        self.router.rebuild(&self.config);
        self.persist();
    }

    fn open_sound(&mut self) {
        if let Some(id) = self.config.selected_preset().selected_sound_id() {
            self.state.modified_sound = Some(id);
            self.state.sound_opened = true;
        }
    }

    fn open_sound_files(&mut self) {
        let Some(paths) = self.dialogs.open_sound_files() else {
            return;
        };
        let Some(id) = self.state.modified_sound else {
            return;
        };
        let preset = self.config.selected_preset_mut();
        if let Some(sound) = preset.sounds.iter_mut().find(|s| s.id == id) {
            sound.files = paths;
            self.persist();
        }
    }

    // --- presets ---

    /// Select a preset by index and re-read its counters' files. An
    /// out-of-range index is a caller bug and is ignored.
    pub fn select_preset(&mut self, index: usize) {
        if index >= self.config.presets.len() {
            warn!("Ignoring selection of preset index {} out of range", index);
            return;
        }
        self.config.selected_preset = index;
        self.config.selected_preset_mut().read_counter_files();
        self.router.rebuild(&self.config);
        self.persist();
    }

    /// Append a new preset and select it
    pub fn add_preset(&mut self, name: impl Into<String>) {
        self.config.presets.push(Preset::new(name));
        self.config.selected_preset = self.config.presets.len() - 1;
        self.router.rebuild(&self.config);
        self.persist();
    }

    /// Remove the selected preset. The last remaining preset cannot be
    /// removed; exactly one preset must stay selected at all times.
    pub fn remove_selected_preset(&mut self) {
        if self.config.presets.len() <= 1 {
            warn!("Refusing to remove the last preset");
            return;
        }
        let index = self.config.selected_preset;
        self.config.presets.remove(index);
        if self.config.selected_preset >= self.config.presets.len() {
            self.config.selected_preset = self.config.presets.len() - 1;
        }
        self.config.selected_preset_mut().read_counter_files();
        self.router.rebuild(&self.config);
        self.persist();
    }

    /// UI-driven selection of a counter (or clear with None)
    pub fn select_counter(&mut self, id: Option<CounterId>) {
        self.config.selected_preset_mut().select_counter(id);
        self.persist();
    }

    /// UI-driven selection of a sound (or clear with None)
    pub fn select_sound(&mut self, id: Option<SoundId>) {
        self.config.selected_preset_mut().select_sound(id);
        self.persist();
    }

    // --- display mode ---

    /// Switch the display mode. A transition that leaves sound-active
    /// forces a stop of whatever is playing, exactly once.
    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        let was_sound_active = self.config.display_mode.sounds_active();
        self.config.display_mode = mode;
        if was_sound_active && !mode.sounds_active() {
            self.playback.stop();
        }
        self.persist();
    }

    // --- volume ---

    /// Set one channel's level in percent. Does not touch the remembered
    /// pre-mute level.
    pub fn set_volume(&mut self, target: VolumeTarget, level: u8) {
        match target {
            VolumeTarget::Master => self.master.set_level(level),
            VolumeTarget::Primary => self.primary.set_level(level),
            VolumeTarget::Secondary => self.secondary.set_level(level),
        }
        self.apply_volume(target);
        self.persist();
    }

    /// Toggle mute on one channel, restoring the remembered level on
    /// unmute.
    pub fn toggle_mute(&mut self, target: VolumeTarget) {
        match target {
            VolumeTarget::Master => self.master.toggle_mute(),
            VolumeTarget::Primary => self.primary.toggle_mute(),
            VolumeTarget::Secondary => self.secondary.toggle_mute(),
        }
        self.apply_volume(target);
        self.persist();
    }

    /// Mirror a channel's level into the config and the playback engine
    fn apply_volume(&mut self, target: VolumeTarget) {
        match target {
            VolumeTarget::Master => {
                self.config.volume = self.master.level();
                self.playback.set_volume(self.master.gain());
            }
            VolumeTarget::Primary => {
                self.config.primary_volume = self.primary.level();
                self.playback.set_primary_volume(self.primary.gain());
            }
            VolumeTarget::Secondary => {
                self.config.secondary_volume = self.secondary.level();
                self.playback.set_secondary_volume(self.secondary.gain());
            }
        }
    }

    /// Toggle whether sounds layer over running playback
    pub fn set_overlap(&mut self, overlap: bool) {
        self.config.overlap = overlap;
        self.playback.set_overlap(overlap);
        self.persist();
    }

    // --- output devices ---

    /// Devices offered for the primary output
    pub fn primary_devices(&self) -> Vec<crate::audio::OutputDevice> {
        self.playback.enumerate_devices()
    }

    /// Devices offered for the secondary output, with the synthetic
    /// "Disabled" entry prepended
    pub fn secondary_devices(&self) -> Vec<crate::audio::OutputDevice> {
        crate::audio::secondary_device_list(self.playback.as_ref())
    }

    pub fn change_primary_device(&mut self, device: crate::audio::OutputDevice) {
        self.playback.change_primary_device(&device);
        self.config.primary_device = device;
        self.persist();
    }

    pub fn change_secondary_device(&mut self, device: crate::audio::OutputDevice) {
        self.playback.change_secondary_device(&device);
        self.config.secondary_device = device;
        self.persist();
    }

    // --- key binding ---

    /// Open the binding panel for a counter or sound
    pub fn bind_keys(&mut self, target: BindTarget) {
        self.state.modified_bindable = Some(target);
        self.state.bind_keys_opened = true;
    }

    /// Close the binding panel without changes
    pub fn cancel_bind_keys(&mut self) {
        self.state.cancel_bind_keys();
    }

    /// Assign a captured chord to the item the binding panel is pointed
    /// at, then close the panel.
    pub fn apply_binding(&mut self, keys: Vec<Key>) {
        let Some(target) = self.state.modified_bindable else {
            return;
        };
        let preset = self.config.selected_preset_mut();
        match target {
            BindTarget::Counter(id) => {
                if let Some(counter) = preset.counters.iter_mut().find(|c| c.id == id) {
                    counter.keys = keys;
                }
            }
            BindTarget::Sound(id) => {
                if let Some(sound) = preset.sounds.iter_mut().find(|s| s.id == id) {
                    sound.keys = keys;
                }
            }
        }
        self.state.cancel_bind_keys();
        self.router.rebuild(&self.config);
        self.persist();
    }

    /// Clear the chord of the item the binding panel is pointed at
    pub fn clear_keys(&mut self) {
        self.apply_binding(Vec::new());
    }

    // --- update check ---

    fn check_for_updates(&mut self) {
        match &self.event_tx {
            Some(tx) => update::spawn_check(tx.clone()),
            None => debug!("Update check unavailable without an event loop"),
        }
    }

    /// Record a finished update check (from the background worker, via the
    /// event channel)
    pub fn set_update_status(&mut self, newer_tag: Option<String>) {
        self.state.update_status = match newer_tag {
            Some(tag) => UpdateStatus::Available(tag),
            None => UpdateStatus::UpToDate,
        };
    }
}
