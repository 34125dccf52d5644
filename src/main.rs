// Hide console window on Windows release builds
#![cfg_attr(
    all(target_os = "windows", not(debug_assertions)),
    windows_subsystem = "windows"
)]

//! Tallyboard - Entry Point
//!
//! Creates the event loop and the window that hosts the keyboard hook,
//! builds the coordinator, and routes every external event through the
//! single-threaded mutation path.

use anyhow::Result;
use tallyboard::{
    audio::CpalPlayback,
    core::config::TomlConfigStore,
    dialogs::NativeDialogs,
    update, AppEvent, Config, Coordinator, EventSender, Key,
};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

/// Main application handler for the winit event loop
struct App {
    /// The single owner of all mutable application state
    coordinator: Coordinator,
    /// Event receiver for inter-module communication
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Event sender handed to background workers
    event_tx: EventSender,
    /// The window whose keyboard events feed the shortcut router
    window: Option<Window>,
    /// Whether the startup update check has been spawned
    update_check_started: bool,
}

impl App {
    fn new(
        coordinator: Coordinator,
        event_tx: EventSender,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> Self {
        Self {
            coordinator,
            event_rx,
            event_tx,
            window: None,
            update_check_started: false,
        }
    }

    /// Drain and apply queued events on the event-loop thread
    fn drain_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                AppEvent::KeyDown(key) => self.coordinator.key_down(key),
                AppEvent::KeyUp(key) => self.coordinator.key_up(key),
                AppEvent::Command(command) => self.coordinator.execute(command),
                AppEvent::UpdateCheckFinished(tag) => self.coordinator.set_update_status(tag),
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        if self.window.is_none() {
            let attributes = Window::default_attributes().with_title("Tallyboard");
            match event_loop.create_window(attributes) {
                Ok(window) => self.window = Some(window),
                Err(e) => {
                    warn!("Failed to create window: {}", e);
                }
            }
        }

        // Startup auto-check; fire-and-forget, must not block construction
        if !self.update_check_started {
            self.update_check_started = true;
            update::spawn_check(self.event_tx.clone());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Focused(false) => {
                // Key-up events are lost while unfocused; start over.
                self.coordinator.release_all_keys();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let Some(key) = Key::from_winit(event.physical_key) else {
                    return;
                };
                let app_event = match event.state {
                    ElementState::Pressed => AppEvent::KeyDown(key),
                    ElementState::Released => AppEvent::KeyUp(key),
                };
                // Same handoff path as background workers, so ordering is
                // exactly arrival order.
                let _ = self.event_tx.send(app_event);
            }
            _ => {}
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, _event: ()) {
        self.drain_events();
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.drain_events();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        info!("Exiting");
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tallyboard {}", update::current_version());

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load configuration, using defaults: {:#}", e);
        let mut config = Config::default();
        config.normalize();
        config
    });
    info!(
        "Configuration loaded: {} preset(s), display mode {:?}",
        config.presets.len(),
        config.display_mode
    );

    // Route audio to the persisted devices
    let playback = CpalPlayback::new(&config.primary_device, &config.secondary_device);

    // Create event channel and loop
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let event_loop = EventLoop::new()?;
    let proxy = event_loop.create_proxy();
    let event_sender = EventSender::new(event_tx, proxy);

    let coordinator = Coordinator::new(
        config,
        Box::new(playback),
        Box::new(NativeDialogs),
        Box::new(TomlConfigStore),
        Some(event_sender.clone()),
    );

    let mut app = App::new(coordinator, event_sender, event_rx);
    event_loop.run_app(&mut app)?;

    Ok(())
}
