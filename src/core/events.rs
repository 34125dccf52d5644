//! Application event definitions
//!
//! Every external execution context (keyboard hook, update-check worker)
//! hands off into the coordinator's single-threaded mutation path by
//! sending one of these events; nothing outside the event-loop thread
//! touches coordinator state directly.

use crate::core::command::Command;
use crate::hotkey::keys::Key;
use tokio::sync::mpsc;
use winit::event_loop::EventLoopProxy;

/// Wrapper around `mpsc::UnboundedSender<AppEvent>` that also wakes the
/// winit event loop via `EventLoopProxy::wake_up()` after every send, so
/// the loop can run `ControlFlow::Wait` without missing background events.
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<AppEvent>,
    proxy: EventLoopProxy<()>,
}

impl EventSender {
    pub fn new(tx: mpsc::UnboundedSender<AppEvent>, proxy: EventLoopProxy<()>) -> Self {
        Self { tx, proxy }
    }

    pub fn send(&self, event: AppEvent) -> Result<(), mpsc::error::SendError<AppEvent>> {
        let result = self.tx.send(event);
        let _ = self.proxy.send_event(());
        result
    }
}

/// Application-wide events for inter-module communication
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Physical key went down (from the keyboard hook)
    KeyDown(Key),

    /// Physical key came up (from the keyboard hook)
    KeyUp(Key),

    /// A logical command was requested (UI action or resolved chord)
    Command(Command),

    /// Update check finished; Some(tag) when a newer release exists
    UpdateCheckFinished(Option<String>),
}
