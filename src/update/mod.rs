//! Release update checking
//!
//! Fire-and-forget worker that asks the GitHub API for the latest release
//! tag and reports back through the event channel. Network failures are
//! logged and swallowed; the check must never block startup or interrupt
//! shortcut handling.

use crate::core::events::{AppEvent, EventSender};
use anyhow::{Context, Result};
use tracing::{error, info, warn};

const RELEASES_API: &str = "https://api.github.com/repos/vden/tallyboard/releases/latest";

/// Release page opened when the user follows up on an available update
pub const RELEASES_PAGE: &str = "https://github.com/vden/tallyboard/releases";

/// The version this binary was built as
pub fn current_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Spawn a worker thread that checks for a newer release and delivers the
/// outcome as an [`AppEvent::UpdateCheckFinished`]. Used for both the
/// startup auto-check and the manual command.
pub fn spawn_check(event_tx: EventSender) {
    std::thread::spawn(move || match fetch_latest_tag() {
        Ok(tag) => {
            let newer = newer_release(&tag, current_version());
            if let Some(tag) = &newer {
                info!("Update available: {}", tag);
            }
            if let Err(e) = event_tx.send(AppEvent::UpdateCheckFinished(newer)) {
                error!("Failed to deliver update check result: {}", e);
            }
        }
        Err(e) => warn!("Update check failed: {:#}", e),
    });
}

/// Open the release page with the system default handler
pub fn open_releases_page() {
    if let Err(e) = open::that(RELEASES_PAGE) {
        warn!("Failed to open release page: {}", e);
    }
}

fn fetch_latest_tag() -> Result<String> {
    let body: serde_json::Value = ureq::get(RELEASES_API)
        .header("User-Agent", "tallyboard")
        .call()
        .context("Release API request failed")?
        .body_mut()
        .read_json()
        .context("Release API returned invalid JSON")?;

    body.get("tag_name")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .context("Release API response has no tag_name")
}

/// Some(tag) when the fetched tag names a different release than the
/// running version. Tags may carry a leading "v".
fn newer_release(tag: &str, current: &str) -> Option<String> {
    let normalized = tag.trim().trim_start_matches('v');
    if normalized.is_empty() || normalized == current {
        None
    } else {
        Some(tag.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_version_is_not_newer() {
        assert_eq!(newer_release(current_version(), current_version()), None);
        let tagged = format!("v{}", current_version());
        assert_eq!(newer_release(&tagged, current_version()), None);
    }

    #[test]
    fn test_different_version_is_reported() {
        assert_eq!(
            newer_release("v9.9.9", current_version()),
            Some("v9.9.9".to_string())
        );
    }

    #[test]
    fn test_empty_tag_ignored() {
        assert_eq!(newer_release("", current_version()), None);
        assert_eq!(newer_release("v", current_version()), None);
    }
}
