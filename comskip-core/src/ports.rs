//! Collaborator ports the host implements.

use async_trait::async_trait;
use comskip_model::{Chapter, ItemId, SessionInfo, SessionKey, Ticks};

use crate::error::Result;

/// Read access to the host's media library.
#[async_trait]
pub trait ChapterLibrary: Send + Sync {
    /// Chapters of `item` ordered by start position.
    async fn chapters(&self, item: &ItemId) -> Result<Vec<Chapter>>;
}

/// Remote-control surface of the host's session manager.
#[async_trait]
pub trait SessionCommands: Send + Sync {
    async fn session(&self, key: &SessionKey) -> Option<SessionInfo>;

    /// Every currently connected session.
    async fn sessions(&self) -> Vec<SessionInfo>;

    async fn seek(&self, control: &SessionKey, position: Ticks) -> Result<()>;

    async fn send_message(
        &self,
        control: &SessionKey,
        text: &str,
        timeout_ms: u64,
    ) -> Result<()>;
}

/// Translates notification text into the client's locale.
pub trait MessageLocalizer: Send + Sync {
    /// Returns `text` unchanged when no translation is known.
    fn localize(&self, text: &str, locale: &str) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughLocalizer;

impl MessageLocalizer for PassthroughLocalizer {
    fn localize(&self, text: &str, _locale: &str) -> String {
        text.to_string()
    }
}

/// Wall clock in whole seconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_epoch_secs(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}
