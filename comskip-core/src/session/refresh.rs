use comskip_model::SessionKey;
use tracing::debug;

use crate::config::DEFAULT_REFRESH_INTERVAL_SECS;

use super::registry::SessionRegistry;

/// Decides when intervals backed by a still-growing marker file are stale.
///
/// Marks live in the registry entry of their session so a purge removes
/// them together with the intervals.
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    registry: SessionRegistry,
    interval_secs: i64,
}

impl RefreshScheduler {
    pub fn new(registry: SessionRegistry, interval_secs: i64) -> Self {
        Self {
            registry,
            interval_secs,
        }
    }

    /// True when the session is watching a live source whose intervals were
    /// never loaded or were loaded at least `interval_secs` ago.
    ///
    /// Chapter-sourced sessions never reload; chapters do not change.
    pub fn should_reload(
        &self,
        session: &SessionKey,
        is_live_source: bool,
        now_epoch_secs: i64,
    ) -> bool {
        if !is_live_source {
            return false;
        }
        let may_grow = self
            .registry
            .source(session)
            .is_none_or(|source| source.may_grow());
        if !may_grow {
            return false;
        }

        match self.registry.last_loaded(session) {
            None => true,
            Some(last) => {
                let elapsed = now_epoch_secs - last;
                let stale = elapsed >= self.interval_secs;
                if stale {
                    debug!(
                        target: "comskip::refresh",
                        session = %session,
                        elapsed_secs = elapsed,
                        "intervals are stale"
                    );
                }
                stale
            }
        }
    }

    /// Records a (re)load at `now_epoch_secs`. No-op for untracked sessions.
    pub fn mark_reloaded(&self, session: &SessionKey, now_epoch_secs: i64) {
        if !self.registry.set_last_loaded(session, now_epoch_secs) {
            debug!(
                target: "comskip::refresh",
                session = %session,
                "not marking reload for untracked session"
            );
        }
    }
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(SessionRegistry::default(), DEFAULT_REFRESH_INTERVAL_SECS)
    }
}
