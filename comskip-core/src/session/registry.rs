use std::{fmt, sync::Arc};

use comskip_model::{IntervalSource, RefreshMark, SessionKey, SkipInterval, Ticks};
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::config::DEFAULT_GUARD_TICKS;

/// Everything tracked for one playback session. Kept in a single map entry
/// so a purge drops intervals and refresh mark together.
#[derive(Debug, Default)]
struct SessionTrack {
    intervals: Vec<SkipInterval>,
    source: IntervalSource,
    refresh: Option<RefreshMark>,
}

/// Thread-safe store of skip intervals keyed by session.
///
/// Operations on one session are serialized by the map's entry lock while
/// other sessions proceed in parallel. The registry never hands out the
/// underlying lists; callers only see clones.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<SessionKey, SessionTrack>>,
    guard: Ticks,
}

impl fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("session_count", &self.session_count())
            .field("guard", &self.guard)
            .finish()
    }
}

impl SessionRegistry {
    pub fn new(guard: Ticks) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            guard,
        }
    }

    /// Starts tracking `session` with no intervals, discarding any
    /// leftover state under the same key.
    pub fn track_session(&self, session: &SessionKey) {
        self.sessions
            .insert(session.clone(), SessionTrack::default());
    }

    pub fn is_tracked(&self, session: &SessionKey) -> bool {
        self.sessions.contains_key(session)
    }

    /// Atomically swaps the session's intervals for `intervals`.
    ///
    /// Returns `false` without storing anything when the session is not
    /// tracked, so a load that finishes after a purge cannot bring the
    /// session back.
    pub fn replace_intervals(
        &self,
        session: &SessionKey,
        source: IntervalSource,
        mut intervals: Vec<SkipInterval>,
    ) -> bool {
        let before = intervals.len();
        intervals.retain(|interval| &interval.session == session);
        if intervals.len() != before {
            warn!(
                target: "comskip::registry",
                session = %session,
                dropped = before - intervals.len(),
                "ignoring intervals that belong to another session"
            );
        }

        match self.sessions.get_mut(session) {
            Some(mut track) => {
                track.intervals = intervals;
                track.source = source;
                true
            }
            None => {
                debug!(
                    target: "comskip::registry",
                    session = %session,
                    "session no longer tracked; dropping loaded intervals"
                );
                false
            }
        }
    }

    /// Returns the first unconsumed interval containing `position` and marks
    /// it consumed under the same lock, so it fires at most once.
    pub fn find_match(
        &self,
        session: &SessionKey,
        position: Ticks,
    ) -> Option<SkipInterval> {
        let mut track = self.sessions.get_mut(session)?;
        let guard = self.guard;
        let found = track
            .intervals
            .iter_mut()
            .find(|interval| !interval.consumed && interval.contains(position, guard))?;
        found.consumed = true;
        Some(found.clone())
    }

    /// Removes every interval and the refresh mark for `session`.
    ///
    /// Idempotent; returns whether anything was tracked.
    pub fn purge_session(&self, session: &SessionKey) -> bool {
        let removed = self.sessions.remove(session).is_some();
        if removed {
            debug!(target: "comskip::registry", session = %session, "purged session");
        }
        removed
    }

    pub fn source(&self, session: &SessionKey) -> Option<IntervalSource> {
        self.sessions.get(session).map(|track| track.source)
    }

    pub fn interval_count(&self, session: &SessionKey) -> usize {
        self.sessions
            .get(session)
            .map(|track| track.intervals.len())
            .unwrap_or_default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub(crate) fn last_loaded(&self, session: &SessionKey) -> Option<i64> {
        self.sessions.get(session).and_then(|track| {
            track
                .refresh
                .as_ref()
                .map(|mark| mark.last_loaded_epoch_secs)
        })
    }

    pub(crate) fn set_last_loaded(&self, session: &SessionKey, now: i64) -> bool {
        match self.sessions.get_mut(session) {
            Some(mut track) => {
                track.refresh = Some(RefreshMark {
                    session: session.clone(),
                    last_loaded_epoch_secs: now,
                });
                true
            }
            None => false,
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(Ticks::new(DEFAULT_GUARD_TICKS))
    }
}
