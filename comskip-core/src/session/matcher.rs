use comskip_model::{SessionKey, SkipInterval, Ticks};

use super::registry::SessionRegistry;

/// Matches playback progress ticks against a session's intervals.
#[derive(Debug, Clone)]
pub struct ProgressMatcher {
    registry: SessionRegistry,
}

impl ProgressMatcher {
    pub fn new(registry: SessionRegistry) -> Self {
        Self { registry }
    }

    /// Paused sessions and ticks without a position never match. A returned
    /// interval is already marked consumed.
    pub fn on_progress(
        &self,
        session: &SessionKey,
        position: Option<Ticks>,
        is_paused: bool,
    ) -> Option<SkipInterval> {
        if is_paused {
            return None;
        }
        self.registry.find_match(session, position?)
    }
}
