use crate::ids::SessionKey;
use crate::ticks::Ticks;

/// One candidate skip region for a playback session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkipInterval {
    pub session: SessionKey,
    pub start: Ticks,
    pub end: Ticks,
    /// Set once the interval has triggered a seek; never cleared.
    pub consumed: bool,
}

impl SkipInterval {
    /// Builds an interval, flooring the start to one second.
    ///
    /// Returns `None` when nothing would be left to skip after the floor.
    pub fn new(session: SessionKey, start: Ticks, end: Ticks) -> Option<Self> {
        let start = start.floor_to_one_second();
        if end <= start {
            return None;
        }
        Some(Self {
            session,
            start,
            end,
            consumed: false,
        })
    }

    pub fn duration(&self) -> Ticks {
        self.end - self.start
    }

    /// True when `position` falls inside the interval, stopping `guard`
    /// ticks short of its end.
    pub fn contains(&self, position: Ticks, guard: Ticks) -> bool {
        position >= self.start && position < self.end - guard
    }
}

/// Where a session's intervals were loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IntervalSource {
    /// Neither a marker file nor advertisement chapters were usable.
    #[default]
    None,
    Marker,
    Chapters,
}

impl IntervalSource {
    /// Chapters never change after ingest; marker files can still grow
    /// while a recording is being written.
    pub fn may_grow(&self) -> bool {
        !matches!(self, IntervalSource::Chapters)
    }
}

/// When a session's intervals were last (re)loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RefreshMark {
    pub session: SessionKey,
    pub last_loaded_epoch_secs: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_floored_to_one_second() {
        let interval =
            SkipInterval::new("s".into(), Ticks::ZERO, Ticks::from_secs(5))
                .expect("non-empty interval");
        assert_eq!(interval.start, Ticks::ONE_SECOND);
        assert!(!interval.consumed);
    }

    #[test]
    fn collapsed_interval_is_rejected() {
        assert!(
            SkipInterval::new("s".into(), Ticks::ZERO, Ticks::new(5_000_000))
                .is_none()
        );
    }

    #[test]
    fn guard_shortens_the_match_window() {
        let interval = SkipInterval::new(
            "s".into(),
            Ticks::from_secs(1),
            Ticks::from_secs(5),
        )
        .expect("non-empty interval");
        let guard = Ticks::new(1000);
        assert!(interval.contains(Ticks::from_secs(1), guard));
        assert!(interval.contains(interval.end - Ticks::new(1001), guard));
        assert!(!interval.contains(interval.end - Ticks::new(1000), guard));
        assert!(!interval.contains(interval.end - Ticks::new(1), guard));
    }
}
