use std::fmt;
use std::ops::{Add, Sub};

/// Number of ticks that make up one second of playback (100ns resolution).
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Playback position or duration in host ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Ticks(i64);

impl Ticks {
    pub const ZERO: Ticks = Ticks(0);
    pub const ONE_SECOND: Ticks = Ticks(TICKS_PER_SECOND);

    pub const fn new(ticks: i64) -> Self {
        Ticks(ticks)
    }

    pub const fn from_secs(secs: i64) -> Self {
        Ticks(secs.saturating_mul(TICKS_PER_SECOND))
    }

    /// Converts fractional seconds, truncating toward zero.
    ///
    /// Returns `None` for NaN or infinite input.
    pub fn from_secs_f64(secs: f64) -> Option<Self> {
        if !secs.is_finite() {
            return None;
        }
        Some(Ticks((secs * TICKS_PER_SECOND as f64) as i64))
    }

    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Whole seconds, truncated.
    pub const fn as_secs(&self) -> i64 {
        self.0 / TICKS_PER_SECOND
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / TICKS_PER_SECOND as f64
    }

    /// Never earlier than one second into the title.
    pub fn floor_to_one_second(self) -> Self {
        self.max(Ticks::ONE_SECOND)
    }
}

impl Add for Ticks {
    type Output = Ticks;

    fn add(self, rhs: Ticks) -> Ticks {
        Ticks(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Ticks {
    type Output = Ticks;

    fn sub(self, rhs: Ticks) -> Ticks {
        Ticks(self.0.saturating_sub(rhs.0))
    }
}

impl From<i64> for Ticks {
    fn from(ticks: i64) -> Self {
        Ticks(ticks)
    }
}

impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
