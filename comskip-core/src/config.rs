use comskip_model::{TICKS_PER_SECOND, Ticks};
use serde::{Deserialize, Serialize};

/// Safety margin before an interval's end inside which a position no longer
/// matches. Keeps a seek that lands right at the boundary from re-firing.
pub const DEFAULT_GUARD_TICKS: i64 = 1000;

/// Staleness threshold for intervals backed by a growing marker file.
pub const DEFAULT_REFRESH_INTERVAL_SECS: i64 = 60;

pub const DEFAULT_MARKER_EXTENSION: &str = "edl";

pub const DEFAULT_MESSAGE_TEXT: &str = "Commercial Skipped";

/// Runtime knobs for the skip engine.
///
/// Every field has a default so a partial TOML or JSON payload is enough.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkipperConfig {
    /// Master switch. When off, playback events are ignored entirely.
    pub enabled: bool,
    /// Suppress the on-screen notification for every client.
    pub disable_message: bool,
    /// Re-read marker files every `refresh_interval_secs` while a recording
    /// is still being written.
    pub realtime_enabled: bool,
    /// Append the skipped duration as ` (m:ss)` to the notification.
    pub show_time_in_message: bool,
    pub message_display_time_seconds: u32,
    pub main_message_text: String,
    /// Locale handed to the message localizer.
    pub ui_culture: String,
    /// Extension of the marker file that sits next to the media file.
    pub marker_extension: String,
    pub guard_ticks: i64,
    pub refresh_interval_secs: i64,
    /// Number of runtime workers; events are sharded across them by session.
    pub event_workers: usize,
}

impl Default for SkipperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            disable_message: false,
            realtime_enabled: false,
            show_time_in_message: false,
            message_display_time_seconds: 1,
            main_message_text: DEFAULT_MESSAGE_TEXT.to_string(),
            ui_culture: "en-us".to_string(),
            marker_extension: DEFAULT_MARKER_EXTENSION.to_string(),
            guard_ticks: DEFAULT_GUARD_TICKS,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            event_workers: 4,
        }
    }
}

impl SkipperConfig {
    pub fn guard(&self) -> Ticks {
        Ticks::new(self.guard_ticks)
    }

    pub fn message_timeout_ms(&self) -> u64 {
        u64::from(self.message_display_time_seconds) * 1000
    }

    /// Guard margins of a second or more swallow short intervals entirely.
    pub fn guard_exceeds_one_second(&self) -> bool {
        self.guard_ticks >= TICKS_PER_SECOND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SkipperConfig =
            serde_json::from_str(r#"{"realtime_enabled": true}"#)
                .expect("valid config json");
        assert!(config.realtime_enabled);
        assert!(config.enabled);
        assert_eq!(config.guard_ticks, DEFAULT_GUARD_TICKS);
        assert_eq!(config.marker_extension, "edl");
    }

    #[test]
    fn message_timeout_is_in_milliseconds() {
        let config = SkipperConfig {
            message_display_time_seconds: 3,
            ..SkipperConfig::default()
        };
        assert_eq!(config.message_timeout_ms(), 3000);
    }
}
