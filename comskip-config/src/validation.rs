use comskip_core::SkipperConfig;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigGuardRailError {
    #[error("event_workers must be at least 1")]
    NoEventWorkers,
    #[error("refresh_interval_secs must be positive, got {0}")]
    InvalidRefreshInterval(i64),
    #[error("guard_ticks must not be negative, got {0}")]
    NegativeGuard(i64),
    #[error("marker_extension must not be empty")]
    EmptyMarkerExtension,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Emits every warning through `tracing`.
    pub fn log(&self) {
        for warning in &self.items {
            match &warning.hint {
                Some(hint) => tracing::warn!(hint = %hint, "{}", warning.message),
                None => tracing::warn!("{}", warning.message),
            }
        }
    }
}

/// Rejects configurations the engine cannot run with and collects
/// warnings for ones that run but probably misbehave.
pub fn apply_guard_rails(
    config: &SkipperConfig,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    if config.event_workers == 0 {
        return Err(ConfigGuardRailError::NoEventWorkers);
    }
    if config.refresh_interval_secs <= 0 {
        return Err(ConfigGuardRailError::InvalidRefreshInterval(
            config.refresh_interval_secs,
        ));
    }
    if config.guard_ticks < 0 {
        return Err(ConfigGuardRailError::NegativeGuard(config.guard_ticks));
    }
    if config.marker_extension.trim_start_matches('.').trim().is_empty() {
        return Err(ConfigGuardRailError::EmptyMarkerExtension);
    }

    let mut warnings = ConfigWarnings::default();

    if !config.enabled {
        warnings.push("commercial skipping is disabled; playback events are ignored");
    }

    if !config.disable_message {
        if config.main_message_text.trim().is_empty() {
            warnings.push_with_hint(
                "main_message_text is empty; skip notifications will be blank",
                "set main_message_text or disable_message = true",
            );
        }
        if config.message_display_time_seconds == 0 {
            warnings.push_with_hint(
                "message_display_time_seconds is 0; clients may hide notifications immediately",
                "use a value of 1 or more",
            );
        }
    }

    if config.guard_exceeds_one_second() {
        warnings.push_with_hint(
            format!(
                "guard_ticks = {} is at least one second; short breaks may never fire",
                config.guard_ticks
            ),
            "the default guard is 1000 ticks",
        );
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_without_warnings() {
        let warnings =
            apply_guard_rails(&SkipperConfig::default()).expect("valid");
        assert!(warnings.is_empty(), "{:?}", warnings.items);
    }

    #[test]
    fn zero_workers_are_rejected() {
        let config = SkipperConfig {
            event_workers: 0,
            ..SkipperConfig::default()
        };
        assert_eq!(
            apply_guard_rails(&config).unwrap_err(),
            ConfigGuardRailError::NoEventWorkers
        );
    }

    #[test]
    fn non_positive_refresh_is_rejected() {
        let config = SkipperConfig {
            refresh_interval_secs: 0,
            ..SkipperConfig::default()
        };
        assert_eq!(
            apply_guard_rails(&config).unwrap_err(),
            ConfigGuardRailError::InvalidRefreshInterval(0)
        );
    }

    #[test]
    fn dot_only_extension_is_rejected() {
        let config = SkipperConfig {
            marker_extension: ".".into(),
            ..SkipperConfig::default()
        };
        assert_eq!(
            apply_guard_rails(&config).unwrap_err(),
            ConfigGuardRailError::EmptyMarkerExtension
        );
    }

    #[test]
    fn message_problems_only_warn_when_messages_are_on() {
        let noisy = SkipperConfig {
            main_message_text: "  ".into(),
            message_display_time_seconds: 0,
            ..SkipperConfig::default()
        };
        assert_eq!(apply_guard_rails(&noisy).expect("valid").len(), 2);

        let quiet = SkipperConfig {
            disable_message: true,
            ..noisy
        };
        assert!(apply_guard_rails(&quiet).expect("valid").is_empty());
    }

    #[test]
    fn long_guard_warns() {
        let config = SkipperConfig {
            guard_ticks: 20_000_000,
            ..SkipperConfig::default()
        };
        let warnings = apply_guard_rails(&config).expect("valid");
        assert_eq!(warnings.len(), 1);
        assert!(warnings.items[0].hint.is_some());
    }
}
