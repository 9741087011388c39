use std::path::PathBuf;

use comskip_core::SkipperConfig;

pub const CONFIG_PATH_VAR: &str = "COMSKIP_CONFIG_PATH";
pub const CONFIG_JSON_VAR: &str = "COMSKIP_CONFIG_JSON";

/// Per-field overrides read from `COMSKIP_*` environment variables.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub config_path: Option<PathBuf>,
    pub config_json: Option<String>,
    pub enabled: Option<bool>,
    pub disable_message: Option<bool>,
    pub realtime_enabled: Option<bool>,
    pub show_time_in_message: Option<bool>,
    pub message_display_time_seconds: Option<u32>,
    pub main_message_text: Option<String>,
    pub ui_culture: Option<String>,
    /// Variables that were set but could not be parsed.
    pub invalid: Vec<String>,
}

impl EnvOverrides {
    pub fn gather() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds overrides from an arbitrary lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key).filter(|value| !value.trim().is_empty())
        };
        let mut env = Self {
            config_path: get(CONFIG_PATH_VAR).map(PathBuf::from),
            config_json: get(CONFIG_JSON_VAR),
            main_message_text: get("COMSKIP_MESSAGE_TEXT"),
            ui_culture: get("COMSKIP_UI_CULTURE"),
            ..Self::default()
        };

        env.enabled = env.parse_with(&get, "COMSKIP_ENABLED", parse_bool);
        env.disable_message =
            env.parse_with(&get, "COMSKIP_DISABLE_MESSAGE", parse_bool);
        env.realtime_enabled =
            env.parse_with(&get, "COMSKIP_REALTIME", parse_bool);
        env.show_time_in_message =
            env.parse_with(&get, "COMSKIP_SHOW_TIME", parse_bool);
        env.message_display_time_seconds =
            env.parse_with(&get, "COMSKIP_MESSAGE_SECONDS", |raw| {
                raw.trim().parse().ok()
            });

        env
    }

    fn parse_with<T>(
        &mut self,
        get: &dyn Fn(&str) -> Option<String>,
        key: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        let raw = get(key)?;
        let parsed = parse(&raw);
        if parsed.is_none() {
            self.invalid.push(key.to_string());
        }
        parsed
    }

    /// Overwrites fields of `config` that were set in the environment.
    pub fn apply(&self, config: &mut SkipperConfig) {
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }
        if let Some(disable) = self.disable_message {
            config.disable_message = disable;
        }
        if let Some(realtime) = self.realtime_enabled {
            config.realtime_enabled = realtime;
        }
        if let Some(show) = self.show_time_in_message {
            config.show_time_in_message = show;
        }
        if let Some(secs) = self.message_display_time_seconds {
            config.message_display_time_seconds = secs;
        }
        if let Some(text) = &self.main_message_text {
            config.main_message_text = text.clone();
        }
        if let Some(culture) = &self.ui_culture {
            config.ui_culture = culture.clone();
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> EnvOverrides {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvOverrides::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let env = lookup(&[
            ("COMSKIP_REALTIME", "yes"),
            ("COMSKIP_MESSAGE_SECONDS", "5"),
            ("COMSKIP_UI_CULTURE", "de-de"),
        ]);
        let mut config = SkipperConfig::default();
        env.apply(&mut config);

        assert!(config.realtime_enabled);
        assert_eq!(config.message_display_time_seconds, 5);
        assert_eq!(config.ui_culture, "de-de");
        assert!(config.enabled);
    }

    #[test]
    fn unparsable_values_are_reported() {
        let env = lookup(&[
            ("COMSKIP_ENABLED", "maybe"),
            ("COMSKIP_MESSAGE_SECONDS", "-1"),
        ]);
        assert_eq!(env.enabled, None);
        assert_eq!(
            env.invalid,
            vec!["COMSKIP_ENABLED".to_string(), "COMSKIP_MESSAGE_SECONDS".to_string()]
        );
    }

    #[test]
    fn blank_values_are_ignored() {
        let env = lookup(&[("COMSKIP_CONFIG_PATH", "  "), ("COMSKIP_ENABLED", "")]);
        assert!(env.config_path.is_none());
        assert!(env.invalid.is_empty());
    }
}
