use std::{
    fs,
    path::{Path, PathBuf},
};

use comskip_core::SkipperConfig;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    env::EnvOverrides,
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};

const DEFAULT_CONFIG_LOCATIONS: &[&str] =
    &["comskip.toml", "config/comskip.toml"];

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    /// Skip reading `.env` entirely.
    pub skip_env_file: bool,
}

/// Where the base configuration came from, before environment overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Path passed to the loader explicitly.
    Explicit(PathBuf),
    /// Path taken from `COMSKIP_CONFIG_PATH`.
    EnvPath(PathBuf),
    /// Inline JSON from `COMSKIP_CONFIG_JSON`.
    EnvInline,
    /// One of the well-known default locations.
    DefaultFile(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(path)
            | ConfigSource::EnvPath(path)
            | ConfigSource::DefaultFile(path) => Some(path),
            ConfigSource::EnvInline | ConfigSource::Defaults => None,
        }
    }
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: SkipperConfig,
    pub source: ConfigSource,
    pub warnings: ConfigWarnings,
    pub env_file_loaded: bool,
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to parse JSON configuration from {origin}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn without_env_file(mut self) -> Self {
        self.options.skip_env_file = true;
        self
    }

    /// Loads `.env`, then the process environment, then resolves the file.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = self.load_env_file()?;
        let mut load = self.load_with_env(&EnvOverrides::gather())?;
        load.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Same as [`ConfigLoader::load`] with caller-supplied overrides and no
    /// `.env` handling.
    pub fn load_with_env(
        &self,
        env: &EnvOverrides,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (mut config, source) = self.load_base(env)?;
        env.apply(&mut config);

        let mut warnings = validation::apply_guard_rails(&config)?;
        for key in &env.invalid {
            warnings.push_with_hint(
                format!("ignoring unparsable value for {key}"),
                "booleans accept true/false, 1/0, yes/no, on/off",
            );
        }

        info!(source = ?source, enabled = config.enabled, "configuration loaded");

        Ok(ConfigLoad {
            config,
            source,
            warnings,
            env_file_loaded: false,
        })
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        if self.options.skip_env_file {
            return Ok(false);
        }
        let result = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path),
            None => dotenvy::dotenv().map(|_| ()),
        };
        match result {
            Ok(()) => Ok(true),
            Err(dotenvy::Error::Io(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn load_base(
        &self,
        env: &EnvOverrides,
    ) -> Result<(SkipperConfig, ConfigSource), ConfigLoadError> {
        if let Some(path) = &self.options.config_path {
            let config = load_required(path)?;
            return Ok((config, ConfigSource::Explicit(path.clone())));
        }

        if let Some(path) = &env.config_path {
            let config = load_required(path)?;
            return Ok((config, ConfigSource::EnvPath(path.clone())));
        }

        if let Some(raw) = &env.config_json {
            let config = serde_json::from_str(raw).map_err(|source| {
                ConfigLoadError::Json {
                    origin: crate::env::CONFIG_JSON_VAR.to_string(),
                    source,
                }
            })?;
            return Ok((config, ConfigSource::EnvInline));
        }

        let default = DEFAULT_CONFIG_LOCATIONS
            .iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.exists());
        if let Some(path) = default {
            let config = load_file(&path)?;
            return Ok((config, ConfigSource::DefaultFile(path)));
        }

        debug!("no configuration file found; using defaults");
        Ok((SkipperConfig::default(), ConfigSource::Defaults))
    }
}

fn load_required(path: &Path) -> Result<SkipperConfig, ConfigLoadError> {
    if !path.exists() {
        return Err(ConfigLoadError::MissingConfig {
            path: path.to_path_buf(),
        });
    }
    load_file(path)
}

/// Reads a TOML or JSON (by `.json` extension) configuration file.
pub fn load_file(path: &Path) -> Result<SkipperConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&contents).map_err(|source| {
            ConfigLoadError::Json {
                origin: path.display().to_string(),
                source,
            }
        })
    } else {
        toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
