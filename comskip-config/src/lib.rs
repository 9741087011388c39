//! Shared configuration library for the commercial skipper.
//!
//! Centralizes config loading (TOML / JSON files, inline JSON, environment
//! overrides and `.env`), guard rails, and the tracing subscriber bootstrap
//! used by hosts and the `comskip-inspect` binary.

#![allow(missing_docs)]

pub mod env;
pub mod loader;
pub mod telemetry;
pub mod validation;

pub use env::EnvOverrides;
pub use loader::{
    ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions,
    ConfigSource, load_file,
};
pub use telemetry::{DEFAULT_LOG_FILTER, init_tracing};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
