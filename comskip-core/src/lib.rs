//! # comskip-core
//!
//! Per-session commercial skipping for a media server.
//!
//! ## Overview
//!
//! When playback starts, the skipper loads candidate skip intervals for the
//! session, preferring a marker (EDL) file next to the media and falling back
//! to chapters named "Advertisement". Every progress tick is matched against
//! those intervals; the first hit seeks the controlling client past the break
//! and optionally shows a notification. Stopping playback forgets the
//! session. Sessions watching a recording that is still being written reload
//! their marker file periodically.
//!
//! ## Architecture
//!
//! - [`sources`]: marker file and chapter parsers
//! - [`session`]: the session registry, refresh scheduler and progress matcher
//! - [`dispatch`]: seek and notification commands
//! - [`ports`]: traits the host implements (library, session commands, clock)
//! - [`service`]: the [`ComSkipper`] event handler
//! - [`runtime`]: start / shutdown lifecycle driving the service from an event source

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod ports;
pub mod runtime;
pub mod service;
pub mod session;
pub mod sources;

pub use comskip_model as model;

pub use config::SkipperConfig;
pub use dispatch::{CommandDispatcher, DispatchOutcome};
pub use error::{MarkerError, Result, SkipperError};
pub use runtime::{InProcPlaybackBus, PlaybackEventSource, SkipperRuntime};
pub use service::ComSkipper;
pub use session::{ProgressMatcher, RefreshScheduler, SessionRegistry};
