//! Per-session interval state and the policies that read it.

pub mod matcher;
pub mod refresh;
pub mod registry;

pub use matcher::ProgressMatcher;
pub use refresh::RefreshScheduler;
pub use registry::SessionRegistry;
