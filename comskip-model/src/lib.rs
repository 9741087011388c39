//! Core data model definitions shared across the comskip crates.
#![allow(missing_docs)]

pub mod chapter;
pub mod events;
pub mod ids;
pub mod interval;
pub mod session;
pub mod ticks;

// Intentionally curated re-exports for downstream consumers.
pub use chapter::Chapter;
pub use events::{PlaybackEvent, PlaybackProgress, PlaybackStart, PlaybackStop};
pub use ids::{ItemId, SessionKey};
pub use interval::{IntervalSource, RefreshMark, SkipInterval};
pub use session::{DISPLAY_MESSAGE_COMMAND, SessionInfo};
pub use ticks::{TICKS_PER_SECOND, Ticks};
