//! Interval sources: external marker files and advertisement chapters.

pub mod chapters;
pub mod marker;

pub use chapters::{ADVERTISEMENT_CHAPTER, parse_chapters};
pub use marker::{
    MUTE_KIND, MarkerLineError, marker_path_for, parse_marker_source,
    parse_marker_str,
};
