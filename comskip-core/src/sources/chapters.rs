//! Advertisement intervals derived from chapter metadata.

use comskip_model::{Chapter, SessionKey, SkipInterval};
use tracing::debug;

/// Chapter name (compared case-insensitively) that marks a commercial break.
pub const ADVERTISEMENT_CHAPTER: &str = "advertisement";

/// Emits one interval per advertisement chapter that has a successor,
/// running from its start to the next chapter's start.
///
/// A trailing advertisement chapter has no known end and is ignored.
pub fn parse_chapters(
    chapters: &[Chapter],
    session: &SessionKey,
) -> Vec<SkipInterval> {
    let intervals: Vec<SkipInterval> = chapters
        .windows(2)
        .filter(|pair| pair[0].name.eq_ignore_ascii_case(ADVERTISEMENT_CHAPTER))
        .filter_map(|pair| {
            SkipInterval::new(session.clone(), pair[0].start, pair[1].start)
        })
        .collect();

    if intervals.is_empty() {
        debug!(
            target: "comskip::chapters",
            session = %session,
            chapters = chapters.len(),
            "no advertisement chapters found"
        );
    }

    intervals
}
