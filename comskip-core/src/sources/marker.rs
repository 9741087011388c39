//! Marker (EDL) file parsing.
//!
//! Each non-empty line holds `start<TAB>end<TAB>kind`, with seconds written
//! using `.` as the decimal separator whatever the host locale. Any bad line
//! rejects the whole file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use comskip_model::{SessionKey, SkipInterval, Ticks};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::MarkerError;

/// Lines of this kind only mute audio and must not be skipped.
pub const MUTE_KIND: i32 = 1;

const FIELD_COUNT: usize = 3;

/// A single offending line inside marker text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {reason}")]
pub struct MarkerLineError {
    /// 1-based line number.
    pub line: usize,
    pub reason: String,
}

/// Path of the marker file for `media_path`: same base name, marker extension.
pub fn marker_path_for(media_path: &Path, extension: &str) -> PathBuf {
    media_path.with_extension(extension.trim_start_matches('.'))
}

/// Reads and parses the marker file at `path`.
///
/// A missing file yields [`MarkerError::NotFound`] so the caller can fall
/// back to chapters. A malformed file yields [`MarkerError::Malformed`] and
/// no intervals at all.
pub fn parse_marker_source(
    path: &Path,
    session: &SessionKey,
) -> Result<Vec<SkipInterval>, MarkerError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(target: "comskip::marker", path = %path.display(), "marker file does not exist");
            return Err(MarkerError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            warn!(target: "comskip::marker", path = %path.display(), error = %source, "could not read marker file");
            return Err(MarkerError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    debug!(target: "comskip::marker", path = %path.display(), "marker file found");

    parse_marker_str(&contents, session).map_err(|err| {
        warn!(
            target: "comskip::marker",
            path = %path.display(),
            line = err.line,
            reason = %err.reason,
            "could not parse marker file; discarding it"
        );
        MarkerError::Malformed {
            path: path.to_path_buf(),
            line: err.line,
            reason: err.reason,
        }
    })
}

/// Parses marker text into skip intervals for `session`.
///
/// A leading UTF-8 byte order mark is ignored.
pub fn parse_marker_str(
    contents: &str,
    session: &SessionKey,
) -> Result<Vec<SkipInterval>, MarkerLineError> {
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
    let mut intervals = Vec::new();

    for (index, raw) in contents.lines().enumerate() {
        let line = index + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let record = parse_record(raw)
            .map_err(|reason| MarkerLineError { line, reason })?;

        if record.kind == MUTE_KIND {
            debug!(target: "comskip::marker", line, "skipping mute-only region");
            continue;
        }

        match SkipInterval::new(session.clone(), record.start, record.end) {
            Some(interval) => intervals.push(interval),
            None => {
                debug!(
                    target: "comskip::marker",
                    line,
                    start = %record.start,
                    end = %record.end,
                    "dropping empty region"
                );
            }
        }
    }

    Ok(intervals)
}

struct MarkerRecord {
    start: Ticks,
    end: Ticks,
    kind: i32,
}

fn parse_record(raw: &str) -> Result<MarkerRecord, String> {
    let fields: Vec<&str> = raw.split('\t').collect();
    if fields.len() != FIELD_COUNT {
        return Err(format!(
            "expected {FIELD_COUNT} tab-separated fields, found {}",
            fields.len()
        ));
    }

    let start = parse_seconds(fields[0], "start")?;
    let end = parse_seconds(fields[1], "end")?;
    let kind = fields[2]
        .trim()
        .parse::<i32>()
        .map_err(|err| format!("invalid kind `{}`: {err}", fields[2].trim()))?;

    Ok(MarkerRecord { start, end, kind })
}

fn parse_seconds(field: &str, label: &str) -> Result<Ticks, String> {
    let value = field.trim();
    let secs = value
        .parse::<f64>()
        .map_err(|err| format!("invalid {label} `{value}`: {err}"))?;
    Ticks::from_secs_f64(secs)
        .ok_or_else(|| format!("{label} `{value}` is not a finite number"))
}
