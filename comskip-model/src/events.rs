use std::path::PathBuf;

use crate::ids::{ItemId, SessionKey};
use crate::ticks::Ticks;

/// Playback lifecycle notification emitted by the host.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum PlaybackEvent {
    Started(PlaybackStart),
    Progress(PlaybackProgress),
    Stopped(PlaybackStop),
}

impl PlaybackEvent {
    pub fn session(&self) -> &SessionKey {
        match self {
            PlaybackEvent::Started(start) => &start.session,
            PlaybackEvent::Progress(progress) => &progress.session,
            PlaybackEvent::Stopped(stop) => &stop.session,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackStart {
    pub session: SessionKey,
    pub item: ItemId,
    /// Empty when the host has no filesystem path for the item.
    pub media_path: PathBuf,
    pub media_name: String,
    pub is_live_recording: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackProgress {
    pub session: SessionKey,
    pub item: ItemId,
    pub media_path: PathBuf,
    pub position: Option<Ticks>,
    pub is_paused: bool,
    pub is_live_recording: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackStop {
    pub session: SessionKey,
    pub media_name: String,
}
