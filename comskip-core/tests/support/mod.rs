#![allow(dead_code)]

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicI64, Ordering},
    },
};

use async_trait::async_trait;
use comskip_core::{
    ComSkipper, SkipperConfig, SkipperError,
    model::{
        Chapter, DISPLAY_MESSAGE_COMMAND, ItemId, PlaybackProgress,
        PlaybackStart, PlaybackStop, SessionInfo, SessionKey, Ticks,
    },
    ports::{ChapterLibrary, Clock, MessageLocalizer, SessionCommands},
};
use parking_lot::Mutex;

pub const DEVICE: &str = "device-1";

pub fn session_info(key: &str, remote: bool, display: bool) -> SessionInfo {
    SessionInfo {
        key: SessionKey::new(key),
        device_id: DEVICE.to_string(),
        supports_remote_control: remote,
        supported_commands: if display {
            vec![DISPLAY_MESSAGE_COMMAND.to_string()]
        } else {
            Vec::new()
        },
    }
}

/// Session manager stub that records every command it receives.
#[derive(Default)]
pub struct RecordingCommands {
    sessions: Mutex<Vec<SessionInfo>>,
    pub seeks: Mutex<Vec<(SessionKey, Ticks)>>,
    pub messages: Mutex<Vec<(SessionKey, String, u64)>>,
    pub fail_seeks: AtomicBool,
    pub fail_messages: AtomicBool,
}

impl RecordingCommands {
    pub fn with_sessions(sessions: Vec<SessionInfo>) -> Arc<Self> {
        Arc::new(Self {
            sessions: Mutex::new(sessions),
            ..Self::default()
        })
    }

    pub fn seeks(&self) -> Vec<(SessionKey, Ticks)> {
        self.seeks.lock().clone()
    }

    pub fn messages(&self) -> Vec<(SessionKey, String, u64)> {
        self.messages.lock().clone()
    }
}

#[async_trait]
impl SessionCommands for RecordingCommands {
    async fn session(&self, key: &SessionKey) -> Option<SessionInfo> {
        self.sessions.lock().iter().find(|s| &s.key == key).cloned()
    }

    async fn sessions(&self) -> Vec<SessionInfo> {
        self.sessions.lock().clone()
    }

    async fn seek(
        &self,
        control: &SessionKey,
        position: Ticks,
    ) -> comskip_core::Result<()> {
        if self.fail_seeks.load(Ordering::SeqCst) {
            return Err(SkipperError::Command("seek refused".into()));
        }
        self.seeks.lock().push((control.clone(), position));
        Ok(())
    }

    async fn send_message(
        &self,
        control: &SessionKey,
        text: &str,
        timeout_ms: u64,
    ) -> comskip_core::Result<()> {
        if self.fail_messages.load(Ordering::SeqCst) {
            return Err(SkipperError::Command("client went away".into()));
        }
        self.messages
            .lock()
            .push((control.clone(), text.to_string(), timeout_ms));
        Ok(())
    }
}

/// Library stub serving fixed chapter lists.
#[derive(Default)]
pub struct FixedLibrary {
    chapters: HashMap<ItemId, Vec<Chapter>>,
}

impl FixedLibrary {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_item(item: &str, chapters: Vec<Chapter>) -> Arc<Self> {
        let mut map = HashMap::new();
        map.insert(ItemId::new(item), chapters);
        Arc::new(Self { chapters: map })
    }
}

#[async_trait]
impl ChapterLibrary for FixedLibrary {
    async fn chapters(&self, item: &ItemId) -> comskip_core::Result<Vec<Chapter>> {
        Ok(self.chapters.get(item).cloned().unwrap_or_default())
    }
}

#[derive(Debug)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn at(now: i64) -> Arc<Self> {
        Arc::new(Self(AtomicI64::new(now)))
    }

    pub fn advance(&self, secs: i64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_epoch_secs(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct Harness {
    pub dir: tempfile::TempDir,
    pub commands: Arc<RecordingCommands>,
    pub clock: Arc<ManualClock>,
    pub skipper: ComSkipper,
}

impl Harness {
    pub fn new(
        config: SkipperConfig,
        library: Arc<FixedLibrary>,
        sessions: Vec<SessionInfo>,
    ) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let commands = RecordingCommands::with_sessions(sessions);
        let clock = ManualClock::at(1_700_000_000);
        let skipper = ComSkipper::new(config, library, commands.clone())
            .with_clock(clock.clone());
        Self {
            dir,
            commands,
            clock,
            skipper,
        }
    }

    pub fn with_localizer(self, localizer: Arc<dyn MessageLocalizer>) -> Self {
        let Harness {
            dir,
            commands,
            clock,
            skipper,
        } = self;
        Self {
            dir,
            commands,
            clock,
            skipper: skipper.with_localizer(localizer),
        }
    }

    pub fn marker_path(&self) -> PathBuf {
        self.dir.path().join("recording.edl")
    }

    pub fn media_path(&self) -> PathBuf {
        self.dir.path().join("recording.ts")
    }

    pub fn write_marker(&self, contents: &str) {
        write_file(&self.marker_path(), contents);
    }

    pub fn start(&self, session: &str, live: bool) -> PlaybackStart {
        PlaybackStart {
            session: SessionKey::new(session),
            item: ItemId::new("item-1"),
            media_path: self.media_path(),
            media_name: "Recording".to_string(),
            is_live_recording: live,
        }
    }

    pub fn progress(&self, session: &str, secs: i64, live: bool) -> PlaybackProgress {
        PlaybackProgress {
            session: SessionKey::new(session),
            item: ItemId::new("item-1"),
            media_path: self.media_path(),
            position: Some(Ticks::from_secs(secs)),
            is_paused: false,
            is_live_recording: live,
        }
    }

    pub fn stop(&self, session: &str) -> PlaybackStop {
        PlaybackStop {
            session: SessionKey::new(session),
            media_name: "Recording".to_string(),
        }
    }
}

pub fn write_file(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write fixture");
}
