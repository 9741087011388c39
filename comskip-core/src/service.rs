//! Playback event handling: wires parsers, registry, refresh policy,
//! matcher and dispatcher together.

use std::{any::type_name_of_val, fmt, path::Path, sync::Arc};

use comskip_model::{
    IntervalSource, ItemId, PlaybackEvent, PlaybackProgress, PlaybackStart,
    PlaybackStop, SessionKey, SkipInterval,
};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::config::SkipperConfig;
use crate::dispatch::{CommandDispatcher, DispatchOutcome};
use crate::error::Result;
use crate::ports::{
    ChapterLibrary, Clock, MessageLocalizer, PassthroughLocalizer,
    SessionCommands, SystemClock,
};
use crate::session::{ProgressMatcher, RefreshScheduler, SessionRegistry};
use crate::sources::{marker_path_for, parse_chapters, parse_marker_source};

/// Commercial skipper for all active playback sessions.
///
/// Safe to share across tasks; events for different sessions may be handled
/// concurrently. `guard_ticks` and `refresh_interval_secs` are fixed at
/// construction, every other setting follows [`ComSkipper::update_config`].
pub struct ComSkipper {
    config: RwLock<Arc<SkipperConfig>>,
    registry: SessionRegistry,
    refresh: RefreshScheduler,
    matcher: ProgressMatcher,
    dispatcher: CommandDispatcher,
    commands: Arc<dyn SessionCommands>,
    library: Arc<dyn ChapterLibrary>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for ComSkipper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComSkipper")
            .field("config", &self.config.read())
            .field("registry", &self.registry)
            .field("refresh", &self.refresh)
            .field("dispatcher", &self.dispatcher)
            .field("library_type", &type_name_of_val(self.library.as_ref()))
            .field("clock_type", &type_name_of_val(self.clock.as_ref()))
            .finish()
    }
}

impl ComSkipper {
    pub fn new(
        config: SkipperConfig,
        library: Arc<dyn ChapterLibrary>,
        commands: Arc<dyn SessionCommands>,
    ) -> Self {
        let registry = SessionRegistry::new(config.guard());
        let refresh =
            RefreshScheduler::new(registry.clone(), config.refresh_interval_secs);
        let matcher = ProgressMatcher::new(registry.clone());
        let dispatcher = CommandDispatcher::new(
            Arc::clone(&commands),
            Arc::new(PassthroughLocalizer),
        );

        Self {
            config: RwLock::new(Arc::new(config)),
            registry,
            refresh,
            matcher,
            dispatcher,
            commands,
            library,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_localizer(mut self, localizer: Arc<dyn MessageLocalizer>) -> Self {
        self.dispatcher =
            CommandDispatcher::new(Arc::clone(&self.commands), localizer);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Snapshot of the active configuration.
    pub fn config(&self) -> Arc<SkipperConfig> {
        Arc::clone(&self.config.read())
    }

    pub fn update_config(&self, config: SkipperConfig) {
        debug!(target: "comskip::runtime", ?config, "configuration updated");
        *self.config.write() = Arc::new(config);
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub async fn handle_event(&self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::Started(start) => {
                self.on_playback_start(&start).await;
            }
            PlaybackEvent::Progress(progress) => {
                self.on_playback_progress(&progress).await;
            }
            PlaybackEvent::Stopped(stop) => {
                self.on_playback_stopped(&stop);
            }
        }
    }

    /// Loads intervals for a new playback. Returns the source used, or
    /// `None` when the event was ignored.
    pub async fn on_playback_start(
        &self,
        start: &PlaybackStart,
    ) -> Option<IntervalSource> {
        let config = self.config();
        if !config.enabled {
            debug!(target: "comskip::runtime", "playback start ignored; skipper disabled");
            return None;
        }
        if start.media_path.as_os_str().is_empty() {
            debug!(target: "comskip::runtime", session = %start.session, "no media path; nothing to process");
            return None;
        }

        debug!(
            target: "comskip::runtime",
            session = %start.session,
            path = %start.media_path.display(),
            "playback started"
        );

        // Drop stragglers from an earlier playback under the same key.
        self.registry.purge_session(&start.session);
        self.registry.track_session(&start.session);

        let (source, intervals) = self
            .load_intervals(&start.session, &start.item, &start.media_path, &config)
            .await;

        log_intervals(&start.session, &start.media_name, source, &intervals);
        self.registry
            .replace_intervals(&start.session, source, intervals);

        if config.realtime_enabled && start.is_live_recording {
            self.refresh
                .mark_reloaded(&start.session, self.clock.now_epoch_secs());
        }

        Some(source)
    }

    /// Refreshes live intervals when stale, then skips if the position sits
    /// inside an unconsumed interval.
    pub async fn on_playback_progress(
        &self,
        progress: &PlaybackProgress,
    ) -> Option<DispatchOutcome> {
        let config = self.config();
        if !config.enabled {
            return None;
        }

        if config.realtime_enabled && self.registry.is_tracked(&progress.session) {
            self.refresh_if_stale(progress, &config);
        }

        let interval = self.matcher.on_progress(
            &progress.session,
            progress.position,
            progress.is_paused,
        )?;

        Some(
            self.dispatcher
                .dispatch(&progress.session, &interval, &config)
                .await,
        )
    }

    /// Forgets everything tracked for the stopped session.
    pub fn on_playback_stopped(&self, stop: &PlaybackStop) -> bool {
        if !self.config().enabled {
            return false;
        }
        debug!(
            target: "comskip::runtime",
            session = %stop.session,
            name = %stop.media_name,
            "playback stopped"
        );
        self.registry.purge_session(&stop.session)
    }

    /// Marker file first, advertisement chapters as the fallback.
    pub async fn load_intervals(
        &self,
        session: &SessionKey,
        item: &ItemId,
        media_path: &Path,
        config: &SkipperConfig,
    ) -> (IntervalSource, Vec<SkipInterval>) {
        // Absent and malformed markers are both logged by the parser.
        if let Ok(intervals) = load_marker(session, media_path, config) {
            return (IntervalSource::Marker, intervals);
        }

        debug!(
            target: "comskip::chapters",
            session = %session,
            "no usable marker file; looking for advertisement chapters"
        );

        match self.library.chapters(item).await {
            Ok(chapters) => {
                let intervals = parse_chapters(&chapters, session);
                if intervals.is_empty() {
                    (IntervalSource::None, intervals)
                } else {
                    (IntervalSource::Chapters, intervals)
                }
            }
            Err(err) => {
                warn!(
                    target: "comskip::chapters",
                    session = %session,
                    item = %item,
                    error = %err,
                    "could not read chapters"
                );
                (IntervalSource::None, Vec::new())
            }
        }
    }

    fn refresh_if_stale(&self, progress: &PlaybackProgress, config: &SkipperConfig) {
        let now = self.clock.now_epoch_secs();
        if !self
            .refresh
            .should_reload(&progress.session, progress.is_live_recording, now)
        {
            return;
        }
        if progress.media_path.as_os_str().is_empty() {
            return;
        }

        debug!(target: "comskip::refresh", session = %progress.session, "reloading marker data");

        let (source, intervals) =
            match load_marker(&progress.session, &progress.media_path, config) {
                Ok(intervals) => (IntervalSource::Marker, intervals),
                Err(_) => (IntervalSource::None, Vec::new()),
            };
        self.registry
            .replace_intervals(&progress.session, source, intervals);
        self.refresh.mark_reloaded(&progress.session, now);
    }
}

fn load_marker(
    session: &SessionKey,
    media_path: &Path,
    config: &SkipperConfig,
) -> Result<Vec<SkipInterval>> {
    let path = marker_path_for(media_path, &config.marker_extension);
    Ok(parse_marker_source(&path, session)?)
}

fn log_intervals(
    session: &SessionKey,
    media_name: &str,
    source: IntervalSource,
    intervals: &[SkipInterval],
) {
    info!(
        target: "comskip::runtime",
        session = %session,
        name = %media_name,
        ?source,
        count = intervals.len(),
        "skip intervals loaded"
    );
    for interval in intervals {
        debug!(
            target: "comskip::runtime",
            start_secs = interval.start.as_secs(),
            end_secs = interval.end.as_secs(),
            "interval"
        );
    }
}
