//! Start / shutdown lifecycle of the event-driven runtime.

use std::{sync::Arc, time::Duration};

use comskip_core::{
    ComSkipper, InProcPlaybackBus, SkipperConfig, SkipperError, SkipperRuntime,
    model::{PlaybackEvent, SessionKey, Ticks},
};

#[path = "support/mod.rs"]
mod support;

use support::{FixedLibrary, Harness, RecordingCommands, session_info};

async fn wait_for_seeks(commands: &RecordingCommands, expected: usize) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while commands.seeks().len() < expected {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {expected} seeks"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn published_events_drive_skips_until_shutdown() {
    let harness = Harness::new(
        SkipperConfig::default(),
        FixedLibrary::empty(),
        vec![session_info("a", true, false), session_info("b", true, false)],
    );
    harness.write_marker("10.0\t20.0\t0\n");

    let media = harness.media_path();
    let Harness {
        dir: _dir,
        commands,
        skipper,
        ..
    } = harness;

    let bus = InProcPlaybackBus::new(64);
    let runtime = SkipperRuntime::start(Arc::new(skipper), &bus);
    assert!(runtime.is_running());
    assert_eq!(bus.listener_count(), 1);

    for session in ["a", "b"] {
        bus.publish(PlaybackEvent::Started(comskip_core::model::PlaybackStart {
            session: SessionKey::new(session),
            item: "item-1".into(),
            media_path: media.clone(),
            media_name: "Recording".into(),
            is_live_recording: false,
        }));
        bus.publish(PlaybackEvent::Progress(comskip_core::model::PlaybackProgress {
            session: SessionKey::new(session),
            item: "item-1".into(),
            media_path: media.clone(),
            position: Some(Ticks::from_secs(12)),
            is_paused: false,
            is_live_recording: false,
        }));
    }

    wait_for_seeks(&commands, 2).await;
    let mut controls: Vec<String> = commands
        .seeks()
        .into_iter()
        .map(|(key, position)| {
            assert_eq!(position, Ticks::from_secs(20));
            key.into_inner()
        })
        .collect();
    controls.sort();
    assert_eq!(controls, vec!["a".to_string(), "b".to_string()]);

    runtime.shutdown().await.expect("first shutdown");
    assert!(!runtime.is_running());
    assert!(matches!(
        runtime.shutdown().await,
        Err(SkipperError::NotRunning)
    ));

    // Deregistered: the router dropped its receiver.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(bus.listener_count(), 0);
}

#[tokio::test]
async fn stop_event_purges_state_through_the_runtime() {
    let commands = RecordingCommands::with_sessions(vec![session_info("a", true, false)]);
    let skipper = Arc::new(ComSkipper::new(
        SkipperConfig {
            event_workers: 1,
            ..SkipperConfig::default()
        },
        FixedLibrary::empty(),
        commands.clone(),
    ));
    let dir = tempfile::tempdir().expect("tempdir");
    let media = dir.path().join("show.mkv");
    support::write_file(&dir.path().join("show.edl"), "10.0\t20.0\t0\n");

    let bus = InProcPlaybackBus::new(16);
    let runtime = SkipperRuntime::start(Arc::clone(&skipper), &bus);

    bus.publish(PlaybackEvent::Started(comskip_core::model::PlaybackStart {
        session: SessionKey::new("a"),
        item: "item-1".into(),
        media_path: media,
        media_name: "Show".into(),
        is_live_recording: false,
    }));
    bus.publish(PlaybackEvent::Stopped(comskip_core::model::PlaybackStop {
        session: SessionKey::new("a"),
        media_name: "Show".into(),
    }));

    // Same single worker, so "b" having intervals means "a" was fully handled.
    bus.publish(PlaybackEvent::Started(comskip_core::model::PlaybackStart {
        session: SessionKey::new("b"),
        item: "item-1".into(),
        media_path: dir.path().join("show.mkv"),
        media_name: "Show".into(),
        is_live_recording: false,
    }));

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while skipper.registry().interval_count(&SessionKey::new("b")) == 0 {
        assert!(tokio::time::Instant::now() < deadline, "sentinel never handled");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert!(!skipper.registry().is_tracked(&SessionKey::new("a")));

    runtime.shutdown().await.expect("shutdown");
}
