//! Long-lived event loop with an explicit start / shutdown lifecycle.

mod event_bus;

pub use event_bus::{InProcPlaybackBus, PlaybackEventSource};

use std::{
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
    time::Duration,
};

use comskip_model::{PlaybackEvent, SessionKey};
use tokio::{
    sync::{Mutex, broadcast, mpsc},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use crate::error::{Result, SkipperError};
use crate::service::ComSkipper;

const WORKER_QUEUE_CAPACITY: usize = 256;
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Drives a [`ComSkipper`] from a playback event source.
///
/// Events are sharded across workers by session key, so one session's
/// events are handled in order while different sessions run in parallel.
/// Sessions sharing a shard share its worker: a slow seek or notification
/// for one of them delays events for the others in that shard. Raise
/// `event_workers` to spread sessions thinner.
pub struct SkipperRuntime {
    service: Arc<ComSkipper>,
    shutdown_token: CancellationToken,
    worker_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl fmt::Debug for SkipperRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let worker_handle_count = self
            .worker_handles
            .try_lock()
            .map(|handles| handles.len())
            .unwrap_or_default();

        f.debug_struct("SkipperRuntime")
            .field("service", &self.service)
            .field("worker_handle_count", &worker_handle_count)
            .field("shutdown_cancelled", &self.shutdown_token.is_cancelled())
            .finish()
    }
}

impl SkipperRuntime {
    /// Subscribes to `source` and spawns the router and worker tasks.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        service: Arc<ComSkipper>,
        source: &dyn PlaybackEventSource,
    ) -> Self {
        let shutdown_token = CancellationToken::new();
        let worker_count = service.config().event_workers.max(1);

        let mut handles = Vec::with_capacity(worker_count + 1);
        let mut senders = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let (tx, rx) = mpsc::channel(WORKER_QUEUE_CAPACITY);
            senders.push(tx);
            handles.push(spawn_worker(
                worker_id,
                Arc::clone(&service),
                rx,
                shutdown_token.clone(),
            ));
        }

        handles.push(spawn_router(
            source.subscribe_playback(),
            senders,
            shutdown_token.clone(),
        ));

        tracing::info!(target: "comskip::runtime", workers = worker_count, "skipper runtime started");

        Self {
            service,
            shutdown_token,
            worker_handles: Mutex::new(handles),
        }
    }

    pub fn service(&self) -> &Arc<ComSkipper> {
        &self.service
    }

    pub fn is_running(&self) -> bool {
        !self.shutdown_token.is_cancelled()
    }

    /// Stops listening and waits for in-flight events to finish.
    pub async fn shutdown(&self) -> Result<()> {
        if self.shutdown_token.is_cancelled() {
            return Err(SkipperError::NotRunning);
        }
        tracing::info!(target: "comskip::runtime", "shutting down skipper runtime");

        self.shutdown_token.cancel();

        let handles = {
            let mut guard = self.worker_handles.lock().await;
            std::mem::take(&mut *guard)
        };

        for handle in handles {
            match tokio::time::timeout(SHUTDOWN_TIMEOUT, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(target: "comskip::runtime", "worker task failed: {:?}", e),
                Err(_) => tracing::warn!(target: "comskip::runtime", "worker task timed out during shutdown"),
            }
        }

        tracing::info!(target: "comskip::runtime", "skipper runtime shutdown complete");
        Ok(())
    }
}

impl Drop for SkipperRuntime {
    fn drop(&mut self) {
        self.shutdown_token.cancel();
    }
}

fn shard_for(session: &SessionKey, shards: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    session.hash(&mut hasher);
    (hasher.finish() % shards as u64) as usize
}

fn spawn_router(
    mut events: broadcast::Receiver<PlaybackEvent>,
    workers: Vec<mpsc::Sender<PlaybackEvent>>,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                evt = events.recv() => match evt {
                    Ok(event) => {
                        let shard = shard_for(event.session(), workers.len());
                        if workers[shard].send(event).await.is_err() {
                            tracing::warn!(target: "comskip::runtime", shard, "worker queue closed");
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(target: "comskip::runtime", skipped, "playback event router lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!(target: "comskip::runtime", "playback event source closed");
                        break;
                    }
                },
            }
        }
        tracing::debug!(target: "comskip::runtime", "playback event router stopped");
    })
}

fn spawn_worker(
    worker_id: usize,
    service: Arc<ComSkipper>,
    mut events: mpsc::Receiver<PlaybackEvent>,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                evt = events.recv() => match evt {
                    Some(event) => service.handle_event(event).await,
                    None => break,
                },
            }
        }
        tracing::debug!(target: "comskip::runtime", worker_id, "skipper worker stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shards_are_stable_and_in_range() {
        let key = SessionKey::new("living-room-tv");
        let shard = shard_for(&key, 4);
        assert!(shard < 4);
        assert_eq!(shard, shard_for(&key, 4));
        assert_eq!(shard_for(&key, 1), 0);
    }

    #[test]
    fn a_single_worker_serves_every_session() {
        for key in ["kitchen", "bedroom", "living-room-tv", "tablet"] {
            assert_eq!(shard_for(&SessionKey::new(key), 1), 0);
        }
    }
}
