use comskip_model::PlaybackEvent;
use tokio::sync::broadcast;

/// Anything the runtime can subscribe to for playback events.
///
/// Subscribing registers the runtime as a listener; dropping the receiver
/// on shutdown deregisters it.
pub trait PlaybackEventSource: Send + Sync {
    fn subscribe_playback(&self) -> broadcast::Receiver<PlaybackEvent>;
}

/// Lightweight in-process bus for hosts that emit playback events from
/// inside the same process.
#[derive(Debug, Clone)]
pub struct InProcPlaybackBus {
    sender: broadcast::Sender<PlaybackEvent>,
}

impl InProcPlaybackBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns the number of listeners that received the event.
    pub fn publish(&self, event: PlaybackEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl PlaybackEventSource for InProcPlaybackBus {
    fn subscribe_playback(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.sender.subscribe()
    }
}
