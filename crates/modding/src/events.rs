//! Error channel for reload diagnostics.

use tokio::sync::broadcast;

use crate::error::LoadError;

/// Broadcasts every [`LoadError`] raised during a reload.
///
/// Subscribers only see errors published after they subscribed. Publishing
/// never blocks; a subscriber that falls more than the channel capacity
/// behind observes `RecvError::Lagged` and skips ahead.
#[derive(Clone)]
pub struct ErrorChannel {
    sender: broadcast::Sender<LoadError>,
}

impl ErrorChannel {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, error: LoadError) {
        if self.sender.send(error).is_err() {
            // No subscribers - this is normal, not an error
            tracing::trace!("No subscribers for load errors");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LoadError> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ErrorChannel {
    fn default() -> Self {
        Self::new()
    }
}
