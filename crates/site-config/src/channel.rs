//! Cross-tab change notifications.
//!
//! The store depends on a [`ChangeChannel`] through injection. Delivery is
//! best effort: [`Broadcaster`] swallows every channel failure because a tab
//! always observes its own writes synchronously.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::error::ChannelError;
use crate::storage::MemoryOrigin;

/// Default channel name shared by every tab of a site.
pub const DEFAULT_CHANNEL_NAME: &str = "site-config";

/// Kind of mutation announced on the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    ConfigUpdated,
    ConfigReset,
    ConfigPublished,
}

/// Wire message: `{"type": "config-updated", "key": "siteConfig.v2"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeMessage {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    /// Storage key that changed. Listeners treat a missing key as "any".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl ChangeMessage {
    pub fn new(kind: ChangeKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: Some(key.into()),
        }
    }

    /// Whether a listener for `key` should react.
    pub fn concerns(&self, key: &str) -> bool {
        self.key.as_deref().is_none_or(|changed| changed == key)
    }
}

/// Named publish/subscribe channel reaching every tab of the origin.
pub trait ChangeChannel: Send + Sync {
    fn post(&self, message: &ChangeMessage) -> Result<(), ChannelError>;

    fn listen(&self) -> Result<ChangeListener, ChannelError>;
}

/// A message tagged with the channel endpoint that posted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posted {
    pub from: u64,
    pub message: ChangeMessage,
}

/// Receiving end of a [`ChangeChannel`]. Messages posted through the
/// listening endpoint itself are skipped, like a browser `BroadcastChannel`.
pub struct ChangeListener {
    receiver: broadcast::Receiver<Posted>,
    endpoint: u64,
}

impl ChangeListener {
    pub fn new(receiver: broadcast::Receiver<Posted>, endpoint: u64) -> Self {
        Self { receiver, endpoint }
    }

    /// Wait for the next message from another endpoint. A lagged listener
    /// gets a keyless update so that it reloads; `None` means the channel is
    /// gone.
    pub async fn next(&mut self) -> Option<ChangeMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(posted) if posted.from == self.endpoint => continue,
                Ok(posted) => return Some(posted.message),
                Err(RecvError::Lagged(_)) => {
                    return Some(ChangeMessage {
                        kind: ChangeKind::ConfigUpdated,
                        key: None,
                    });
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

static NEXT_ENDPOINT: AtomicU64 = AtomicU64::new(1);

/// In-process channel backed by `tokio::sync::broadcast`. Each
/// [`MemoryOrigin::channel`] call opens a new endpoint; clones share it.
#[derive(Clone)]
pub struct LocalChannel {
    name: String,
    endpoint: u64,
    sender: broadcast::Sender<Posted>,
}

impl LocalChannel {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ChangeChannel for LocalChannel {
    fn post(&self, message: &ChangeMessage) -> Result<(), ChannelError> {
        // Zero receivers is not an error for a broadcast.
        let _ = self.sender.send(Posted {
            from: self.endpoint,
            message: message.clone(),
        });
        Ok(())
    }

    fn listen(&self) -> Result<ChangeListener, ChannelError> {
        Ok(ChangeListener::new(self.sender.subscribe(), self.endpoint))
    }
}

impl MemoryOrigin {
    /// Open the channel called `name`; tabs opening the same name share it.
    pub fn channel(&self, name: &str) -> LocalChannel {
        LocalChannel {
            name: name.to_string(),
            endpoint: NEXT_ENDPOINT.fetch_add(1, Ordering::Relaxed),
            sender: self.channel_sender(name),
        }
    }
}

/// Channel for environments without cross-tab messaging.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopChannel;

impl ChangeChannel for NoopChannel {
    fn post(&self, _message: &ChangeMessage) -> Result<(), ChannelError> {
        Err(ChannelError::Unsupported)
    }

    fn listen(&self) -> Result<ChangeListener, ChannelError> {
        Err(ChannelError::Unsupported)
    }
}

/// Fire-and-forget publisher used by the store.
#[derive(Clone)]
pub struct Broadcaster {
    channel: Arc<dyn ChangeChannel>,
}

impl Broadcaster {
    pub fn new(channel: Arc<dyn ChangeChannel>) -> Self {
        Self { channel }
    }

    pub fn broadcast(&self, message: ChangeMessage) {
        if let Err(err) = self.channel.post(&message) {
            tracing::debug!(?message, %err, "change broadcast dropped");
        }
    }

    /// Listener for incoming messages, or `None` when the channel is unusable.
    pub fn listen(&self) -> Option<ChangeListener> {
        match self.channel.listen() {
            Ok(listener) => Some(listener),
            Err(err) => {
                tracing::debug!(%err, "change channel unavailable");
                None
            }
        }
    }
}
