//! Change subscriptions.

use std::future::pending;

use tokio::task::JoinHandle;

use crate::channel::{ChangeListener, ChangeMessage};
use crate::schema::SiteConfig;
use crate::storage::{StorageEvent, StorageEvents};
use crate::store::{ConfigStore, Mode};

/// Live subscription created by [`ConfigStore::subscribe`].
///
/// Dropping it (or calling [`Subscription::unsubscribe`]) releases both the
/// channel listener and the storage-event listener.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.stop();
    }

    /// Whether the listener task is still running.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop();
    }
}

impl ConfigStore {
    /// Call `on_change` with a freshly loaded document whenever the slot of
    /// `mode` may have changed: a channel message for its key (or without a
    /// key), or a storage event from another tab for its key.
    ///
    /// Must be called inside a Tokio runtime; outside one the returned
    /// subscription is inert.
    pub fn subscribe<F>(&self, mode: Mode, mut on_change: F) -> Subscription
    where
        F: FnMut(SiteConfig) + Send + 'static,
    {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return Subscription { task: None };
        };

        let key = self.storage_key(mode).to_string();
        let mut channel = self.broadcaster.listen();
        let mut events = self.storage.storage_events();
        let store = self.clone();

        let task = runtime.spawn(async move {
            while channel.is_some() || events.is_some() {
                let changed = tokio::select! {
                    message = next_message(&mut channel) => match message {
                        Some(message) => message.concerns(&key),
                        None => {
                            channel = None;
                            false
                        }
                    },
                    event = next_event(&mut events) => match event {
                        Some(event) => event.key.as_deref().is_none_or(|changed| changed == key),
                        None => {
                            events = None;
                            false
                        }
                    },
                };

                if changed {
                    // A failed reload is skipped; the next notification retries.
                    if let Ok(config) = store.load_config(mode) {
                        on_change(config);
                    }
                }
            }
        });

        Subscription { task: Some(task) }
    }
}

async fn next_message(listener: &mut Option<ChangeListener>) -> Option<ChangeMessage> {
    match listener {
        Some(listener) => listener.next().await,
        None => pending().await,
    }
}

async fn next_event(events: &mut Option<StorageEvents>) -> Option<StorageEvent> {
    match events {
        Some(events) => events.next().await,
        None => pending().await,
    }
}
