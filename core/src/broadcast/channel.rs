//! Announce and delayed-reply channel
//!
//! Every submitted message is announced to all listeners right away and
//! answered with a canned reply once the configured delay has elapsed.
//! Pending replies are tracked by message id so they can be cancelled and
//! are released as soon as they fire.

use super::event::ServerEvent;
use super::registry::ListenerRegistry;
use crate::types::{Message, MessageId, Reply};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// A scheduled reply. `seq` tells a replaced task apart from its successor.
struct PendingReply {
    seq: u64,
    handle: JoinHandle<()>,
}

type PendingReplies = Arc<Mutex<HashMap<MessageId, PendingReply>>>;

/// Broadcast/reply channel over an injected listener registry
#[derive(Clone)]
pub struct BroadcastChannel {
    registry: Arc<ListenerRegistry>,
    pending: PendingReplies,
    next_seq: Arc<AtomicU64>,
    reply_delay: Duration,
}

impl BroadcastChannel {
    pub fn new(registry: Arc<ListenerRegistry>, reply_delay: Duration) -> Self {
        Self {
            registry,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_seq: Arc::new(AtomicU64::new(0)),
            reply_delay,
        }
    }

    pub fn registry(&self) -> &Arc<ListenerRegistry> {
        &self.registry
    }

    pub fn reply_delay(&self) -> Duration {
        self.reply_delay
    }

    /// Publish an arbitrary event to every listener
    pub async fn emit(&self, event: ServerEvent) -> usize {
        self.registry.publish(&event).await
    }

    /// Publish `message` as a `userMessage` event
    pub async fn announce(&self, message: &Message) -> usize {
        let delivered = self
            .registry
            .publish(&ServerEvent::UserMessage(message.clone()))
            .await;
        info!("Announced message {} to {} listener(s)", message.id(), delivered);
        delivered
    }

    /// Publish the canned reply to `message` once `delay` has elapsed.
    ///
    /// Scheduling again for the same message id replaces the earlier reply.
    pub async fn schedule_reply(&self, message: &Message, delay: Duration) {
        let id = message.id();
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let reply = Reply::to(message);
        let registry = self.registry.clone();
        let pending = self.pending.clone();

        // Held across spawn + insert so the task cannot look for its entry
        // before it exists.
        let mut table = self.pending.lock().await;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // Leave the table before publishing: once the reply goes out it
            // can no longer be cancelled.
            {
                let mut table = pending.lock().await;
                match table.get(&id) {
                    Some(entry) if entry.seq == seq => {
                        table.remove(&id);
                    }
                    _ => return,
                }
            }

            let delivered = registry.publish(&ServerEvent::ResponseMessage(reply)).await;
            info!("Sent reply for message {} to {} listener(s)", id, delivered);
        });

        if let Some(previous) = table.insert(id, PendingReply { seq, handle }) {
            debug!("Replacing pending reply for message {}", id);
            previous.handle.abort();
        }
    }

    /// Cancel a pending reply.
    ///
    /// Returns true only if the reply had not been published yet.
    pub async fn cancel_reply(&self, id: &MessageId) -> bool {
        match self.pending.lock().await.remove(id) {
            Some(entry) => {
                entry.handle.abort();
                debug!("Cancelled reply for message {}", id);
                true
            }
            None => false,
        }
    }

    /// Number of replies scheduled but not yet sent
    pub async fn pending_replies(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Announce `message` and schedule its reply with the configured delay
    pub async fn submit(&self, message: &Message) {
        self.announce(message).await;
        self.schedule_reply(message, self.reply_delay).await;
    }
}
