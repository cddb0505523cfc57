//! Registry of connected listeners
//!
//! The transport registers one listener per live connection and hands the
//! registry to whoever needs to broadcast. There is no backlog: a listener
//! only sees events published after it registered.

use super::event::ServerEvent;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

/// Identifier of a registered listener
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Receiving side of one registered connection
#[derive(Debug)]
pub struct Listener {
    id: ListenerId,
    events: mpsc::UnboundedReceiver<ServerEvent>,
}

impl Listener {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Wait for the next event. Returns `None` once unregistered.
    pub async fn recv(&mut self) -> Option<ServerEvent> {
        self.events.recv().await
    }

    /// Next event if one is already queued
    pub fn try_recv(&mut self) -> Option<ServerEvent> {
        self.events.try_recv().ok()
    }
}

/// Set of currently connected listeners
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    listeners: RwLock<HashMap<ListenerId, mpsc::UnboundedSender<ServerEvent>>>,
    next_id: AtomicU64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection
    pub async fn register(&self) -> Listener {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();

        self.listeners.write().await.insert(id, tx);
        debug!("Registered {}", id);

        Listener { id, events: rx }
    }

    /// Remove a connection. Returns false if it was not registered.
    pub async fn unregister(&self, id: ListenerId) -> bool {
        let removed = self.listeners.write().await.remove(&id).is_some();
        if removed {
            debug!("Unregistered {}", id);
        }
        removed
    }

    /// Deliver `event` to every registered listener exactly once.
    ///
    /// Returns how many listeners received it. Listeners whose receiving
    /// side is gone are dropped from the registry.
    pub async fn publish(&self, event: &ServerEvent) -> usize {
        let mut closed = Vec::new();
        let mut delivered = 0;

        {
            let listeners = self.listeners.read().await;
            for (id, tx) in listeners.iter() {
                if tx.send(event.clone()).is_ok() {
                    delivered += 1;
                } else {
                    closed.push(*id);
                }
            }
        }

        if !closed.is_empty() {
            let mut listeners = self.listeners.write().await;
            for id in closed {
                warn!("Pruning closed {}", id);
                listeners.remove(&id);
            }
        }

        delivered
    }

    pub async fn len(&self) -> usize {
        self.listeners.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.listeners.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Reply;

    fn reply(text: &str) -> ServerEvent {
        ServerEvent::ResponseMessage(Reply::for_text(text))
    }

    #[tokio::test]
    async fn test_publish_reaches_every_listener_once() {
        let registry = ListenerRegistry::new();
        let mut a = registry.register().await;
        let mut b = registry.register().await;

        assert_eq!(registry.publish(&reply("x")).await, 2);

        assert_eq!(a.try_recv(), Some(reply("x")));
        assert_eq!(b.try_recv(), Some(reply("x")));
        assert_eq!(a.try_recv(), None);
        assert_eq!(b.try_recv(), None);
    }

    #[tokio::test]
    async fn test_late_listener_gets_no_backlog() {
        let registry = ListenerRegistry::new();
        registry.publish(&reply("early")).await;

        let mut late = registry.register().await;
        assert_eq!(late.try_recv(), None);

        registry.publish(&reply("later")).await;
        assert_eq!(late.try_recv(), Some(reply("later")));
    }

    #[tokio::test]
    async fn test_unregister_stops_delivery() {
        let registry = ListenerRegistry::new();
        let mut listener = registry.register().await;

        assert!(registry.unregister(listener.id()).await);
        assert!(!registry.unregister(listener.id()).await);
        assert_eq!(registry.publish(&reply("x")).await, 0);
        assert_eq!(listener.recv().await, None);
    }

    #[tokio::test]
    async fn test_dropped_listener_is_pruned() {
        let registry = ListenerRegistry::new();
        let dropped = registry.register().await;
        let _kept = registry.register().await;
        drop(dropped);

        assert_eq!(registry.publish(&reply("x")).await, 1);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_listener_ids_are_distinct() {
        let registry = ListenerRegistry::new();
        let a = registry.register().await;
        let b = registry.register().await;

        assert_ne!(a.id(), b.id());
        assert!(!registry.is_empty().await);
    }
}
