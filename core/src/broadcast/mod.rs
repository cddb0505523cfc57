//! Broadcast module
//!
//! Fan-out of server events to every connected listener, plus the delayed
//! canned reply that follows each announced message.

pub mod channel;
pub mod event;
pub mod registry;

pub use channel::BroadcastChannel;
pub use event::ServerEvent;
pub use registry::{Listener, ListenerId, ListenerRegistry};
