//! Chat Flow Integration Tests
//!
//! Drives the store and the broadcast channel together the way the server
//! does for `POST /api/message`:
//! - Persist, announce, then reply after the configured delay
//! - Late listeners see no history
//! - Concurrent submissions keep their own replies

use anyhow::Result;
use echochat_core::{
    BroadcastChannel, ListenerRegistry, MessageStore, Reply, ServerEvent, Store,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Helper to create a store and channel with a one second reply delay
fn create_chat() -> Result<(Store, BroadcastChannel, TempDir)> {
    let temp_dir = tempfile::tempdir()?;
    let store = Store::open(temp_dir.path())?;
    let channel = BroadcastChannel::new(Arc::new(ListenerRegistry::new()), Duration::from_secs(1));
    Ok((store, channel, temp_dir))
}

#[tokio::test(start_paused = true)]
async fn test_message_then_reply_scenario() -> Result<()> {
    println!("\n=== MESSAGE / REPLY SCENARIO ===\n");

    let (store, channel, _temp) = create_chat()?;
    let mut alice = channel.registry().register().await;
    let mut bob = channel.registry().register().await;

    let message = store.save("hi", "u1")?;
    assert_eq!(message.text(), "hi");
    assert_eq!(message.user(), "u1");
    assert!(!message.id().to_string().is_empty());

    channel.submit(&message).await;

    for listener in [&mut alice, &mut bob] {
        assert_eq!(listener.try_recv(), Some(ServerEvent::UserMessage(message.clone())));
        assert_eq!(listener.try_recv(), None);
    }

    tokio::time::sleep(Duration::from_millis(999)).await;
    assert_eq!(alice.try_recv(), None);

    tokio::time::sleep(Duration::from_millis(2)).await;
    let expected = ServerEvent::ResponseMessage(Reply {
        text: "I am Reply Message with hi".to_string(),
    });
    assert_eq!(alice.try_recv(), Some(expected.clone()));
    assert_eq!(bob.try_recv(), Some(expected));

    println!("✓ Both listeners saw the message before its reply");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_late_listener_misses_announcement() -> Result<()> {
    let (store, channel, _temp) = create_chat()?;
    let message = store.save("early bird", "u1")?;

    channel.submit(&message).await;
    let mut late = channel.registry().register().await;

    assert_eq!(late.try_recv(), None);

    // Connected before the reply fired, so the reply still arrives.
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(
        late.try_recv(),
        Some(ServerEvent::ResponseMessage(Reply::for_text("early bird")))
    );
    assert_eq!(late.try_recv(), None);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_two_messages_keep_their_own_replies() -> Result<()> {
    let (store, channel, _temp) = create_chat()?;
    let mut listener = channel.registry().register().await;

    let first = store.save("first", "u1")?;
    channel.submit(&first).await;

    tokio::time::sleep(Duration::from_millis(100)).await;
    let second = store.save("second", "u2")?;
    channel.submit(&second).await;
    assert_ne!(first.id(), second.id());

    tokio::time::sleep(Duration::from_secs(2)).await;

    let mut events = Vec::new();
    while let Some(event) = listener.try_recv() {
        events.push(event);
    }

    let position = |event: &ServerEvent| events.iter().position(|e| e == event).unwrap();
    let first_reply = ServerEvent::ResponseMessage(Reply::for_text("first"));
    let second_reply = ServerEvent::ResponseMessage(Reply::for_text("second"));

    assert_eq!(events.len(), 4);
    assert!(position(&ServerEvent::UserMessage(first.clone())) < position(&first_reply));
    assert!(position(&ServerEvent::UserMessage(second.clone())) < position(&second_reply));
    assert_eq!(channel.pending_replies().await, 0);
    Ok(())
}

#[tokio::test]
async fn test_failed_save_announces_nothing() -> Result<()> {
    let (store, channel, _temp) = create_chat()?;
    let mut listener = channel.registry().register().await;

    assert!(store.save("   ", "u1").is_err());
    assert_eq!(listener.try_recv(), None);
    assert_eq!(store.count()?, 0);
    Ok(())
}
