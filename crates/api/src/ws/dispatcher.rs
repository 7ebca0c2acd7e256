//! Per-user notification dispatcher.
//!
//! Holds at most one live channel per user. A reconnect replaces the
//! previous channel, so the newest socket wins. Delivery is best-effort:
//! sending to a user with no live session (or a closed channel) is a
//! silent no-op, since the durable notification row already exists.

use std::collections::HashMap;

use axum::extract::ws::Message;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

/// Channel sender half for pushing messages to a user's WebSocket.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Manages live WebSocket sessions, keyed by user.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct Dispatcher {
    sessions: RwLock<HashMap<Uuid, WsSender>>,
}

impl Dispatcher {
    /// Create a new, empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a session for a user, replacing any existing one.
    ///
    /// Returns both halves: the receiver so the caller can forward messages
    /// to the WebSocket sink, and the sender so the caller can identify its
    /// own session on disconnect. The replaced channel (if any) is dropped,
    /// which ends the old connection's sender task.
    pub async fn register(&self, user_id: Uuid) -> (WsSender, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.sessions.write().await.insert(user_id, tx.clone());
        (tx, rx)
    }

    /// Remove a user's session if it is still the given sender.
    ///
    /// A stale disconnect must not evict the session a reconnect has
    /// already installed, so removal compares channel identity.
    pub async fn unregister(&self, user_id: Uuid, sender: &WsSender) {
        let mut sessions = self.sessions.write().await;
        if let Some(current) = sessions.get(&user_id) {
            if current.same_channel(sender) {
                sessions.remove(&user_id);
            }
        }
    }

    /// Send a text message to the user's live session, if any.
    ///
    /// Absent or closed sessions are silently skipped.
    pub async fn send(&self, user_id: Uuid, text: String) {
        let sessions = self.sessions.read().await;
        if let Some(sender) = sessions.get(&user_id) {
            let _ = sender.send(Message::Text(text.into()));
        }
    }

    /// Return the current number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_reaches_registered_user() {
        let dispatcher = Dispatcher::new();
        let user_id = Uuid::new_v4();

        let (_tx, mut rx) = dispatcher.register(user_id).await;
        dispatcher.send(user_id, "hello".to_string()).await;

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg, Message::Text("hello".into()));
    }

    #[tokio::test]
    async fn test_send_without_session_is_noop() {
        let dispatcher = Dispatcher::new();
        dispatcher.send(Uuid::new_v4(), "lost".to_string()).await;
        assert_eq!(dispatcher.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_reconnect_replaces_previous_session() {
        let dispatcher = Dispatcher::new();
        let user_id = Uuid::new_v4();

        let (old_tx, mut old_rx) = dispatcher.register(user_id).await;
        let (_new_tx, mut new_rx) = dispatcher.register(user_id).await;

        dispatcher.send(user_id, "fresh".to_string()).await;

        // The registry's copy of the old sender was dropped on replacement;
        // once our handle goes too, the old receiver must report closure.
        drop(old_tx);
        assert!(old_rx.recv().await.is_none());
        assert_eq!(new_rx.recv().await, Some(Message::Text("fresh".into())));
        assert_eq!(dispatcher.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_stale_unregister_keeps_new_session() {
        let dispatcher = Dispatcher::new();
        let user_id = Uuid::new_v4();

        let (old_sender, _old_rx) = dispatcher.register(user_id).await;
        let (_new_tx, _new_rx) = dispatcher.register(user_id).await;
        dispatcher.unregister(user_id, &old_sender).await;

        assert_eq!(dispatcher.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_unregister_removes_own_session() {
        let dispatcher = Dispatcher::new();
        let user_id = Uuid::new_v4();

        let (sender, _rx) = dispatcher.register(user_id).await;
        dispatcher.unregister(user_id, &sender).await;
        assert_eq!(dispatcher.session_count().await, 0);
    }
}
