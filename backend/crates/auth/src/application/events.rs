//! Session event bus
//!
//! In-process broadcast of session lifecycle changes. Open `/events`
//! streams subscribe so a sign-out in one tab denies access in the others.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::domain::value_object::user_id::{SessionId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    SignedIn {
        session_id: SessionId,
        user_id: UserId,
    },
    SignedOut {
        session_id: SessionId,
        user_id: UserId,
    },
    /// All sessions of a user removed, except `kept`
    SignedOutEverywhere {
        user_id: UserId,
        kept: Option<SessionId>,
    },
}

impl SessionEvent {
    /// Whether this event ends the given session
    pub fn ends(&self, session_id: &SessionId, user_id: &UserId) -> bool {
        match self {
            SessionEvent::SignedIn { .. } => false,
            SessionEvent::SignedOut { session_id: ended, .. } => ended == session_id,
            SessionEvent::SignedOutEverywhere { user_id: owner, kept } => {
                owner == user_id && kept.as_ref() != Some(session_id)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionEvents {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: SessionEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("No session event subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ends() {
        let user = UserId::new();
        let current = SessionId::new();
        let other = SessionId::new();

        let out = SessionEvent::SignedOut {
            session_id: current,
            user_id: user,
        };
        assert!(out.ends(&current, &user));
        assert!(!out.ends(&other, &user));

        let everywhere = SessionEvent::SignedOutEverywhere {
            user_id: user,
            kept: Some(other),
        };
        assert!(everywhere.ends(&current, &user));
        assert!(!everywhere.ends(&other, &user));
        assert!(!everywhere.ends(&current, &UserId::new()));
    }

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let events = SessionEvents::default();
        let mut rx = events.subscribe();
        let event = SessionEvent::SignedIn {
            session_id: SessionId::new(),
            user_id: UserId::new(),
        };

        events.publish(event.clone());
        assert_eq!(rx.recv().await.unwrap(), event);
    }
}
