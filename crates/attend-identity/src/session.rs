use crate::{Permission, Subject};
use attend_core::{now_epoch_millis, EpochMillis};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: SessionToken,
    pub subject: Subject,
    pub issued_at_ms: EpochMillis,
    pub expires_at_ms: EpochMillis,
}

impl Session {
    pub fn issue(subject: Subject, ttl_ms: u64) -> Self {
        let issued_at_ms = now_epoch_millis();
        Self {
            token: SessionToken::generate(),
            subject,
            issued_at_ms,
            expires_at_ms: issued_at_ms.saturating_add(ttl_ms),
        }
    }

    pub fn is_expired(&self, now_ms: EpochMillis) -> bool {
        now_ms >= self.expires_at_ms
    }

    pub fn allows(&self, permission: Permission) -> bool {
        self.subject.allows(permission)
    }
}

/// Process-wide session state, injected wherever a request needs to know who
/// is calling.
pub trait SessionStore: Send + Sync {
    fn get(&self, token: &SessionToken) -> Option<Session>;
    fn set(&self, session: Session);
    fn clear(&self, token: &SessionToken);
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionToken, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, token: &SessionToken) -> Option<Session> {
        let now = now_epoch_millis();
        let expired = {
            let sessions = self
                .sessions
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            match sessions.get(token) {
                Some(session) if !session.is_expired(now) => return Some(session.clone()),
                Some(session) => session.subject.clone(),
                None => return None,
            }
        };

        tracing::debug!(
            tenant_id = %expired.tenant_id,
            user_id = %expired.user_id,
            "evicting expired session"
        );
        self.clear(token);
        None
    }

    fn set(&self, session: Session) {
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(session.token.clone(), session);
    }

    fn clear(&self, token: &SessionToken) {
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(token);
    }
}
