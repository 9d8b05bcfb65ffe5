//! In-memory session store with expiry

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::token::SessionTokenGenerator;
use crate::domain::session::{SessionStore, SessionToken, UserSession};
use crate::domain::user::UserId;
use crate::domain::DomainError;

#[derive(Debug, Clone)]
struct SessionEntry {
    session: UserSession,
    expires_at: DateTime<Utc>,
}

impl SessionEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Session store keyed by token digest
///
/// Expired entries are dropped when they are next read and swept whenever a
/// new session is created.
#[derive(Debug)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    generator: SessionTokenGenerator,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            generator: SessionTokenGenerator::new(),
            ttl,
        }
    }

    /// Build a store from a TTL in minutes
    pub fn with_ttl_minutes(minutes: i64) -> Self {
        Self::new(Duration::minutes(minutes))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: UserSession) -> Result<SessionToken, DomainError> {
        let token = self.generator.generate();
        let now = Utc::now();
        let entry = SessionEntry {
            session,
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(now));
        if sessions.len() < before {
            debug!(swept = before - sessions.len(), "Swept expired sessions");
        }
        sessions.insert(SessionTokenGenerator::digest(&token), entry);

        Ok(token)
    }

    async fn get(&self, token: &SessionToken) -> Result<Option<UserSession>, DomainError> {
        let key = SessionTokenGenerator::digest(token);
        let now = Utc::now();

        {
            let sessions = self.sessions.read().await;
            match sessions.get(&key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.session.clone())),
                Some(_) => {}
            }
        }

        let mut sessions = self.sessions.write().await;
        if sessions.get(&key).is_some_and(|entry| entry.is_expired(now)) {
            sessions.remove(&key);
            debug!("Dropped expired session");
        }

        Ok(None)
    }

    async fn replace(&self, token: &SessionToken, session: UserSession) -> Result<(), DomainError> {
        let key = SessionTokenGenerator::digest(token);
        let mut sessions = self.sessions.write().await;

        match sessions.get_mut(&key) {
            Some(entry) if !entry.is_expired(Utc::now()) => {
                entry.session = session;
                Ok(())
            }
            _ => Err(DomainError::not_found("Session not found")),
        }
    }

    async fn remove(&self, token: &SessionToken) -> Result<bool, DomainError> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions
            .remove(&SessionTokenGenerator::digest(token))
            .is_some())
    }

    async fn remove_user(&self, user_id: UserId) -> Result<usize, DomainError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.session.owns(user_id));
        Ok(before - sessions.len())
    }
}
