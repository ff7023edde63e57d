use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::access::Capability;
use crate::error::{AuthError, LedgerError, SessionError};
use crate::ledger::Ledger;
use crate::models::auth::SessionUser;

#[derive(Debug)]
struct Session {
    user: SessionUser,
    ledger: Ledger,
}

/// Signed-in sessions keyed by bearer token. Each session owns the ledger
/// snapshot seeded at sign-in; sign-out drops both.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with a freshly seeded ledger. A user holds at most one
    /// session, so signing in again drops the previous token and its ledger.
    pub async fn open(&self, user: SessionUser) -> Uuid {
        let token = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, session| session.user.id != user.id);
        if sessions.len() < before {
            info!(user_id = %user.id, "previous session replaced");
        }

        info!(user_id = %user.id, level = ?user.level, "session opened");
        sessions.insert(
            token,
            Session {
                user,
                ledger: Ledger::seeded(),
            },
        );
        token
    }

    pub async fn close(&self, token: &Uuid) -> Result<SessionUser, AuthError> {
        let session = self
            .sessions
            .write()
            .await
            .remove(token)
            .ok_or(AuthError::UnknownSession)?;

        info!(user_id = %session.user.id, "session closed");
        Ok(session.user)
    }

    pub async fn user(&self, token: &Uuid) -> Result<SessionUser, AuthError> {
        self.sessions
            .read()
            .await
            .get(token)
            .map(|session| session.user.clone())
            .ok_or(AuthError::UnknownSession)
    }

    pub async fn snapshot(&self, token: &Uuid) -> Result<Ledger, AuthError> {
        self.sessions
            .read()
            .await
            .get(token)
            .map(|session| session.ledger.clone())
            .ok_or(AuthError::UnknownSession)
    }

    /// Run one ledger edit for the session. The capability is checked against
    /// the stored identity, and the new snapshot replaces the old one only
    /// when the edit succeeds.
    pub async fn apply<F>(
        &self,
        token: &Uuid,
        capability: Capability,
        edit: F,
    ) -> Result<Ledger, SessionError>
    where
        F: FnOnce(&Ledger) -> Result<Ledger, LedgerError>,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(token).ok_or(AuthError::UnknownSession)?;

        session.user.require(capability)?;
        let next = edit(&session.ledger)?;
        session.ledger = next.clone();

        Ok(next)
    }
}
