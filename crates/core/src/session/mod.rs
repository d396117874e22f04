//! Session gate.
//!
//! Checkout is allowed only when a user record has been persisted under
//! [`USER_KEY`]. This is an advisory check: the record is not a credential and
//! nothing here validates it against the auth service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, StorageError, USER_KEY};

/// The signed-in user's identity snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Not signed in")]
    Unauthenticated,

    #[error("Failed to serialize user record: {0}")]
    Serialization(String),

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Reads and writes the persisted user record.
#[derive(Clone)]
pub struct SessionGate {
    store: Arc<dyn KeyValueStore>,
    login_path: String,
}

impl SessionGate {
    pub fn new(store: Arc<dyn KeyValueStore>, login_path: impl Into<String>) -> Self {
        Self {
            store,
            login_path: login_path.into(),
        }
    }

    /// Return the stored user, or `Unauthenticated` if there is none.
    ///
    /// Malformed records and storage failures are logged and count as signed out.
    pub fn has_session(&self) -> Result<UserRecord, SessionError> {
        let raw = match self.store.load(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Err(SessionError::Unauthenticated),
            Err(e) => {
                warn!("Failed to read session record: {}", e);
                return Err(SessionError::Unauthenticated);
            }
        };

        serde_json::from_str(&raw).map_err(|e| {
            warn!("Ignoring malformed session record: {}", e);
            SessionError::Unauthenticated
        })
    }

    /// Persist `user` as the signed-in user.
    pub fn sign_in(&self, user: &UserRecord) -> Result<(), SessionError> {
        let raw =
            serde_json::to_string(user).map_err(|e| SessionError::Serialization(e.to_string()))?;
        self.store.save(USER_KEY, &raw)?;
        debug!("Session started for user {}", user.id);
        Ok(())
    }

    /// Forget the signed-in user. Signing out twice is not an error.
    pub fn sign_out(&self) -> Result<(), SessionError> {
        self.store.remove(USER_KEY)?;
        debug!("Session cleared");
        Ok(())
    }

    /// Login URL that returns to `return_to` after signing in.
    pub fn login_redirect(&self, return_to: &str) -> String {
        format!(
            "{}?redirect={}",
            self.login_path,
            urlencoding::encode(return_to)
        )
    }
}
