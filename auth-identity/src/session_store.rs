//! Device session
//!
//! At most one session is active on a device. The session is written through
//! to the `session` slot on every change, and the in-memory copy is only
//! replaced once that write succeeded.

use database_layer::{keys, Slot, SlotStore, StorageError};
use logger_redacted::redact_phone;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{AuthError, Result};
use crate::models::{ProfileUpdate, Session};
use crate::provider::IdentityProvider;
use crate::validation::{validate_otp, validate_phone};

pub struct SessionStore {
    slot: Slot,
    provider: Arc<dyn IdentityProvider>,
    session: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Restores the persisted session, if any
    pub async fn open(store: Arc<dyn SlotStore>, provider: Arc<dyn IdentityProvider>) -> Result<Self> {
        let slot = Slot::new(store, keys::SESSION);

        let session = match slot.load().await? {
            Some(bytes) => Some(
                serde_json::from_slice::<Session>(&bytes)
                    .map_err(|e| StorageError::corrupt(keys::SESSION, e))?,
            ),
            None => None,
        };

        if let Some(session) = &session {
            tracing::debug!(user_id = %session.user_id, role = session.role.as_str(), "Restored session");
        }

        Ok(Self {
            slot,
            provider,
            session: RwLock::new(session),
        })
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Asks the provider to text a one-time code
    pub async fn request_otp(&self, phone: &str) -> Result<()> {
        validate_phone(phone)?;
        self.provider.request_otp(phone).await?;
        tracing::info!(phone = %redact_phone(phone), "OTP requested");
        Ok(())
    }

    /// Verifies the code with the provider and replaces any existing session.
    ///
    /// On any failure the previous session (or its absence) is kept.
    pub async fn login(&self, phone: &str, otp: &str) -> Result<Session> {
        validate_phone(phone)?;
        validate_otp(otp)?;

        let session = match self.provider.verify_otp(phone, otp).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(phone = %redact_phone(phone), error = %e, "Login failed");
                return Err(e);
            }
        };

        let mut current = self.session.write().await;
        self.persist(&session).await?;
        *current = Some(session.clone());

        tracing::info!(
            user_id = %session.user_id,
            role = session.role.as_str(),
            phone = %redact_phone(phone),
            "Logged in"
        );

        Ok(session)
    }

    /// Ends the session. Logging out without a session is a no-op.
    ///
    /// The in-memory session is dropped only after the slot was cleared; a
    /// failed or cancelled call leaves the user signed in.
    pub async fn logout(&self) -> Result<()> {
        let mut current = self.session.write().await;
        let Some(user_id) = current.as_ref().map(|session| session.user_id.clone()) else {
            return Ok(());
        };

        self.slot.clear().await?;
        *current = None;

        tracing::info!(user_id = %user_id, "Logged out");

        Ok(())
    }

    /// Shallow-merges `update` into the active session and persists it
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<Session> {
        let mut current = self.session.write().await;
        let Some(existing) = current.as_ref() else {
            return Err(AuthError::NotAuthenticated);
        };

        let mut updated = existing.clone();
        updated.apply(update);

        self.persist(&updated).await?;
        *current = Some(updated.clone());

        tracing::debug!(user_id = %updated.user_id, "Profile updated");

        Ok(updated)
    }

    async fn persist(&self, session: &Session) -> Result<()> {
        let bytes = serde_json::to_vec(session)?;
        self.slot.save(&bytes).await?;
        Ok(())
    }
}
