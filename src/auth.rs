//! Authentication against the external auth API
//!
//! The API is opaque: it issues tokens and returns the user with nested roles.
//! This module only drives the session store from its answers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::model::{AuthPayload, Credentials};
use crate::session::{Outcome, SessionState, SessionStore, Ticket};

/// The auth API as seen from this crate
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload>;

    /// Re-validate `token` and return the current user record
    async fn verify(&self, token: &str) -> Result<AuthPayload>;

    async fn logout(&self, token: &str) -> Result<()>;
}

#[async_trait]
impl<B: AuthBackend + ?Sized> AuthBackend for Arc<B> {
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload> {
        (**self).login(credentials).await
    }

    async fn verify(&self, token: &str) -> Result<AuthPayload> {
        (**self).verify(token).await
    }

    async fn logout(&self, token: &str) -> Result<()> {
        (**self).logout(token).await
    }
}

/// Session lifecycle over an [`AuthBackend`]
pub struct Authenticator<B> {
    backend: B,
    store: SessionStore,
}

impl<B: AuthBackend> Authenticator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend, store: SessionStore::new() }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Snapshot of the current session state
    pub fn state(&self) -> Arc<SessionState> {
        self.store.current()
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Arc<SessionState>> {
        tracing::debug!(user = %credentials.username, "login");
        let ticket = self.store.begin();
        let result = self.backend.login(credentials).await;
        self.settle(ticket, result)
    }

    /// Re-validate the current session. Any failure logs out.
    pub async fn verify(&self) -> Result<Arc<SessionState>> {
        let ticket = self.store.begin();
        let state = self.store.current();
        let Some(token) = state.token() else {
            return Err(Error::NotAuthenticated);
        };
        let result = self.backend.verify(token).await;
        self.settle(ticket, result)
    }

    /// Clear local state, then tell the backend. Backend errors are logged only.
    pub async fn logout(&self) -> Arc<SessionState> {
        let previous = self.store.current();
        let state = self.store.logout();
        if let Some(token) = previous.token() {
            if let Err(e) = self.backend.logout(token).await {
                tracing::warn!(error = %e, "backend logout failed");
            }
        }
        tracing::info!("logged out");
        state
    }

    fn settle(&self, ticket: Ticket, result: Result<AuthPayload>) -> Result<Arc<SessionState>> {
        let err = result.as_ref().err().cloned();
        match self.store.complete(ticket, result) {
            Outcome::LoggedIn(state) => Ok(state),
            Outcome::Cleared => Err(err.unwrap_or(Error::NotAuthenticated)),
            // A newer event already decided the state; only report success
            // if that state is a session
            Outcome::Stale => match err {
                Some(e) => Err(e),
                None => {
                    let current = self.store.current();
                    if current.is_logged_in() {
                        Ok(current)
                    } else {
                        Err(Error::NotAuthenticated)
                    }
                }
            },
        }
    }
}
