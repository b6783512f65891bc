//! Session state
//!
//! `LoggedOut -> LoggedIn -> LoggedOut`, nothing in between. The store swaps
//! the whole state on each auth event; readers hold an `Arc` snapshot that
//! never changes under them.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::consolidate::PermissionSet;
use crate::error::Result;
use crate::model::{AuthPayload, LoggedUser};

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    /// `permissions` already consolidated from `roles`
    pub user: LoggedUser,
    pub grants: PermissionSet,
}

impl Session {
    pub fn from_payload(payload: AuthPayload) -> Self {
        let user = payload.user.consolidated();
        let grants = PermissionSet::from_roles(user.roles.as_deref());
        Self { token: payload.token, user, grants }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggedIn(Session),
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionState::LoggedIn(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::LoggedIn(s) => Some(s),
            SessionState::LoggedOut => None,
        }
    }

    pub fn user(&self) -> Option<&LoggedUser> {
        self.session().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session().map(|s| s.token.as_str())
    }

    /// Always false when logged out
    pub fn has_permission(&self, name: &str) -> bool {
        self.session().is_some_and(|s| s.grants.has_permission(name))
    }

    /// Always false when logged out
    pub fn has_role(&self, name: &str) -> bool {
        self.session().is_some_and(|s| s.grants.has_role(name))
    }
}

/// Sequence number of an auth request, unique and increasing per store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// What `complete` did with a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    LoggedIn(Arc<SessionState>),
    /// The request failed and the state was cleared
    Cleared,
    /// A newer event superseded the request; state untouched
    Stale,
}

struct Inner {
    /// Applied events: completions that changed state, and logouts
    generation: u64,
    /// Last ticket handed out by `begin`
    issued: u64,
    /// Results with a ticket at or below this are stale
    settled: u64,
    state: Arc<SessionState>,
}

/// Holder of the current session state
pub struct SessionStore {
    inner: RwLock<Inner>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                generation: 0,
                issued: 0,
                settled: 0,
                state: Arc::new(SessionState::LoggedOut),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|p| p.into_inner())
    }

    /// Snapshot of the current state
    pub fn current(&self) -> Arc<SessionState> {
        Arc::clone(&self.read().state)
    }

    pub fn generation(&self) -> u64 {
        self.read().generation
    }

    /// Start an auth request
    pub fn begin(&self) -> Ticket {
        let mut inner = self.write();
        inner.issued += 1;
        Ticket(inner.issued)
    }

    /// Apply the result of the request started with `ticket`.
    ///
    /// Success logs in; any error logs out. A result is discarded when a
    /// request started later has already been applied, or when a logout
    /// happened after the request started.
    pub fn complete(&self, ticket: Ticket, result: Result<AuthPayload>) -> Outcome {
        let mut inner = self.write();
        if ticket.0 <= inner.settled {
            tracing::debug!(ticket = ticket.0, settled = inner.settled, "discarding stale auth result");
            return Outcome::Stale;
        }
        inner.settled = ticket.0;
        inner.generation += 1;
        match result {
            Ok(payload) => {
                let session = Session::from_payload(payload);
                tracing::info!(
                    user = %session.user.username,
                    roles = session.grants.roles().len(),
                    permissions = session.grants.len(),
                    "session established"
                );
                let state = Arc::new(SessionState::LoggedIn(session));
                inner.state = Arc::clone(&state);
                Outcome::LoggedIn(state)
            }
            Err(e) => {
                tracing::warn!(error = %e, "auth failed, clearing session");
                inner.state = Arc::new(SessionState::LoggedOut);
                Outcome::Cleared
            }
        }
    }

    /// Drop the session and invalidate any request in flight
    pub fn logout(&self) -> Arc<SessionState> {
        let mut inner = self.write();
        inner.settled = inner.issued;
        inner.generation += 1;
        inner.state = Arc::new(SessionState::LoggedOut);
        Arc::clone(&inner.state)
    }
}
