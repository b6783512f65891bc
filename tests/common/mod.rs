//! Shared fixtures: role graphs and an in-memory auth API

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;
use casegate::{AuthBackend, AuthPayload, Credentials, Error, LoggedUser, Permission, Result, Role};

pub const CASES_VIEW: &str = "fraud-investigation.cases.view";
pub const CASES_UPDATE: &str = "fraud-investigation.cases.update";
pub const CASES_CLOSE: &str = "fraud-investigation.cases.close";
pub const CATALOG_VIEW: &str = "system-administration.permissions.view";

pub fn perm(id: i64, name: &str) -> Permission {
    Permission::new(id, name)
}

pub fn analyst() -> Role {
    Role::new(10, "Analyst", vec![perm(1, CASES_VIEW)])
}

pub fn supervisor() -> Role {
    Role::new(
        20,
        "Supervisor",
        vec![perm(1, CASES_VIEW), perm(2, CASES_UPDATE), perm(3, CASES_CLOSE)],
    )
}

pub fn admin() -> Role {
    Role::new(30, "Administrator", vec![perm(40, CATALOG_VIEW)])
}

pub fn user(username: &str, roles: Vec<Role>) -> LoggedUser {
    LoggedUser {
        id: 7,
        first_name: "Ana".into(),
        last_name: "Ruiz".into(),
        email: format!("{username}@example.com"),
        username: username.into(),
        dark_mode: false,
        channel_id: 1,
        roles: Some(roles),
        permissions: Vec::new(),
    }
}

/// In-memory auth API. Passwords are the username reversed.
#[derive(Default)]
pub struct MockAuth {
    users: Mutex<HashMap<String, LoggedUser>>,
    tokens: Mutex<HashMap<String, String>>,
    next: AtomicU64,
    pub fail_verify: AtomicBool,
    pub fail_logout: AtomicBool,
    pub logouts: AtomicU64,
}

impl MockAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: LoggedUser) -> Self {
        self.users.lock().unwrap().insert(user.username.clone(), user);
        self
    }

    /// Replace a user's record; later verifies see the new roles
    pub fn set_user(&self, user: LoggedUser) {
        self.users.lock().unwrap().insert(user.username.clone(), user);
    }

    pub fn password_for(username: &str) -> String {
        username.chars().rev().collect()
    }

    pub fn issue(&self, username: &str) -> String {
        let token = format!("tok-{}", self.next.fetch_add(1, Ordering::SeqCst));
        self.tokens.lock().unwrap().insert(token.clone(), username.to_string());
        token
    }

    fn payload(&self, token: String, username: &str) -> Result<AuthPayload> {
        let user = self.users.lock().unwrap().get(username).cloned().ok_or(Error::SessionExpired)?;
        Ok(AuthPayload { token, user })
    }
}

#[async_trait]
impl AuthBackend for MockAuth {
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload> {
        if credentials.password != Self::password_for(&credentials.username)
            || !self.users.lock().unwrap().contains_key(&credentials.username)
        {
            return Err(Error::Upstream { status: 400, message: "invalid credentials".into() });
        }
        let token = self.issue(&credentials.username);
        self.payload(token, &credentials.username)
    }

    async fn verify(&self, token: &str) -> Result<AuthPayload> {
        if self.fail_verify.load(Ordering::SeqCst) {
            return Err(Error::SessionExpired);
        }
        let username = self.tokens.lock().unwrap().get(token).cloned().ok_or(Error::SessionExpired)?;
        self.payload(token.to_string(), &username)
    }

    async fn logout(&self, token: &str) -> Result<()> {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        if self.fail_logout.load(Ordering::SeqCst) {
            return Err(Error::Transport("connection reset".into()));
        }
        self.tokens.lock().unwrap().remove(token);
        Ok(())
    }
}

/// Holds a backend call until the test releases it. Unarmed gates pass through.
#[derive(Default)]
pub struct Gate {
    armed: AtomicBool,
    entered: Notify,
    release: Notify,
}

impl Gate {
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Resolves once a call is parked at the gate
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        if self.armed.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }
}

/// [`MockAuth`] with login and verify parked behind gates
#[derive(Default)]
pub struct GatedAuth {
    pub inner: MockAuth,
    pub login_gate: Gate,
    pub verify_gate: Gate,
}

impl GatedAuth {
    pub fn new(inner: MockAuth) -> Self {
        Self { inner, ..Self::default() }
    }
}

#[async_trait]
impl AuthBackend for GatedAuth {
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload> {
        self.login_gate.pass().await;
        self.inner.login(credentials).await
    }

    async fn verify(&self, token: &str) -> Result<AuthPayload> {
        self.verify_gate.pass().await;
        self.inner.verify(token).await
    }

    async fn logout(&self, token: &str) -> Result<()> {
        self.inner.logout(token).await
    }
}
