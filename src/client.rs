//! HTTP client for the auth API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;

use crate::auth::AuthBackend;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{AuthPayload, Credentials};

/// Error body the auth API sends with non-success statuses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: Option<String>,
}

/// [`AuthBackend`] over `POST /auth/login`, `GET /auth/verify`, `POST /auth/logout`
#[derive(Debug, Clone)]
pub struct HttpAuthBackend {
    http: Client,
    base_url: String,
}

impl HttpAuthBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let url = config
            .auth_url
            .as_deref()
            .ok_or_else(|| Error::Config("CASEGATE_AUTH_URL is not set".into()))?;
        Self::new(url, config.timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(req: RequestBuilder) -> Result<reqwest::Response> {
        let res = req.send().await?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::SessionExpired);
        }
        let message = res
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
        Err(Error::Upstream { status: status.as_u16(), message })
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload> {
        let res = Self::send(self.http.post(self.url("/auth/login")).json(credentials)).await?;
        Ok(res.json().await?)
    }

    async fn verify(&self, token: &str) -> Result<AuthPayload> {
        let res = Self::send(self.http.get(self.url("/auth/verify")).bearer_auth(token)).await?;
        Ok(res.json().await?)
    }

    async fn logout(&self, token: &str) -> Result<()> {
        Self::send(self.http.post(self.url("/auth/logout")).bearer_auth(token)).await?;
        Ok(())
    }
}
