//! Backend credential exchange over HTTP.
//!
//! The sole network boundary of the login core. A credential goes out,
//! a [`SessionGrant`] comes back; there is no retry and no timeout
//! beyond the transport default.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;
use vestibule_identity::{Credential, Provider};
use vestibule_session::SessionGrant;

use crate::error::ExchangeFailure;

/// Path of the password login endpoint.
pub const PASSWORD_LOGIN_PATH: &str = "/auth/login";
/// Path of the social login endpoint.
pub const SOCIAL_LOGIN_PATH: &str = "/auth/social-login";

/// Trades a credential for a session grant.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Makes a single exchange attempt.
    ///
    /// Callers must not assume idempotency; the password path in
    /// particular may bump server-side rate-limit counters on every
    /// submission.
    async fn exchange(&self, credential: Credential) -> Result<SessionGrant, ExchangeFailure>;
}

#[derive(Serialize)]
struct PasswordLoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SocialLoginRequest<'a> {
    provider: Provider,
    token: &'a str,
}

/// HTTP client for the backend's login endpoints.
///
/// Each credential variant maps to its own endpoint: email/password to
/// [`PASSWORD_LOGIN_PATH`], provider tokens to [`SOCIAL_LOGIN_PATH`].
pub struct ExchangeClient {
    http: reqwest::Client,
    base_url: String,
}

impl ExchangeClient {
    /// Creates a client for the backend at `base_url` (scheme and host,
    /// with or without a trailing slash).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_login<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<SessionGrant, ExchangeFailure> {
        let response = self
            .http
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ExchangeFailure::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let reason = match response.text().await {
                Ok(body) => rejection_reason(&body),
                Err(_) => None,
            };
            return Err(ExchangeFailure::Rejected {
                status: status.as_u16(),
                reason,
            });
        }

        response
            .json::<SessionGrant>()
            .await
            .map_err(|e| ExchangeFailure::Transport {
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl TokenExchange for ExchangeClient {
    async fn exchange(&self, credential: Credential) -> Result<SessionGrant, ExchangeFailure> {
        match credential {
            Credential::EmailPassword { email, password } => {
                self.post_login(
                    PASSWORD_LOGIN_PATH,
                    &PasswordLoginRequest {
                        email: &email,
                        password: &password,
                    },
                )
                .await
            }
            Credential::ProviderToken { provider, token } => {
                self.post_login(
                    SOCIAL_LOGIN_PATH,
                    &SocialLoginRequest {
                        provider,
                        token: token.as_str(),
                    },
                )
                .await
            }
        }
    }
}

/// Extracts a machine-readable reason from an error response body.
///
/// Backends answer with `{"error": "..."}` or `{"message": "..."}`;
/// anything else is treated as opaque.
fn rejection_reason(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    for key in ["error", "message"] {
        if let Some(reason) = value.get(key).and_then(|v| v.as_str()) {
            if !reason.is_empty() {
                return Some(reason.to_string());
            }
        }
    }
    None
}

/// A mock exchange that can be configured to succeed or fail.
pub struct MockExchange {
    outcome: Result<SessionGrant, ExchangeFailure>,
    calls: Mutex<Vec<Credential>>,
}

impl MockExchange {
    /// Creates a mock exchange that succeeds with the given grant.
    #[must_use]
    pub fn succeeding(grant: SessionGrant) -> Self {
        Self {
            outcome: Ok(grant),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock exchange that fails with the given error.
    #[must_use]
    pub fn failing(error: ExchangeFailure) -> Self {
        Self {
            outcome: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Returns the credentials exchanged so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Credential> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenExchange for MockExchange {
    async fn exchange(&self, credential: Credential) -> Result<SessionGrant, ExchangeFailure> {
        self.calls.lock().unwrap().push(credential);
        self.outcome.clone()
    }
}
