//! Microsoft sign-in via the enterprise popup ceremony.
//!
//! The identity platform drives a popup with an account picker; the
//! application side contributes the registered client, the redirect URI,
//! and a fixed scope set. This module wraps that ceremony behind
//! [`PopupCeremony`] and classifies its failure codes, keeping the
//! redirect-URI mismatch (`invalid_request`) distinct from the generic
//! protocol failures.

use async_trait::async_trait;
use oauth2::{AuthUrl, RedirectUrl};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

use crate::error::{ProviderConfigError, ProviderFailure};
use crate::provider::{ExternalToken, Provider, ProviderAdapter};

/// Configuration for Microsoft sign-in.
///
/// The redirect URI must exactly match the URI registered with the
/// platform; a mismatch surfaces at sign-in time as `invalid_request`.
///
/// Fields with defaults can be omitted when loading from environment
/// variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicrosoftConfig {
    /// The client ID registered with the identity platform.
    client_id: String,
    /// The sign-in authority.
    /// Default: "https://login.microsoftonline.com/common"
    #[serde(default = "default_authority")]
    authority: String,
    /// The redirect URI registered for the application.
    redirect_uri: String,
    /// Where the platform sends the user after sign-out, if configured.
    #[serde(default)]
    post_logout_redirect_uri: Option<String>,
    /// Scopes to request as a comma-separated string.
    /// Default: "openid,profile,email,User.Read,offline_access"
    #[serde(default = "default_scopes")]
    scopes: String,
    /// Prompt mode requested from the platform.
    /// Default: "select_account"
    #[serde(default = "default_prompt")]
    prompt: String,
}

fn default_authority() -> String {
    "https://login.microsoftonline.com/common".to_string()
}

fn default_scopes() -> String {
    "openid,profile,email,User.Read,offline_access".to_string()
}

fn default_prompt() -> String {
    "select_account".to_string()
}

impl MicrosoftConfig {
    /// Creates a new Microsoft configuration with defaults for optional
    /// fields.
    #[must_use]
    pub fn new(client_id: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            authority: default_authority(),
            redirect_uri,
            post_logout_redirect_uri: None,
            scopes: default_scopes(),
            prompt: default_prompt(),
        }
    }

    /// Creates a configuration builder for more customization.
    #[must_use]
    pub fn builder(client_id: String, redirect_uri: String) -> MicrosoftConfigBuilder {
        MicrosoftConfigBuilder::new(client_id, redirect_uri)
    }

    /// Returns the registered client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the sign-in authority.
    #[must_use]
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Returns the registered redirect URI.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Returns the post-sign-out redirect URI, if configured.
    #[must_use]
    pub fn post_logout_redirect_uri(&self) -> Option<&str> {
        self.post_logout_redirect_uri.as_deref()
    }

    /// Returns the scopes to request, parsed from the comma-separated
    /// string.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scopes.split(',').map(str::trim).collect()
    }

    /// Returns the prompt mode.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// Builder for `MicrosoftConfig`.
#[derive(Debug)]
pub struct MicrosoftConfigBuilder {
    client_id: String,
    authority: String,
    redirect_uri: String,
    post_logout_redirect_uri: Option<String>,
    scopes: Vec<String>,
    prompt: String,
}

impl MicrosoftConfigBuilder {
    /// Creates a new builder with required fields.
    #[must_use]
    pub fn new(client_id: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            authority: default_authority(),
            redirect_uri,
            post_logout_redirect_uri: None,
            scopes: default_scopes()
                .split(',')
                .map(str::to_string)
                .collect(),
            prompt: default_prompt(),
        }
    }

    /// Sets the sign-in authority.
    #[must_use]
    pub fn authority(mut self, authority: String) -> Self {
        self.authority = authority;
        self
    }

    /// Sets the post-sign-out redirect URI.
    #[must_use]
    pub fn post_logout_redirect_uri(mut self, uri: String) -> Self {
        self.post_logout_redirect_uri = Some(uri);
        self
    }

    /// Sets the scopes to request.
    #[must_use]
    pub fn scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Adds a scope to the list of scopes to request.
    #[must_use]
    pub fn add_scope(mut self, scope: String) -> Self {
        if !self.scopes.contains(&scope) {
            self.scopes.push(scope);
        }
        self
    }

    /// Sets the prompt mode.
    #[must_use]
    pub fn prompt(mut self, prompt: String) -> Self {
        self.prompt = prompt;
        self
    }

    /// Builds the `MicrosoftConfig`.
    #[must_use]
    pub fn build(self) -> MicrosoftConfig {
        MicrosoftConfig {
            client_id: self.client_id,
            authority: self.authority,
            redirect_uri: self.redirect_uri,
            post_logout_redirect_uri: self.post_logout_redirect_uri,
            scopes: self.scopes.join(","),
            prompt: self.prompt,
        }
    }
}

/// Parameters of one popup ceremony.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupRequest {
    /// Scopes to request, in configuration order.
    pub scopes: Vec<String>,
    /// Prompt mode; the account picker is always requested.
    pub prompt: String,
    /// The redirect URI the ceremony returns through.
    pub redirect_uri: String,
}

/// Successful outcome of the popup ceremony, as the SDK reports it.
///
/// The adapter forwards only `access_token` to the backend; any ID token
/// the ceremony also produced is discarded.
#[derive(Clone)]
pub struct PopupGrant {
    /// The bearer token.
    pub access_token: String,
    /// ID token the SDK may also produce; never used.
    pub id_token: Option<String>,
}

/// Failure reported by the popup ceremony.
///
/// `code` is the platform's error code (`invalid_request`,
/// `user_cancelled`, ...); `description` is the accompanying text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CeremonyError {
    pub code: String,
    pub description: String,
}

/// The external popup authentication ceremony.
///
/// Implementations open the platform's sign-in popup for the given
/// request and suspend until it settles. They must settle with an error
/// when the popup is closed, never hang, and never retry on their own.
#[async_trait]
pub trait PopupCeremony: Send + Sync {
    /// Opens the popup and waits for the ceremony to settle.
    async fn run(&self, request: &PopupRequest) -> Result<PopupGrant, CeremonyError>;
}

/// Provider adapter for Microsoft sign-in.
pub struct MicrosoftAdapter<C: PopupCeremony> {
    config: MicrosoftConfig,
    ceremony: C,
}

impl<C: PopupCeremony> MicrosoftAdapter<C> {
    /// Creates a new Microsoft adapter from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the client ID is empty, or the authority,
    /// redirect URI, or post-sign-out URI does not parse as a URL.
    pub fn new(config: MicrosoftConfig, ceremony: C) -> Result<Self, ProviderConfigError> {
        if config.client_id().is_empty() {
            return Err(ProviderConfigError::MissingClientId);
        }

        // Validate URLs
        let _ = AuthUrl::new(config.authority().to_string()).map_err(|e| {
            ProviderConfigError::InvalidAuthority {
                url: config.authority().to_string(),
                reason: e.to_string(),
            }
        })?;
        let _ = RedirectUrl::new(config.redirect_uri().to_string()).map_err(|e| {
            ProviderConfigError::InvalidRedirectUri {
                uri: config.redirect_uri().to_string(),
                reason: e.to_string(),
            }
        })?;
        if let Some(uri) = config.post_logout_redirect_uri() {
            let _ = RedirectUrl::new(uri.to_string()).map_err(|e| {
                ProviderConfigError::InvalidRedirectUri {
                    uri: uri.to_string(),
                    reason: e.to_string(),
                }
            })?;
        }

        Ok(Self { config, ceremony })
    }

    fn request(&self) -> PopupRequest {
        PopupRequest {
            scopes: self.config.scopes().iter().map(|s| (*s).to_string()).collect(),
            prompt: self.config.prompt().to_string(),
            redirect_uri: self.config.redirect_uri().to_string(),
        }
    }

    fn classify(&self, err: CeremonyError) -> ProviderFailure {
        match err.code.as_str() {
            // The platform reports a redirect URI that does not match the
            // registration as invalid_request.
            "invalid_request" => ProviderFailure::RedirectUriMismatch {
                configured: self.config.redirect_uri().to_string(),
            },
            "user_cancelled" => ProviderFailure::Dismissed,
            "access_denied" | "consent_required" => ProviderFailure::ConsentDenied,
            "network_error" | "no_network_connectivity" => ProviderFailure::Network {
                reason: err.description,
            },
            _ => ProviderFailure::Protocol {
                code: err.code,
                description: err.description,
            },
        }
    }
}

// Not derived: the ceremony need not be Debug, and mock ceremonies carry
// bearer tokens that must never reach logs through Debug output.
impl<C: PopupCeremony> fmt::Debug for MicrosoftAdapter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MicrosoftAdapter").finish_non_exhaustive()
    }
}

#[async_trait]
impl<C: PopupCeremony> ProviderAdapter for MicrosoftAdapter<C> {
    fn provider(&self) -> Provider {
        Provider::Microsoft
    }

    async fn acquire(&self) -> Result<ExternalToken, ProviderFailure> {
        let request = self.request();
        let grant = self
            .ceremony
            .run(&request)
            .await
            .map_err(|e| self.classify(e))?;
        ExternalToken::new(grant.access_token)
    }
}

/// Mock popup ceremony for testing.
///
/// Settles immediately with a canned outcome and records the request it
/// was asked to run.
pub struct MockPopupCeremony {
    outcome: Result<PopupGrant, CeremonyError>,
    last_request: Mutex<Option<PopupRequest>>,
}

impl MockPopupCeremony {
    /// Creates a ceremony that succeeds with the given access token.
    #[must_use]
    pub fn succeeding(access_token: impl Into<String>) -> Self {
        Self {
            outcome: Ok(PopupGrant {
                access_token: access_token.into(),
                id_token: None,
            }),
            last_request: Mutex::new(None),
        }
    }

    /// Creates a ceremony that succeeds with both an access token and an
    /// ID token.
    #[must_use]
    pub fn with_id_token(access_token: impl Into<String>, id_token: impl Into<String>) -> Self {
        Self {
            outcome: Ok(PopupGrant {
                access_token: access_token.into(),
                id_token: Some(id_token.into()),
            }),
            last_request: Mutex::new(None),
        }
    }

    /// Creates a ceremony that fails with the given error code.
    #[must_use]
    pub fn failing(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            outcome: Err(CeremonyError {
                code: code.into(),
                description: description.into(),
            }),
            last_request: Mutex::new(None),
        }
    }

    /// Returns the request from the most recent `run` call.
    #[must_use]
    pub fn last_request(&self) -> Option<PopupRequest> {
        self.last_request.lock().expect("request lock").clone()
    }
}

#[async_trait]
impl PopupCeremony for MockPopupCeremony {
    async fn run(&self, request: &PopupRequest) -> Result<PopupGrant, CeremonyError> {
        *self.last_request.lock().expect("request lock") = Some(request.clone());
        self.outcome.clone()
    }
}
