//! Google sign-in via the OAuth implicit flow.
//!
//! The flow itself runs in the provider SDK: a popup opens, the user
//! signs in, and the SDK reports either an access token or an error code.
//! This module wraps that ceremony behind [`ImplicitFlow`] and classifies
//! its outcomes into the shared provider-failure taxonomy.

use async_trait::async_trait;
use oauth2::RedirectUrl;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ProviderConfigError, ProviderFailure};
use crate::provider::{ExternalToken, Provider, ProviderAdapter};

/// Configuration for Google sign-in.
///
/// The implicit flow needs only the OAuth client ID and the origin
/// registered for it as an authorized JavaScript origin; everything else
/// lives inside the SDK.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// The OAuth2 client ID registered with Google.
    client_id: String,
    /// The origin registered as an authorized JavaScript origin.
    origin: String,
}

impl GoogleConfig {
    /// Creates a new Google configuration.
    #[must_use]
    pub fn new(client_id: String, origin: String) -> Self {
        Self { client_id, origin }
    }

    /// Returns the OAuth2 client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the registered origin.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

/// Successful outcome of the implicit-flow popup, as the SDK reports it.
#[derive(Clone)]
pub struct ImplicitGrant {
    /// The bearer token from the fragment response.
    pub access_token: String,
}

/// Failure reported by the implicit-flow SDK.
///
/// `code` is the OAuth-style error identifier (`popup_closed`,
/// `access_denied`, ...); `description` is whatever free text accompanied
/// it, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplicitFlowError {
    pub code: String,
    pub description: String,
}

/// The external implicit-flow ceremony.
///
/// Implementations open the Google sign-in popup and suspend until it
/// settles. They must settle with an error when the popup is closed,
/// never hang, and never retry on their own.
#[async_trait]
pub trait ImplicitFlow: Send + Sync {
    /// Opens the popup and waits for the flow to settle.
    async fn run(&self) -> Result<ImplicitGrant, ImplicitFlowError>;
}

/// Provider adapter for Google sign-in.
pub struct GoogleAdapter<F: ImplicitFlow> {
    flow: F,
}

impl<F: ImplicitFlow> GoogleAdapter<F> {
    /// Creates a new Google adapter from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the client ID is empty or the origin does not
    /// parse as a URL.
    pub fn new(config: &GoogleConfig, flow: F) -> Result<Self, ProviderConfigError> {
        if config.client_id().is_empty() {
            return Err(ProviderConfigError::MissingClientId);
        }

        // Validate the registered origin
        let _ = RedirectUrl::new(config.origin().to_string()).map_err(|e| {
            ProviderConfigError::InvalidRedirectUri {
                uri: config.origin().to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self { flow })
    }

    fn classify(err: ImplicitFlowError) -> ProviderFailure {
        match err.code.as_str() {
            "popup_closed" | "popup_closed_by_user" => ProviderFailure::Dismissed,
            "access_denied" => ProviderFailure::ConsentDenied,
            "network_error" => ProviderFailure::Network {
                reason: err.description,
            },
            _ => ProviderFailure::Protocol {
                code: err.code,
                description: err.description,
            },
        }
    }
}

// Not derived: the flow need not be Debug, and mock flows carry bearer
// tokens that must never reach logs through Debug output.
impl<F: ImplicitFlow> fmt::Debug for GoogleAdapter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleAdapter").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F: ImplicitFlow> ProviderAdapter for GoogleAdapter<F> {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    async fn acquire(&self) -> Result<ExternalToken, ProviderFailure> {
        let grant = self.flow.run().await.map_err(Self::classify)?;
        ExternalToken::new(grant.access_token)
    }
}

/// Mock implicit flow for testing.
///
/// Settles immediately with a canned outcome instead of opening a popup.
pub struct MockImplicitFlow {
    outcome: Result<ImplicitGrant, ImplicitFlowError>,
}

impl MockImplicitFlow {
    /// Creates a flow that succeeds with the given access token.
    #[must_use]
    pub fn succeeding(access_token: impl Into<String>) -> Self {
        Self {
            outcome: Ok(ImplicitGrant {
                access_token: access_token.into(),
            }),
        }
    }

    /// Creates a flow that fails with the given error code.
    #[must_use]
    pub fn failing(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            outcome: Err(ImplicitFlowError {
                code: code.into(),
                description: description.into(),
            }),
        }
    }
}

#[async_trait]
impl ImplicitFlow for MockImplicitFlow {
    async fn run(&self) -> Result<ImplicitGrant, ImplicitFlowError> {
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GoogleConfig {
        GoogleConfig::new(
            "894832625732-test.apps.googleusercontent.com".to_string(),
            "http://localhost:5173".to_string(),
        )
    }

    #[tokio::test]
    async fn acquire_yields_the_access_token() {
        let adapter = GoogleAdapter::new(&test_config(), MockImplicitFlow::succeeding("ya29.tok"))
            .expect("valid config");
        let token = adapter.acquire().await.expect("flow succeeds");
        assert_eq!(token.as_str(), "ya29.tok");
    }

    #[tokio::test]
    async fn closed_popup_becomes_dismissed() {
        let adapter = GoogleAdapter::new(
            &test_config(),
            MockImplicitFlow::failing("popup_closed", "user closed the popup"),
        )
        .expect("valid config");
        let err = adapter.acquire().await.unwrap_err();
        assert_eq!(err, ProviderFailure::Dismissed);
    }

    #[tokio::test]
    async fn denied_consent_is_classified() {
        let adapter = GoogleAdapter::new(
            &test_config(),
            MockImplicitFlow::failing("access_denied", "consent screen declined"),
        )
        .expect("valid config");
        let err = adapter.acquire().await.unwrap_err();
        assert_eq!(err, ProviderFailure::ConsentDenied);
    }

    #[tokio::test]
    async fn unknown_code_is_preserved_as_protocol_failure() {
        let adapter = GoogleAdapter::new(
            &test_config(),
            MockImplicitFlow::failing("popup_failed_to_open", "blocked by the browser"),
        )
        .expect("valid config");
        let err = adapter.acquire().await.unwrap_err();
        assert_eq!(
            err,
            ProviderFailure::Protocol {
                code: "popup_failed_to_open".to_string(),
                description: "blocked by the browser".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn empty_token_from_the_sdk_is_a_failure() {
        let adapter = GoogleAdapter::new(&test_config(), MockImplicitFlow::succeeding(""))
            .expect("valid config");
        let err = adapter.acquire().await.unwrap_err();
        assert_eq!(err, ProviderFailure::EmptyToken);
    }

    #[test]
    fn missing_client_id_is_rejected() {
        let config = GoogleConfig::new(String::new(), "http://localhost:5173".to_string());
        let err = GoogleAdapter::new(&config, MockImplicitFlow::succeeding("tok")).unwrap_err();
        assert_eq!(err, ProviderConfigError::MissingClientId);
    }

    #[test]
    fn unparseable_origin_is_rejected() {
        let config = GoogleConfig::new("client-id".to_string(), "not a url".to_string());
        let err = GoogleAdapter::new(&config, MockImplicitFlow::succeeding("tok")).unwrap_err();
        assert!(matches!(err, ProviderConfigError::InvalidRedirectUri { .. }));
    }
}
