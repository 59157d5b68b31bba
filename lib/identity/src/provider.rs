//! Provider identities and the adapter capability.
//!
//! A provider adapter fronts one external identity system. Whatever the
//! underlying SDK ceremony looks like, the adapter exposes a single
//! asynchronous `acquire` that settles into either an opaque bearer token
//! or a classified failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProviderFailure;

/// External identity providers that can vouch for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Google, via the OAuth implicit flow.
    Google,
    /// Microsoft, via the enterprise popup ceremony.
    Microsoft,
}

impl Provider {
    /// Returns the provider's wire name, as sent to the backend.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Microsoft => "microsoft",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing a provider name from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseProviderError {
    /// The name that did not match any known provider.
    pub name: String,
}

impl fmt::Display for ParseProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown provider: {}", self.name)
    }
}

impl std::error::Error for ParseProviderError {}

impl FromStr for Provider {
    type Err = ParseProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Self::Google),
            "microsoft" => Ok(Self::Microsoft),
            other => Err(ParseProviderError {
                name: other.to_string(),
            }),
        }
    }
}

/// An opaque bearer token issued by an external provider.
///
/// The token is never inspected or decoded here; the only invariant this
/// type carries is that the string is non-empty. Identity claims belong to
/// the backend exchange, which verifies the token server-side.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExternalToken(String);

impl ExternalToken {
    /// Wraps a provider-issued token, rejecting empty strings.
    ///
    /// An empty token means the ceremony settled without producing a
    /// usable grant, which is a provider failure rather than bad input.
    pub fn new(token: impl Into<String>) -> Result<Self, ProviderFailure> {
        let token = token.into();
        if token.is_empty() {
            return Err(ProviderFailure::EmptyToken);
        }
        Ok(Self(token))
    }

    /// Returns the raw bearer string for the exchange request.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Bearer tokens must never reach logs through Debug output.
impl fmt::Debug for ExternalToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExternalToken(<redacted>)")
    }
}

/// Capability shared by every identity-provider integration.
///
/// Implementations wrap the provider SDK's ceremony and resolve once the
/// external flow settles. `acquire` must not retry on its own, and must
/// settle with a failure (never hang) when the user abandons the flow.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// The provider this adapter fronts.
    fn provider(&self) -> Provider;

    /// Runs the provider's sign-in flow to completion.
    ///
    /// Suspends until the external flow settles. On success yields the
    /// bearer token and nothing else; any ID token or profile payload the
    /// SDK produced alongside it is discarded.
    async fn acquire(&self) -> Result<ExternalToken, ProviderFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_wire_names() {
        assert_eq!(Provider::Google.as_str(), "google");
        assert_eq!(Provider::Microsoft.as_str(), "microsoft");
    }

    #[test]
    fn provider_serializes_lowercase() {
        let json = serde_json::to_string(&Provider::Google).expect("serialize");
        assert_eq!(json, "\"google\"");
        let parsed: Provider = serde_json::from_str("\"microsoft\"").expect("deserialize");
        assert_eq!(parsed, Provider::Microsoft);
    }

    #[test]
    fn provider_parses_from_wire_name() {
        assert_eq!("google".parse::<Provider>(), Ok(Provider::Google));
        assert_eq!("microsoft".parse::<Provider>(), Ok(Provider::Microsoft));
        let err = "github".parse::<Provider>().unwrap_err();
        assert!(err.to_string().contains("github"));
    }

    #[test]
    fn empty_token_is_a_provider_failure() {
        let err = ExternalToken::new("").unwrap_err();
        assert_eq!(err, ProviderFailure::EmptyToken);
    }

    #[test]
    fn token_debug_output_is_redacted() {
        let token = ExternalToken::new("ya29.secret-bearer").expect("non-empty token");
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("ya29"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn token_round_trips_the_raw_string() {
        let token = ExternalToken::new("opaque-123").expect("non-empty token");
        assert_eq!(token.as_str(), "opaque-123");
        let json = serde_json::to_string(&token).expect("serialize");
        assert_eq!(json, "\"opaque-123\"");
    }
}
