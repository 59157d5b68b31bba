//! Error types for the identity crate.
//!
//! The split mirrors where each failure can occur:
//! - `ValidationError`: local input rules, checked before any network call
//! - `ProviderFailure`: the external sign-in ceremony did not yield a token
//! - `ProviderConfigError`: an adapter was built from unusable configuration

use std::fmt;

/// The form field a validation rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    Email,
    Password,
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Password => write!(f, "password"),
        }
    }
}

/// Errors from credential validation.
///
/// One variant per rule, checked in declaration order; the first violated
/// rule wins. Display output is the user-facing message of the rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Email was empty.
    EmailRequired,
    /// Email is not a syntactically valid address.
    EmailInvalid,
    /// Password was empty.
    PasswordRequired,
    /// Password is shorter than the minimum length.
    PasswordTooShort,
}

impl ValidationError {
    /// Returns the field the violated rule belongs to.
    #[must_use]
    pub fn field(&self) -> CredentialField {
        match self {
            Self::EmailRequired | Self::EmailInvalid => CredentialField::Email,
            Self::PasswordRequired | Self::PasswordTooShort => CredentialField::Password,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmailRequired => write!(f, "Please enter your email"),
            Self::EmailInvalid => write!(f, "Invalid email address"),
            Self::PasswordRequired => write!(f, "Please enter your password"),
            Self::PasswordTooShort => {
                write!(f, "Password must be at least 7 characters long")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors from a provider sign-in ceremony.
///
/// These cover every way an external flow can settle without a token. A
/// redirect-URI mismatch is an operator error, diagnosable from the
/// configured value, and is never folded into `Protocol`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderFailure {
    /// The sign-in window was closed before the flow completed.
    Dismissed,
    /// The user or their organization denied consent.
    ConsentDenied,
    /// The provider could not be reached.
    Network { reason: String },
    /// The configured redirect URI is not registered with the platform.
    RedirectUriMismatch { configured: String },
    /// Any other provider-reported failure code.
    Protocol { code: String, description: String },
    /// The ceremony reported success but the token was empty.
    EmptyToken,
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dismissed => {
                write!(f, "the sign-in window was closed before completing")
            }
            Self::ConsentDenied => {
                write!(f, "access was denied during provider sign-in")
            }
            Self::Network { reason } => {
                write!(f, "provider network error: {reason}")
            }
            Self::RedirectUriMismatch { configured } => {
                write!(
                    f,
                    "redirect URI mismatch: '{configured}' is not registered with the identity platform"
                )
            }
            Self::Protocol { code, description } => {
                write!(f, "provider error '{code}': {description}")
            }
            Self::EmptyToken => {
                write!(f, "provider returned an empty access token")
            }
        }
    }
}

impl std::error::Error for ProviderFailure {}

/// Errors from building a provider adapter out of configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderConfigError {
    /// The client ID is missing or empty.
    MissingClientId,
    /// The redirect URI does not parse as a URL.
    InvalidRedirectUri { uri: String, reason: String },
    /// The authority URL does not parse as a URL.
    InvalidAuthority { url: String, reason: String },
}

impl fmt::Display for ProviderConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingClientId => write!(f, "provider client ID is not configured"),
            Self::InvalidRedirectUri { uri, reason } => {
                write!(f, "invalid redirect URI '{uri}': {reason}")
            }
            Self::InvalidAuthority { url, reason } => {
                write!(f, "invalid authority URL '{url}': {reason}")
            }
        }
    }
}

impl std::error::Error for ProviderConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_messages_match_the_form() {
        assert_eq!(
            ValidationError::EmailRequired.to_string(),
            "Please enter your email"
        );
        assert_eq!(
            ValidationError::EmailInvalid.to_string(),
            "Invalid email address"
        );
        assert_eq!(
            ValidationError::PasswordRequired.to_string(),
            "Please enter your password"
        );
        assert_eq!(
            ValidationError::PasswordTooShort.to_string(),
            "Password must be at least 7 characters long"
        );
    }

    #[test]
    fn validation_error_maps_to_field() {
        assert_eq!(ValidationError::EmailRequired.field(), CredentialField::Email);
        assert_eq!(ValidationError::EmailInvalid.field(), CredentialField::Email);
        assert_eq!(
            ValidationError::PasswordRequired.field(),
            CredentialField::Password
        );
        assert_eq!(
            ValidationError::PasswordTooShort.field(),
            CredentialField::Password
        );
    }

    #[test]
    fn redirect_mismatch_display_names_the_configured_uri() {
        let err = ProviderFailure::RedirectUriMismatch {
            configured: "http://localhost:5173".to_string(),
        };
        assert!(err.to_string().contains("redirect URI mismatch"));
        assert!(err.to_string().contains("http://localhost:5173"));
    }

    #[test]
    fn protocol_failure_display_carries_code_and_description() {
        let err = ProviderFailure::Protocol {
            code: "server_error".to_string(),
            description: "AADSTS90002".to_string(),
        };
        assert!(err.to_string().contains("server_error"));
        assert!(err.to_string().contains("AADSTS90002"));
    }

    #[test]
    fn config_error_display() {
        let err = ProviderConfigError::InvalidRedirectUri {
            uri: "not a url".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(err.to_string().contains("not a url"));
    }
}
