//! Error taxonomy of the login flow.
//!
//! Every failure a login attempt can produce is converted into
//! [`LoginError`] at the controller boundary; no raw provider or
//! transport error crosses into the session store or the presentation
//! layer.

use std::fmt;

use vestibule_identity::{Provider, ProviderFailure, ValidationError};

/// Errors from the backend credential exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeFailure {
    /// The backend answered with a non-success status.
    Rejected { status: u16, reason: Option<String> },
    /// The request never completed or the response body was unreadable.
    Transport { reason: String },
}

impl fmt::Display for ExchangeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected {
                status,
                reason: Some(reason),
            } => {
                write!(f, "the backend rejected the login (status {status}): {reason}")
            }
            Self::Rejected {
                status,
                reason: None,
            } => write!(f, "the backend rejected the login (status {status})"),
            Self::Transport { reason } => write!(f, "could not reach the backend: {reason}"),
        }
    }
}

impl std::error::Error for ExchangeFailure {}

/// Outcome classification of a login attempt.
///
/// Wrapped failures render verbatim; their messages are shown to the
/// user as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// The credential failed a local validation rule; nothing was sent.
    Validation(ValidationError),
    /// The identity provider did not produce a usable token.
    Provider(ProviderFailure),
    /// The backend refused the credential or was unreachable.
    Exchange(ExchangeFailure),
    /// Another attempt is already in flight; this one was refused.
    AttemptInProgress,
    /// No adapter is registered for the requested provider.
    AdapterMissing { provider: Provider },
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "{e}"),
            Self::Provider(e) => write!(f, "{e}"),
            Self::Exchange(e) => write!(f, "{e}"),
            Self::AttemptInProgress => {
                write!(f, "another sign-in attempt is already in progress")
            }
            Self::AdapterMissing { provider } => {
                write!(f, "no adapter registered for provider: {provider}")
            }
        }
    }
}

impl std::error::Error for LoginError {}

impl From<ValidationError> for LoginError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<ProviderFailure> for LoginError {
    fn from(e: ProviderFailure) -> Self {
        Self::Provider(e)
    }
}

impl From<ExchangeFailure> for LoginError {
    fn from(e: ExchangeFailure) -> Self {
        Self::Exchange(e)
    }
}
