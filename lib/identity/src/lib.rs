//! Credential normalization and identity-provider adapters for vestibule.
//!
//! This crate provides:
//! - Credential normalization (`Credential` with validating constructors)
//! - The provider-adapter capability (`ProviderAdapter`, `ExternalToken`)
//! - Google sign-in via the OAuth implicit flow (`GoogleAdapter`)
//! - Microsoft sign-in via the enterprise popup ceremony (`MicrosoftAdapter`)
//! - Validation and provider error types
//!
//! # Credential Model
//!
//! Every sign-in surface ends up as one of two credential shapes:
//! - `EmailPassword`, validated locally before any network call
//! - `ProviderToken`, an opaque bearer token vouched for by an external
//!   provider, checked only for presence
//!
//! # Example
//!
//! ```
//! use vestibule_identity::{Credential, ValidationError};
//!
//! let credential = Credential::email_password("alice@example.com", "hunter2-77")
//!     .expect("valid input");
//! assert!(matches!(credential, Credential::EmailPassword { .. }));
//!
//! // Rules are checked in order; the first violated rule wins
//! let err = Credential::email_password("alice@example.com", "short").unwrap_err();
//! assert_eq!(err, ValidationError::PasswordTooShort);
//! assert_eq!(err.to_string(), "Password must be at least 7 characters long");
//! ```

pub mod credential;
pub mod error;
pub mod google;
pub mod microsoft;
pub mod provider;

// Re-export main types at crate root
pub use credential::{Credential, MIN_PASSWORD_LEN};
pub use error::{CredentialField, ProviderConfigError, ProviderFailure, ValidationError};
pub use google::{GoogleAdapter, GoogleConfig, ImplicitFlow, ImplicitFlowError, ImplicitGrant};
pub use microsoft::{
    CeremonyError, MicrosoftAdapter, MicrosoftConfig, MicrosoftConfigBuilder, PopupCeremony,
    PopupGrant, PopupRequest,
};
pub use provider::{ExternalToken, ParseProviderError, Provider, ProviderAdapter};
