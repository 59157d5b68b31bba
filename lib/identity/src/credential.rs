//! Credential normalization.
//!
//! Raw sign-in input is shaped into one of two canonical credential
//! variants before anything touches the network. The email and password
//! rules are the sign-in form's rules, checked here so that no caller can
//! reach the exchange with input the form would have rejected.

use std::fmt;

use crate::error::ValidationError;
use crate::provider::{ExternalToken, Provider};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 7;

/// A credential ready for exchange with the backend.
///
/// Build values through [`Credential::email_password`] and
/// [`Credential::provider_token`]; both enforce the rules of their variant,
/// so a `Credential` in hand has already passed validation.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Local email and password sign-in.
    EmailPassword { email: String, password: String },
    /// An opaque bearer token vouched for by an external provider.
    ProviderToken {
        provider: Provider,
        token: ExternalToken,
    },
}

impl Credential {
    /// Validates raw form input into an `EmailPassword` credential.
    ///
    /// Rules are checked in order and the first violated rule wins:
    /// email present, email RFC-shaped, password present, password at
    /// least [`MIN_PASSWORD_LEN`] characters. Pure; performs no I/O.
    pub fn email_password(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let email = email.into();
        let password = password.into();

        if email.is_empty() {
            return Err(ValidationError::EmailRequired);
        }
        if !is_rfc_shaped(&email) {
            return Err(ValidationError::EmailInvalid);
        }
        if password.is_empty() {
            return Err(ValidationError::PasswordRequired);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }

        Ok(Self::EmailPassword { email, password })
    }

    /// Wraps a provider-issued token as a `ProviderToken` credential.
    ///
    /// Token presence was already established when the [`ExternalToken`]
    /// was constructed, so this cannot fail.
    #[must_use]
    pub fn provider_token(provider: Provider, token: ExternalToken) -> Self {
        Self::ProviderToken { provider, token }
    }
}

// Passwords and bearer tokens must never reach logs through Debug output.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmailPassword { email, .. } => f
                .debug_struct("EmailPassword")
                .field("email", email)
                .field("password", &"<redacted>")
                .finish(),
            Self::ProviderToken { provider, token } => f
                .debug_struct("ProviderToken")
                .field("provider", provider)
                .field("token", token)
                .finish(),
        }
    }
}

/// Checks that an address has the shape `local@domain.tld` with no
/// whitespace and exactly one `@`. Full RFC 5322 grammar is not
/// attempted; the server re-validates on its side.
fn is_rfc_shaped(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_input_passes_through_unchanged() {
        let credential = Credential::email_password("user@example.com", "longenough")
            .expect("valid credential");
        let Credential::EmailPassword { email, password } = credential else {
            panic!("expected an email/password credential");
        };
        assert_eq!(email, "user@example.com");
        assert_eq!(password, "longenough");
    }

    #[test]
    fn empty_email_fails_first() {
        // Both fields are bad; the email rule is checked first.
        let err = Credential::email_password("", "short").unwrap_err();
        assert_eq!(err, ValidationError::EmailRequired);
    }

    #[test]
    fn malformed_email_is_rejected() {
        let err = Credential::email_password("not-an-email", "longenough").unwrap_err();
        assert_eq!(err, ValidationError::EmailInvalid);
    }

    #[test]
    fn empty_password_is_rejected() {
        let err = Credential::email_password("a@b.com", "").unwrap_err();
        assert_eq!(err, ValidationError::PasswordRequired);
    }

    #[test]
    fn short_password_is_rejected_with_the_length_message() {
        let err = Credential::email_password("a@b.com", "short").unwrap_err();
        assert_eq!(err, ValidationError::PasswordTooShort);
        assert!(err.to_string().contains("at least 7 characters"));
    }

    #[test]
    fn seven_character_password_is_accepted() {
        let credential = Credential::email_password("a@b.com", "sevench");
        assert!(credential.is_ok());
    }

    #[test]
    fn email_shape_rules() {
        for valid in ["a@b.com", "user.name+tag@example.co.uk", "x@sub.domain.org"] {
            assert!(is_rfc_shaped(valid), "{valid} should be accepted");
        }
        for invalid in [
            "user@localhost",
            "us er@b.com",
            "a@@b.com",
            "@b.com",
            "a@.com",
            "a@b.",
            "a@",
            "plain",
        ] {
            assert!(!is_rfc_shaped(invalid), "{invalid} should be rejected");
        }
    }

    #[test]
    fn debug_output_redacts_the_password() {
        let credential =
            Credential::email_password("a@b.com", "longenough").expect("valid credential");
        let rendered = format!("{credential:?}");
        assert!(rendered.contains("a@b.com"));
        assert!(!rendered.contains("longenough"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn provider_token_credential_keeps_the_provider() {
        let token = ExternalToken::new("opaque").expect("non-empty token");
        let credential = Credential::provider_token(Provider::Google, token);
        assert!(matches!(
            credential,
            Credential::ProviderToken {
                provider: Provider::Google,
                ..
            }
        ));
    }
}
