//! The authenticated principal and the grant that carries it.
//!
//! Both types are wire types: `AuthUser` is the user object the backend
//! embeds in its login responses (field names follow the backend's JSON),
//! and `SessionGrant` is the whole success response body. Neither is ever
//! constructed from client-side identity claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use vestibule_core::AccountNo;

/// The authenticated principal, as the backend reports it.
///
/// Created only from a successful exchange response; immutable once
/// constructed. Re-login replaces it wholesale, logout clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    /// Account number of the principal.
    account_no: AccountNo,
    /// Email the account was registered with.
    email: String,
    /// Role names granted to the account. Carried through for
    /// subscribers; this library never evaluates them.
    #[serde(rename = "role")]
    roles: BTreeSet<String>,
    /// When the access token expires, as Unix seconds.
    #[serde(with = "chrono::serde::ts_seconds")]
    exp: DateTime<Utc>,
}

impl AuthUser {
    /// Creates a user record.
    ///
    /// Normally users arrive by deserializing an exchange response; this
    /// constructor exists for embedders' fixtures and profile refetch
    /// paths.
    #[must_use]
    pub fn new(
        account_no: AccountNo,
        email: String,
        roles: BTreeSet<String>,
        exp: DateTime<Utc>,
    ) -> Self {
        Self {
            account_no,
            email,
            roles,
            exp,
        }
    }

    /// Returns the account number.
    #[must_use]
    pub fn account_no(&self) -> &AccountNo {
        &self.account_no
    }

    /// Returns the registered email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the role names granted to the account.
    #[must_use]
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    /// Returns when the access token expires.
    #[must_use]
    pub fn exp(&self) -> DateTime<Utc> {
        self.exp
    }

    /// Returns true if the token expiry has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.exp
    }
}

/// Result of a successful backend exchange.
///
/// Atomically replaces both halves of the session state; the store never
/// holds a user without the matching token or vice versa.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionGrant {
    access_token: String,
    user: AuthUser,
}

impl SessionGrant {
    /// Creates a grant from its parts.
    #[must_use]
    pub fn new(access_token: String, user: AuthUser) -> Self {
        Self { access_token, user }
    }

    /// Returns the access token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the user the backend vouched for.
    #[must_use]
    pub fn user(&self) -> &AuthUser {
        &self.user
    }

    /// Splits the grant into its parts.
    #[must_use]
    pub fn into_parts(self) -> (String, AuthUser) {
        (self.access_token, self.user)
    }
}

// Access tokens must never reach logs through Debug output.
impl fmt::Debug for SessionGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGrant")
            .field("access_token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}
