//! Account identifiers for authenticated principals.

use serde::{Deserialize, Serialize};

/// Account number of an authenticated principal.
///
/// Account numbers are opaque strings issued by the backend when the account
/// is created. This library never generates one; it only carries the value
/// the exchange response delivers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNo(String);

impl AccountNo {
    /// Creates an account number from a string.
    #[must_use]
    pub fn new(account_no: String) -> Self {
        Self(account_no)
    }

    /// Returns the account number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountNo {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountNo {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_no_display() {
        let no = AccountNo::new("11855".to_string());
        assert_eq!(no.to_string(), "11855");
    }

    #[test]
    fn account_no_from_str() {
        let no: AccountNo = "11855".into();
        assert_eq!(no.as_str(), "11855");
    }

    #[test]
    fn account_no_serializes_transparently() {
        let no = AccountNo::new("11855".to_string());
        let json = serde_json::to_string(&no).expect("serialize");
        assert_eq!(json, "\"11855\"");
        let parsed: AccountNo = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, no);
    }
}
