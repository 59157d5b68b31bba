//! Durable persistence for the access token.
//!
//! Only the token is mirrored to durable storage, under a fixed key; the
//! user record never leaves process memory. Values are stored
//! JSON-encoded, and decoding tolerates a bare unquoted value left behind
//! by earlier versions of the mirror.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StorageError;

/// Key under which the access token is mirrored in durable storage.
pub const ACCESS_TOKEN_KEY: &str = "thisisjustarandomstring";

/// Durable mirror of the access token.
///
/// `save` and `clear` are the only writes the session layer performs
/// outside process memory, and only the session store calls them.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Loads the mirrored token. Absent or empty entries are `None`.
    async fn load(&self) -> Result<Option<String>, StorageError>;

    /// Mirrors the given token.
    async fn save(&self, token: &str) -> Result<(), StorageError>;

    /// Deletes the mirror entry. Clearing an absent entry is not an
    /// error.
    async fn clear(&self) -> Result<(), StorageError>;
}

fn encode_token(token: &str) -> String {
    serde_json::to_string(token).expect("serialize token string")
}

/// Decodes a stored value, tolerating a bare unquoted legacy value.
fn decode_token(raw: &str) -> String {
    serde_json::from_str::<String>(raw).unwrap_or_else(|_| raw.to_string())
}

/// File-backed token mirror.
///
/// Keeps the JSON-encoded token in a single file named by
/// [`ACCESS_TOKEN_KEY`] inside the given directory.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a mirror rooted at the given directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(ACCESS_TOKEN_KEY),
        }
    }

    /// Returns the path of the mirror entry.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => {
                let token = decode_token(raw.trim());
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io {
                reason: e.to_string(),
            }),
        }
    }

    async fn save(&self, token: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io {
                    reason: e.to_string(),
                })?;
        }
        tokio::fs::write(&self.path, encode_token(token))
            .await
            .map_err(|e| StorageError::Io {
                reason: e.to_string(),
            })
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io {
                reason: e.to_string(),
            }),
        }
    }
}

/// In-memory token mirror for tests and embedders without durable
/// storage.
///
/// Holds the same JSON-encoded representation the file mirror writes, so
/// round-trip behavior matches.
#[derive(Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    /// Creates an empty mirror.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap();
        match entries.get(ACCESS_TOKEN_KEY) {
            Some(raw) => {
                let token = decode_token(raw);
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token))
                }
            }
            None => Ok(None),
        }
    }

    async fn save(&self, token: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap()
            .insert(ACCESS_TOKEN_KEY.to_string(), encode_token(token));
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.entries.lock().unwrap().remove(ACCESS_TOKEN_KEY);
        Ok(())
    }
}

/// Token mirror that fails every operation.
///
/// Exists so callers can exercise the mirror-unavailable path: in-memory
/// state must keep working when durable storage does not.
#[derive(Default)]
pub struct FailingTokenStore;

impl FailingTokenStore {
    /// Creates a mirror that always fails.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn fail() -> StorageError {
        StorageError::Io {
            reason: "injected mirror failure".to_string(),
        }
    }
}

#[async_trait]
impl TokenStore for FailingTokenStore {
    async fn load(&self) -> Result<Option<String>, StorageError> {
        Err(Self::fail())
    }

    async fn save(&self, _token: &str) -> Result<(), StorageError> {
        Err(Self::fail())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        Err(Self::fail())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn file_store_round_trips_the_token() {
        let dir = tempdir().expect("temp dir");
        let store = FileTokenStore::new(dir.path());

        store.save("tok123").await.expect("save");
        assert_eq!(store.load().await.expect("load"), Some("tok123".to_string()));
    }

    #[tokio::test]
    async fn file_store_writes_the_json_encoded_value() {
        let dir = tempdir().expect("temp dir");
        let store = FileTokenStore::new(dir.path());

        store.save("tok123").await.expect("save");

        let raw = std::fs::read_to_string(store.path()).expect("read mirror file");
        assert_eq!(raw, "\"tok123\"");
    }

    #[tokio::test]
    async fn file_store_load_is_none_when_absent() {
        let dir = tempdir().expect("temp dir");
        let store = FileTokenStore::new(dir.path());
        assert_eq!(store.load().await.expect("load"), None);
    }

    #[tokio::test]
    async fn file_store_tolerates_a_bare_legacy_value() {
        let dir = tempdir().expect("temp dir");
        let store = FileTokenStore::new(dir.path());

        std::fs::write(store.path(), "legacy-token").expect("write legacy value");
        assert_eq!(
            store.load().await.expect("load"),
            Some("legacy-token".to_string())
        );
    }

    #[tokio::test]
    async fn file_store_clear_is_idempotent() {
        let dir = tempdir().expect("temp dir");
        let store = FileTokenStore::new(dir.path());

        store.save("tok123").await.expect("save");
        store.clear().await.expect("first clear");
        store.clear().await.expect("second clear");
        assert_eq!(store.load().await.expect("load"), None);
    }

    #[tokio::test]
    async fn memory_store_round_trips_the_token() {
        let store = MemoryTokenStore::new();

        store.save("tok123").await.expect("save");
        assert_eq!(store.load().await.expect("load"), Some("tok123".to_string()));

        store.clear().await.expect("clear");
        assert_eq!(store.load().await.expect("load"), None);
    }

    #[tokio::test]
    async fn empty_saved_token_loads_as_none() {
        let store = MemoryTokenStore::new();
        store.save("").await.expect("save");
        assert_eq!(store.load().await.expect("load"), None);
    }

    #[tokio::test]
    async fn failing_store_fails_every_operation() {
        let store = FailingTokenStore::new();
        assert!(store.load().await.is_err());
        assert!(store.save("tok").await.is_err());
        assert!(store.clear().await.is_err());
    }
}
