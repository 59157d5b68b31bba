//! Session state, token persistence, and subscriber fan-out for vestibule.
//!
//! This crate provides:
//! - The authenticated principal (`AuthUser`) and exchange result
//!   (`SessionGrant`) wire types
//! - The session store (`SessionStore`), the single source of truth for
//!   "who is logged in"
//! - Durable persistence of the access token (`TokenStore`,
//!   `FileTokenStore`, `MemoryTokenStore`)
//! - Session change events (`SessionEvent`) fanned out to any number of
//!   subscribers
//!
//! # Persistence Model
//!
//! Only the access token survives a restart, mirrored under a fixed key.
//! The user record is never persisted: after a restart the session is
//! [`SessionStatus::PendingProfile`] until a fresh exchange or a profile
//! refetch repopulates it.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use vestibule_session::{MemoryTokenStore, SessionStatus, SessionStore};
//!
//! let store = SessionStore::new(Arc::new(MemoryTokenStore::new()));
//! assert_eq!(store.current().status(), SessionStatus::Anonymous);
//! ```

pub mod error;
pub mod storage;
pub mod store;
pub mod user;

// Re-export main types at crate root
pub use error::StorageError;
pub use storage::{ACCESS_TOKEN_KEY, FileTokenStore, MemoryTokenStore, TokenStore};
pub use store::{SessionEvent, SessionState, SessionStatus, SessionStore};
pub use user::{AuthUser, SessionGrant};
