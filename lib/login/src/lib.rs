//! Login orchestration for vestibule.
//!
//! This crate provides:
//! - The session lifecycle controller (`SessionController`), which runs
//!   one login attempt at a time across every sign-in surface
//! - The backend credential exchange (`TokenExchange`, `ExchangeClient`)
//! - The attempt-outcome taxonomy (`LoginError`, `ExchangeFailure`)
//! - The presentation port for resolved attempts (`Notifier`,
//!   `AttemptNotice`)
//!
//! # Attempt Flow
//!
//! A password attempt validates the form input, then exchanges it with
//! the backend. A social attempt first runs the provider adapter's
//! ceremony, then exchanges the acquired token. Either way, only a
//! successful exchange mutates the session store; every failure leaves
//! it exactly as it was.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use vestibule_login::{ExchangeClient, SessionController};
//! use vestibule_session::{MemoryTokenStore, SessionStore};
//!
//! let store = Arc::new(SessionStore::new(Arc::new(MemoryTokenStore::new())));
//! let exchange = Arc::new(ExchangeClient::new("https://api.example.com"));
//! let controller = SessionController::new(store, exchange);
//! assert!(!controller.is_busy());
//! ```

pub mod controller;
pub mod error;
pub mod exchange;
pub mod notify;

// Re-export main types at crate root
pub use controller::SessionController;
pub use error::{ExchangeFailure, LoginError};
pub use exchange::{ExchangeClient, PASSWORD_LOGIN_PATH, SOCIAL_LOGIN_PATH, TokenExchange};
pub use notify::{AttemptNotice, NoticeKind, Notifier};
