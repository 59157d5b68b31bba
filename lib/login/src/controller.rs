//! Session lifecycle controller.
//!
//! Drives one login attempt from raw credential to established session:
//! validate, acquire a provider token where applicable, exchange with
//! the backend, commit the grant to the session store. At most one
//! attempt is in flight at a time across every login surface.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, instrument, warn};
use vestibule_identity::{Credential, Provider, ProviderAdapter};
use vestibule_session::{SessionGrant, SessionStore};

use crate::error::LoginError;
use crate::exchange::TokenExchange;
use crate::notify::{AttemptNotice, Notifier};

/// Message carried by the success notice of a resolved attempt.
const LOGIN_SUCCESS_MESSAGE: &str = "Login successful";

/// Orchestrates login attempts against a shared [`SessionStore`].
///
/// The controller is the only component that converts failures into
/// [`LoginError`] and the only one that calls the store's mutators on
/// behalf of a login surface. Failed attempts leave the store exactly
/// as they found it.
pub struct SessionController {
    store: Arc<SessionStore>,
    exchange: Arc<dyn TokenExchange>,
    adapters: HashMap<Provider, Arc<dyn ProviderAdapter>>,
    notifier: Option<Arc<dyn Notifier>>,
    busy: AtomicBool,
}

impl SessionController {
    /// Creates a controller with no provider adapters and no notifier.
    #[must_use]
    pub fn new(store: Arc<SessionStore>, exchange: Arc<dyn TokenExchange>) -> Self {
        Self {
            store,
            exchange,
            adapters: HashMap::new(),
            notifier: None,
            busy: AtomicBool::new(false),
        }
    }

    /// Registers the adapter used for its provider's logins, replacing
    /// any previous registration.
    #[must_use]
    pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(adapter.provider(), adapter);
        self
    }

    /// Sets the notifier that receives attempt outcomes.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Runs a password login attempt from raw form input.
    ///
    /// Validation happens first; a credential that fails a rule is
    /// returned to the form without marking the controller busy or
    /// touching the network.
    #[instrument(skip(self, password))]
    pub async fn login_with_password(&self, email: &str, password: &str) -> Result<(), LoginError> {
        let credential = Credential::email_password(email, password)?;
        let _attempt = self.begin_attempt()?;
        let outcome = self
            .exchange
            .exchange(credential)
            .await
            .map_err(LoginError::from);
        self.settle(outcome).await
    }

    /// Runs a social login attempt through the adapter registered for
    /// `provider`.
    ///
    /// The adapter's ceremony completes before the backend is called;
    /// a provider failure aborts the attempt without a network call.
    #[instrument(skip(self))]
    pub async fn login_with_provider(&self, provider: Provider) -> Result<(), LoginError> {
        let adapter = self
            .adapters
            .get(&provider)
            .cloned()
            .ok_or(LoginError::AdapterMissing { provider })?;
        let _attempt = self.begin_attempt()?;
        let outcome = match adapter.acquire().await {
            Ok(token) => {
                let credential = Credential::provider_token(provider, token);
                self.exchange
                    .exchange(credential)
                    .await
                    .map_err(LoginError::from)
            }
            Err(e) => Err(LoginError::Provider(e)),
        };
        self.settle(outcome).await
    }

    /// Logs out: clears the session and its durable mirror.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        self.store.reset().await;
        debug!("session cleared");
    }

    /// Reports whether an attempt is currently in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Claims the single-flight slot, refusing if an attempt already
    /// holds it. The returned guard releases the slot when dropped, on
    /// every exit path of the attempt.
    fn begin_attempt(&self) -> Result<AttemptGuard<'_>, LoginError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(LoginError::AttemptInProgress);
        }
        Ok(AttemptGuard { busy: &self.busy })
    }

    /// Commits a resolved attempt and reports it.
    ///
    /// Only a successful outcome touches the store.
    async fn settle(&self, outcome: Result<SessionGrant, LoginError>) -> Result<(), LoginError> {
        match outcome {
            Ok(grant) => {
                self.store.set_session(grant).await;
                debug!("login attempt succeeded");
                self.notify(AttemptNotice::success(LOGIN_SUCCESS_MESSAGE));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "login attempt failed");
                self.notify(AttemptNotice::error(e.to_string()));
                Err(e)
            }
        }
    }

    fn notify(&self, notice: AttemptNotice) {
        if let Some(notifier) = &self.notifier {
            notifier.notify(notice);
        }
    }
}

struct AttemptGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}
