//! The session store, single source of truth for "who is logged in".
//!
//! Every mutation of the session goes through this store. It owns the
//! durable token mirror and fans each change out to subscribers over a
//! broadcast channel. Mirror failures are logged at warn level and never
//! fail the mutation; the in-memory state stays authoritative.

use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

use crate::storage::TokenStore;
use crate::user::{AuthUser, SessionGrant};

/// Default capacity of the session event channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Classification of a session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No access token; nobody is logged in.
    Anonymous,
    /// An access token is present (typically restored from the durable
    /// mirror) but no user record is loaded yet. The session counts as
    /// authenticated; a profile refetch completes it via
    /// [`SessionStore::set_user`].
    PendingProfile,
    /// Access token and user record are both present.
    Authenticated,
}

/// A point-in-time snapshot of the session.
///
/// An empty `access_token` means "no session"; the durable mirror uses
/// the same convention.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    user: Option<AuthUser>,
    access_token: String,
}

impl SessionState {
    /// Returns the current user record, if one is loaded.
    #[must_use]
    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    /// Returns the current access token; empty means "no session".
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Classifies this state.
    ///
    /// The token decides whether a session exists at all; a user record
    /// without a token does not count as one.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.access_token.is_empty() {
            SessionStatus::Anonymous
        } else if self.user.is_none() {
            SessionStatus::PendingProfile
        } else {
            SessionStatus::Authenticated
        }
    }
}

// Access tokens must never reach logs through Debug output.
impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = if self.access_token.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("SessionState")
            .field("user", &self.user)
            .field("access_token", &token)
            .finish()
    }
}

/// Events broadcast after each session mutation.
///
/// Events carry no payload; subscribers read [`SessionStore::current`]
/// for the state that triggered them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A full grant was applied; user and token were replaced together.
    SessionEstablished,
    /// Only the access token changed.
    AccessTokenUpdated,
    /// The access token was removed; the user record was left in place.
    AccessTokenCleared,
    /// Only the user record changed.
    UserUpdated,
    /// The whole session was cleared.
    Reset,
}

/// Single source of truth for the current session.
///
/// Shared by every surface of the application; nothing else may hold a
/// session copy it mutates independently. All mutators notify
/// subscribers after the in-memory state has changed, and only this
/// store touches the durable mirror.
pub struct SessionStore {
    state: RwLock<SessionState>,
    mirror: Arc<dyn TokenStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    /// Creates a store with an empty session.
    #[must_use]
    pub fn new(mirror: Arc<dyn TokenStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(SessionState::default()),
            mirror,
            events,
        }
    }

    /// Creates a store and restores the access token from the durable
    /// mirror.
    ///
    /// Only the token survives a restart; the user record starts absent
    /// and the restored session reads as
    /// [`SessionStatus::PendingProfile`] until a fresh exchange or a
    /// profile refetch repopulates it.
    pub async fn restore(mirror: Arc<dyn TokenStore>) -> Self {
        let store = Self::new(mirror);
        match store.mirror.load().await {
            Ok(Some(token)) => {
                store.state.write().unwrap().access_token = token;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "could not restore the access token from the mirror");
            }
        }
        store
    }

    /// Applies a successful exchange, replacing user and token together.
    ///
    /// Readers never observe the user without the matching token or vice
    /// versa. The token is mirrored durably, then subscribers are
    /// notified.
    pub async fn set_session(&self, grant: SessionGrant) {
        let (access_token, user) = grant.into_parts();
        {
            let mut state = self.state.write().unwrap();
            state.user = Some(user);
            state.access_token = access_token.clone();
        }
        self.persist(&access_token).await;
        self.publish(SessionEvent::SessionEstablished);
    }

    /// Replaces only the access token, leaving the user record in place.
    pub async fn set_access_token(&self, token: String) {
        {
            let mut state = self.state.write().unwrap();
            state.access_token = token.clone();
        }
        self.persist(&token).await;
        self.publish(SessionEvent::AccessTokenUpdated);
    }

    /// Removes the access token without touching the user record, and
    /// deletes the durable mirror entry.
    pub async fn clear_access_token(&self) {
        {
            let mut state = self.state.write().unwrap();
            state.access_token.clear();
        }
        self.unpersist().await;
        self.publish(SessionEvent::AccessTokenCleared);
    }

    /// Replaces the user record only.
    ///
    /// Completes a restored session after a profile refetch. The user
    /// record is never mirrored, so nothing durable happens here.
    pub fn set_user(&self, user: AuthUser) {
        {
            let mut state = self.state.write().unwrap();
            state.user = Some(user);
        }
        self.publish(SessionEvent::UserUpdated);
    }

    /// Clears the whole session and deletes the durable mirror entry.
    ///
    /// Idempotent; resetting an already-empty store still notifies.
    pub async fn reset(&self) {
        {
            let mut state = self.state.write().unwrap();
            *state = SessionState::default();
        }
        self.unpersist().await;
        self.publish(SessionEvent::Reset);
    }

    /// Returns a snapshot of the current state. Never blocks on I/O.
    #[must_use]
    pub fn current(&self) -> SessionState {
        self.state.read().unwrap().clone()
    }

    /// Subscribes to session events.
    ///
    /// Every mutation publishes at least one event. Receivers that fall
    /// behind the channel capacity lose the oldest events first.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    async fn persist(&self, token: &str) {
        if let Err(e) = self.mirror.save(token).await {
            tracing::warn!(
                error = %e,
                "could not mirror the access token; the session will not survive a restart"
            );
        }
    }

    async fn unpersist(&self) {
        if let Err(e) = self.mirror.clear().await {
            tracing::warn!(error = %e, "could not delete the mirrored access token");
        }
    }

    fn publish(&self, event: SessionEvent) {
        // send() returns Err when no receiver exists, which is fine
        self.events.send(event).unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FailingTokenStore, MemoryTokenStore};
    use chrono::{Duration, Utc};
    use std::collections::BTreeSet;
    use vestibule_core::AccountNo;

    fn test_user(email: &str) -> AuthUser {
        AuthUser::new(
            AccountNo::from("11855"),
            email.to_string(),
            BTreeSet::from(["user".to_string()]),
            Utc::now() + Duration::hours(1),
        )
    }

    fn test_grant(token: &str) -> SessionGrant {
        SessionGrant::new(token.to_string(), test_user("user@example.com"))
    }

    #[tokio::test]
    async fn set_session_makes_user_and_token_visible_together() {
        let store = SessionStore::new(Arc::new(MemoryTokenStore::new()));

        store.set_session(test_grant("tok123")).await;

        let state = store.current();
        assert_eq!(state.access_token(), "tok123");
        assert_eq!(state.user().expect("user present").email(), "user@example.com");
        assert_eq!(state.status(), SessionStatus::Authenticated);
    }

    #[tokio::test]
    async fn reset_clears_everything_and_is_idempotent() {
        let store = SessionStore::new(Arc::new(MemoryTokenStore::new()));
        store.set_session(test_grant("tok123")).await;

        store.reset().await;
        store.reset().await;

        let state = store.current();
        assert!(state.user().is_none());
        assert_eq!(state.access_token(), "");
        assert_eq!(state.status(), SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn token_round_trips_through_the_mirror_but_the_user_does_not() {
        let mirror = Arc::new(MemoryTokenStore::new());

        let store = SessionStore::new(mirror.clone());
        store.set_session(test_grant("tok123")).await;
        drop(store);

        let restored = SessionStore::restore(mirror).await;
        let state = restored.current();
        assert_eq!(state.access_token(), "tok123");
        assert!(state.user().is_none());
        assert_eq!(state.status(), SessionStatus::PendingProfile);
    }

    #[tokio::test]
    async fn restore_from_an_empty_mirror_is_anonymous() {
        let store = SessionStore::restore(Arc::new(MemoryTokenStore::new())).await;
        assert_eq!(store.current().status(), SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn set_access_token_leaves_the_user_in_place() {
        let store = SessionStore::new(Arc::new(MemoryTokenStore::new()));
        store.set_session(test_grant("tok123")).await;

        store.set_access_token("tok456".to_string()).await;

        let state = store.current();
        assert_eq!(state.access_token(), "tok456");
        assert!(state.user().is_some());
    }

    #[tokio::test]
    async fn clear_access_token_leaves_the_user_in_place() {
        let mirror = Arc::new(MemoryTokenStore::new());
        let store = SessionStore::new(mirror.clone());
        store.set_session(test_grant("tok123")).await;

        store.clear_access_token().await;

        let state = store.current();
        assert_eq!(state.access_token(), "");
        assert!(state.user().is_some());
        assert_eq!(mirror.load().await.expect("load"), None);
    }

    #[tokio::test]
    async fn set_user_completes_a_restored_session() {
        let mirror = Arc::new(MemoryTokenStore::new());
        mirror.save("tok123").await.expect("seed mirror");

        let store = SessionStore::restore(mirror).await;
        assert_eq!(store.current().status(), SessionStatus::PendingProfile);

        store.set_user(test_user("restored@example.com"));

        let state = store.current();
        assert_eq!(state.status(), SessionStatus::Authenticated);
        assert_eq!(state.user().expect("user present").email(), "restored@example.com");
        assert_eq!(state.access_token(), "tok123");
    }

    #[tokio::test]
    async fn subscribers_see_an_event_per_mutation() {
        let store = SessionStore::new(Arc::new(MemoryTokenStore::new()));
        let mut rx = store.subscribe();

        store.set_session(test_grant("tok123")).await;
        store.set_access_token("tok456".to_string()).await;
        store.reset().await;

        assert_eq!(rx.recv().await.expect("event"), SessionEvent::SessionEstablished);
        assert_eq!(rx.recv().await.expect("event"), SessionEvent::AccessTokenUpdated);
        assert_eq!(rx.recv().await.expect("event"), SessionEvent::Reset);
    }

    #[tokio::test]
    async fn multiple_subscribers_all_receive_the_event() {
        let store = SessionStore::new(Arc::new(MemoryTokenStore::new()));
        let mut first = store.subscribe();
        let mut second = store.subscribe();
        assert_eq!(store.subscriber_count(), 2);

        store.set_session(test_grant("tok123")).await;

        assert_eq!(first.recv().await.expect("event"), SessionEvent::SessionEstablished);
        assert_eq!(second.recv().await.expect("event"), SessionEvent::SessionEstablished);
    }

    #[tokio::test]
    async fn mirror_failure_does_not_lose_the_in_memory_session() {
        let store = SessionStore::new(Arc::new(FailingTokenStore::new()));

        store.set_session(test_grant("tok123")).await;

        let state = store.current();
        assert_eq!(state.access_token(), "tok123");
        assert_eq!(state.status(), SessionStatus::Authenticated);
    }

    #[test]
    fn state_debug_output_redacts_the_token() {
        let mut state = SessionState::default();
        state.access_token = "tok-secret".to_string();
        let rendered = format!("{state:?}");
        assert!(!rendered.contains("tok-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
