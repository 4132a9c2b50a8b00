//! Session management over the local key-value store

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::clock::Clock;
use crate::error::AuthResult;
use crate::models::{CurrentUserView, SessionToken, UserRecord};
use crate::slots::{
    CurrentUserSlot, RememberedEmailSlot, SessionTokenSlot, SlotRead, TypedStore,
};

/// Session manager for issuing and checking the signed-in session
///
/// The token and the current-user view are written and cleared together.
/// Expiry is lazy: an expired token stays stored until logout and is only
/// rejected when queried.
#[derive(Clone)]
pub struct SessionManager {
    store: TypedStore,
    clock: Arc<dyn Clock>,
    lifetime: chrono::Duration,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(store: TypedStore, clock: Arc<dyn Clock>, lifetime: chrono::Duration) -> Self {
        Self {
            store,
            clock,
            lifetime,
        }
    }

    /// Issue and persist a session for a user
    ///
    /// The view is written before the token, and the token gates the view, so
    /// a failed write never leaves a token without its view.
    pub fn issue(&self, user: &UserRecord) -> AuthResult<SessionToken> {
        info!("Creating session for user: {}", user.id);

        let token = SessionToken::issue(user, self.clock.now(), self.lifetime);
        self.store
            .write::<CurrentUserSlot>(&CurrentUserView::from(user))?;

        if let Err(e) = self.store.write::<SessionTokenSlot>(&token) {
            error!("Failed to store session token: {}", e);
            if let Err(cleanup) = self.store.clear::<CurrentUserSlot>() {
                warn!("Failed to clear current user after token write: {}", cleanup);
            }
            return Err(e);
        }

        Ok(token)
    }

    /// The signed-in user, if a session token is stored
    pub fn current_user(&self) -> AuthResult<Option<CurrentUserView>> {
        if !self.store.read::<SessionTokenSlot>()?.is_stored() {
            return Ok(None);
        }

        match self.store.read::<CurrentUserSlot>()? {
            SlotRead::Present(view) => Ok(Some(view)),
            SlotRead::Absent | SlotRead::Malformed => {
                error!("Session token present without a readable current user");
                Ok(None)
            }
        }
    }

    /// Whether a stored, parsable, unexpired token exists
    ///
    /// Backend and parse failures both read as signed out.
    pub fn is_authenticated(&self) -> bool {
        match self.store.read::<SessionTokenSlot>() {
            Ok(SlotRead::Present(token)) => token.is_valid_at(self.clock.now()),
            Ok(_) => false,
            Err(e) => {
                error!("Failed to read session token: {}", e);
                false
            }
        }
    }

    /// Clear token, current user and remembered email
    pub fn end_session(&self) -> AuthResult<()> {
        info!("Deleting session");

        self.store.clear::<SessionTokenSlot>()?;
        self.store.clear::<CurrentUserSlot>()?;
        self.store.clear::<RememberedEmailSlot>()?;

        Ok(())
    }

    /// The email remembered from the last "remember me" sign-in
    pub fn remembered_email(&self) -> AuthResult<Option<String>> {
        Ok(self
            .store
            .read::<RememberedEmailSlot>()?
            .ok()
            .filter(|email| !email.is_empty()))
    }

    /// Remember or forget the sign-in email
    pub fn remember_email(&self, email: Option<&str>) -> AuthResult<()> {
        match email {
            Some(email) => self
                .store
                .write::<RememberedEmailSlot>(&email.to_string()),
            None => self.store.clear::<RememberedEmailSlot>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::StorageKeys;
    use chrono::{Duration, TimeZone, Utc};
    use common::{KeyValueStore, MemoryStore, StorageError, StorageResult};

    /// Memory store whose writes to one key always fail
    struct FailingWrites {
        inner: MemoryStore,
        key: &'static str,
    }

    impl KeyValueStore for FailingWrites {
        fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
            if key == self.key {
                return Err(StorageError::LockPoisoned);
            }
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> StorageResult<()> {
            self.inner.remove_item(key)
        }
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
        sessions: SessionManager,
    }

    fn failing_sessions(key: &'static str) -> (Arc<FailingWrites>, SessionManager) {
        let store = Arc::new(FailingWrites {
            inner: MemoryStore::new(),
            key,
        });
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        ));
        let typed = TypedStore::new(store.clone(), StorageKeys::default());
        (store, SessionManager::new(typed, clock, Duration::days(7)))
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        ));
        let typed = TypedStore::new(store.clone(), StorageKeys::default());
        let sessions = SessionManager::new(typed, clock.clone(), Duration::days(7));
        Fixture {
            store,
            clock,
            sessions,
        }
    }

    fn user() -> UserRecord {
        UserRecord {
            id: 1709283600000,
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: "cGFzc3dvcmQxMjM=".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_no_session() {
        let f = fixture();
        assert_eq!(f.sessions.current_user().unwrap(), None);
        assert!(!f.sessions.is_authenticated());
    }

    #[test]
    fn test_issue_then_expire() {
        let f = fixture();
        let token = f.sessions.issue(&user()).unwrap();

        assert_eq!(token.expires_at - token.issued_at, Duration::days(7));
        assert!(f.sessions.is_authenticated());
        assert_eq!(
            f.sessions.current_user().unwrap().map(|u| u.email),
            Some("jane@example.com".to_string())
        );

        f.clock.advance(Duration::days(7) - Duration::seconds(1));
        assert!(f.sessions.is_authenticated());

        f.clock.advance(Duration::seconds(1));
        assert!(!f.sessions.is_authenticated());
    }

    #[test]
    fn test_unparsable_token_fails_closed() {
        let f = fixture();
        f.sessions.issue(&user()).unwrap();
        f.store.set_item("auth_token", "garbage").unwrap();

        assert!(!f.sessions.is_authenticated());
        // Only token presence gates the current user
        assert!(f.sessions.current_user().unwrap().is_some());
    }

    #[test]
    fn test_missing_view_is_inconsistent() {
        let f = fixture();
        f.sessions.issue(&user()).unwrap();
        f.store.remove_item("currentUser").unwrap();

        assert_eq!(f.sessions.current_user().unwrap(), None);

        f.store.set_item("currentUser", "{\"id\":").unwrap();
        assert_eq!(f.sessions.current_user().unwrap(), None);
    }

    #[test]
    fn test_failed_token_write_leaves_no_session() {
        let (store, sessions) = failing_sessions("auth_token");

        assert!(sessions.issue(&user()).is_err());
        assert!(!sessions.is_authenticated());
        assert_eq!(sessions.current_user().unwrap(), None);
        assert_eq!(store.get_item("currentUser").unwrap(), None);
    }

    #[test]
    fn test_failed_view_write_leaves_no_token() {
        let (store, sessions) = failing_sessions("currentUser");

        assert!(sessions.issue(&user()).is_err());
        assert!(!sessions.is_authenticated());
        assert_eq!(store.get_item("auth_token").unwrap(), None);
    }

    #[test]
    fn test_end_session_is_idempotent() {
        let f = fixture();
        f.sessions.issue(&user()).unwrap();
        f.sessions.remember_email(Some("jane@example.com")).unwrap();

        f.sessions.end_session().unwrap();
        f.sessions.end_session().unwrap();

        assert_eq!(f.sessions.current_user().unwrap(), None);
        assert_eq!(f.sessions.remembered_email().unwrap(), None);
        assert!(f.store.is_empty());
    }

    #[test]
    fn test_remember_email() {
        let f = fixture();
        f.sessions.remember_email(Some("jane@example.com")).unwrap();
        assert_eq!(
            f.sessions.remembered_email().unwrap(),
            Some("jane@example.com".to_string())
        );

        f.sessions.remember_email(None).unwrap();
        assert_eq!(f.sessions.remembered_email().unwrap(), None);
    }
}
