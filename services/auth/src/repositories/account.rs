//! Account store over the local key-value store
//!
//! All accounts live in one insertion-ordered collection under a single key.
//! Every insert rewrites the whole collection with one store call.

use tracing::{error, info};

use crate::error::{AuthError, AuthResult};
use crate::models::UserRecord;
use crate::password::CredentialHasher;
use crate::slots::{AccountsSlot, SlotRead, TypedStore};

/// Account repository
#[derive(Clone)]
pub struct AccountStore {
    store: TypedStore,
}

impl AccountStore {
    /// Create a new account store
    pub fn new(store: TypedStore) -> Self {
        Self { store }
    }

    /// Persist an empty collection if none exists yet
    pub fn initialize(&self) -> AuthResult<()> {
        if let SlotRead::Absent = self.store.read::<AccountsSlot>()? {
            info!("Initializing empty account collection");
            self.store.write::<AccountsSlot>(&Vec::new())?;
        }
        Ok(())
    }

    /// All accounts in insertion order
    ///
    /// A missing or malformed collection reads as empty.
    pub fn list_all(&self) -> AuthResult<Vec<UserRecord>> {
        Ok(self.store.read::<AccountsSlot>()?.ok().unwrap_or_default())
    }

    /// Append an account and persist the whole collection
    ///
    /// A malformed collection is never overwritten: the insert fails and the
    /// stored value is left as it was.
    pub fn insert(&self, record: UserRecord) -> AuthResult<()> {
        info!("Creating new user: {}", record.email);

        let mut users = match self.store.read::<AccountsSlot>()? {
            SlotRead::Present(users) => users,
            SlotRead::Absent => Vec::new(),
            SlotRead::Malformed => {
                let key = self.store.keys().accounts.clone();
                error!("Refusing to overwrite malformed account collection under {}", key);
                return Err(AuthError::CorruptCollection(key));
            }
        };
        users.push(record);
        self.store.write::<AccountsSlot>(&users)?;

        Ok(())
    }

    /// Find the first account with exactly this email
    pub fn find_by_email(&self, email: &str) -> AuthResult<Option<UserRecord>> {
        info!("Finding user by email: {}", email);

        let users = self.list_all()?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    /// Whether an account with exactly this email exists
    pub fn email_exists(&self, email: &str) -> AuthResult<bool> {
        Ok(self.list_all()?.iter().any(|u| u.email == email))
    }

    /// Find the first account whose email matches and whose credential verifies
    pub fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
        hasher: &dyn CredentialHasher,
    ) -> AuthResult<Option<UserRecord>> {
        let users = self.list_all()?;
        Ok(users
            .into_iter()
            .find(|u| u.email == email && hasher.verify(password, &u.password_hash)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageKeys;
    use crate::password::Base64Encoder;
    use chrono::{TimeZone, Utc};
    use common::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    fn account_store() -> (Arc<MemoryStore>, AccountStore) {
        let store = Arc::new(MemoryStore::new());
        let typed = TypedStore::new(store.clone(), StorageKeys::default());
        (store, AccountStore::new(typed))
    }

    fn record(id: i64, email: &str, password: &str) -> UserRecord {
        UserRecord {
            id,
            name: format!("User {}", id),
            email: email.to_string(),
            password_hash: Base64Encoder.encode(password).unwrap(),
            created_at: Utc.timestamp_millis_opt(id).unwrap(),
        }
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (store, accounts) = account_store();

        accounts.initialize().unwrap();
        assert_eq!(
            store.get_item("ecommerce_users").unwrap(),
            Some("[]".to_string())
        );

        accounts.insert(record(1, "a@example.com", "password1")).unwrap();
        accounts.initialize().unwrap();
        assert_eq!(accounts.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_list_all_uninitialized_is_empty() {
        let (_, accounts) = account_store();
        assert!(accounts.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_insert_preserves_order_and_fields() {
        let (_, accounts) = account_store();
        let first = record(1_700_000_000_000, "a@example.com", "password1");
        let second = record(1_700_000_000_001, "b@example.com", "password2");

        accounts.insert(first.clone()).unwrap();
        accounts.insert(second.clone()).unwrap();

        assert_eq!(accounts.list_all().unwrap(), vec![first, second]);
    }

    #[test]
    fn test_malformed_collection_reads_as_empty() {
        let (store, accounts) = account_store();
        store.set_item("ecommerce_users", "{\"broken\"").unwrap();

        assert!(accounts.list_all().unwrap().is_empty());
        assert!(!accounts.email_exists("a@example.com").unwrap());
    }

    #[test]
    fn test_insert_keeps_malformed_collection() {
        let (store, accounts) = account_store();
        // One record lacks createdAt, so the whole collection fails to decode
        let stored = r#"[{"id":1,"name":"J","email":"j@example.com","password":"cGFzc3dvcmQx","createdAt":"2024-06-01T10:00:00.000Z"},{"id":2,"name":"K","email":"k@example.com","password":"cGFzc3dvcmQy"}]"#;
        store.set_item("ecommerce_users", stored).unwrap();

        let result = accounts.insert(record(3, "n@example.com", "password3"));

        assert!(matches!(result, Err(AuthError::CorruptCollection(key)) if key == "ecommerce_users"));
        assert_eq!(
            store.get_item("ecommerce_users").unwrap(),
            Some(stored.to_string())
        );
    }

    #[test]
    fn test_email_match_is_exact() {
        let (_, accounts) = account_store();
        accounts.insert(record(1, "Jane@Example.com", "password1")).unwrap();

        assert!(accounts.email_exists("Jane@Example.com").unwrap());
        assert!(!accounts.email_exists("jane@example.com").unwrap());
        assert!(accounts.find_by_email("jane@example.com").unwrap().is_none());
    }

    #[test]
    fn test_find_by_credentials() {
        let (_, accounts) = account_store();
        accounts.insert(record(1, "a@example.com", "password1")).unwrap();

        let hasher = Base64Encoder;
        let found = accounts
            .find_by_credentials("a@example.com", "password1", &hasher)
            .unwrap();
        assert_eq!(found.map(|u| u.id), Some(1));

        assert!(
            accounts
                .find_by_credentials("a@example.com", "password2", &hasher)
                .unwrap()
                .is_none()
        );
        assert!(
            accounts
                .find_by_credentials("b@example.com", "password1", &hasher)
                .unwrap()
                .is_none()
        );
    }
}
