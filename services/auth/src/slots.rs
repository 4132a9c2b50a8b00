//! Typed storage slots
//!
//! Each persisted value lives under its own key with its own schema. A slot
//! ties the configured key to the value type and to the way that value is
//! encoded in the key-value store, so callers never handle raw strings.

use std::sync::Arc;

use common::KeyValueStore;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::config::StorageKeys;
use crate::error::AuthResult;
use crate::models::{CurrentUserView, SessionToken, UserRecord};

/// A typed slot in the key-value store
pub trait StorageSlot {
    /// Value held by the slot
    type Value;

    /// Human readable slot name for logs
    const NAME: &'static str;

    /// Configured key of the slot
    fn key(keys: &StorageKeys) -> &str;

    /// Encode a value for storage
    fn encode(value: &Self::Value) -> AuthResult<String>;

    /// Decode a stored value
    fn decode(raw: &str) -> Result<Self::Value, serde_json::Error>;
}

/// JSON-encoded slots share their encoding
macro_rules! json_slot {
    ($slot:ident, $value:ty, $name:literal, $field:ident) => {
        #[doc = concat!("Slot holding the ", $name)]
        #[derive(Debug, Clone, Copy)]
        pub struct $slot;

        impl StorageSlot for $slot {
            type Value = $value;
            const NAME: &'static str = $name;

            fn key(keys: &StorageKeys) -> &str {
                &keys.$field
            }

            fn encode(value: &Self::Value) -> AuthResult<String> {
                Ok(serde_json::to_string(value)?)
            }

            fn decode(raw: &str) -> Result<Self::Value, serde_json::Error> {
                serde_json::from_str(raw)
            }
        }
    };
}

json_slot!(AccountsSlot, Vec<UserRecord>, "account collection", accounts);
json_slot!(SessionTokenSlot, SessionToken, "session token", session_token);
json_slot!(CurrentUserSlot, CurrentUserView, "current user", current_user);

/// Slot holding the remembered sign-in email, stored as a plain string
#[derive(Debug, Clone, Copy)]
pub struct RememberedEmailSlot;

impl StorageSlot for RememberedEmailSlot {
    type Value = String;
    const NAME: &'static str = "remembered email";

    fn key(keys: &StorageKeys) -> &str {
        &keys.remembered_email
    }

    fn encode(value: &Self::Value) -> AuthResult<String> {
        Ok(value.clone())
    }

    fn decode(raw: &str) -> Result<Self::Value, serde_json::Error> {
        Ok(raw.to_string())
    }
}

/// Outcome of reading a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotRead<T> {
    /// Nothing stored under the key
    Absent,
    /// A value is stored but does not match the slot schema
    Malformed,
    /// A valid value
    Present(T),
}

impl<T> SlotRead<T> {
    /// Collapse malformed values into absence
    pub fn ok(self) -> Option<T> {
        match self {
            SlotRead::Present(value) => Some(value),
            SlotRead::Absent | SlotRead::Malformed => None,
        }
    }

    /// Whether anything is stored under the key, valid or not
    pub fn is_stored(&self) -> bool {
        !matches!(self, SlotRead::Absent)
    }
}

/// Typed view over a key-value store
#[derive(Clone)]
pub struct TypedStore {
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl TypedStore {
    /// Wrap a key-value store with the configured slot keys
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    /// Read and validate a slot
    ///
    /// Parse failures are logged and reported as [`SlotRead::Malformed`];
    /// only backend failures surface as errors.
    pub fn read<S: StorageSlot>(&self) -> AuthResult<SlotRead<S::Value>> {
        let key = S::key(&self.keys);
        let Some(raw) = self.store.get_item(key)? else {
            return Ok(SlotRead::Absent);
        };

        match S::decode(&raw) {
            Ok(value) => Ok(SlotRead::Present(value)),
            Err(e) => {
                warn!("Failed to parse {} stored under {}: {}", S::NAME, key, e);
                Ok(SlotRead::Malformed)
            }
        }
    }

    /// Encode and write a slot
    pub fn write<S: StorageSlot>(&self, value: &S::Value) -> AuthResult<()> {
        let encoded = S::encode(value)?;
        self.store.set_item(S::key(&self.keys), &encoded)?;
        Ok(())
    }

    /// Remove a slot
    pub fn clear<S: StorageSlot>(&self) -> AuthResult<()> {
        self.store.remove_item(S::key(&self.keys))?;
        Ok(())
    }

    /// Configured slot keys
    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::MemoryStore;

    fn typed() -> (Arc<MemoryStore>, TypedStore) {
        let store = Arc::new(MemoryStore::new());
        let typed = TypedStore::new(store.clone(), StorageKeys::default());
        (store, typed)
    }

    #[test]
    fn test_absent_slot() {
        let (_, typed) = typed();
        assert_eq!(typed.read::<SessionTokenSlot>().unwrap(), SlotRead::Absent);
    }

    #[test]
    fn test_malformed_slot_is_reported_not_raised() {
        let (store, typed) = typed();
        store.set_item("auth_token", "{not json").unwrap();

        let read = typed.read::<SessionTokenSlot>().unwrap();
        assert_eq!(read, SlotRead::Malformed);
        assert!(read.is_stored());
    }

    #[test]
    fn test_remembered_email_is_stored_verbatim() {
        let (store, typed) = typed();
        typed
            .write::<RememberedEmailSlot>(&"jane@example.com".to_string())
            .unwrap();

        assert_eq!(
            store.get_item("remember_email").unwrap(),
            Some("jane@example.com".to_string())
        );
        assert_eq!(
            typed.read::<RememberedEmailSlot>().unwrap().ok(),
            Some("jane@example.com".to_string())
        );
    }

    #[test]
    fn test_current_user_round_trip_and_clear() {
        let (_, typed) = typed();
        let view = CurrentUserView {
            id: 7,
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
        };

        typed.write::<CurrentUserSlot>(&view).unwrap();
        assert_eq!(typed.read::<CurrentUserSlot>().unwrap().ok(), Some(view));

        typed.clear::<CurrentUserSlot>().unwrap();
        assert_eq!(typed.read::<CurrentUserSlot>().unwrap(), SlotRead::Absent);
    }
}
