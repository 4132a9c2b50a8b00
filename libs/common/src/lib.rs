//! Common library for the storefront application
//!
//! This crate provides the local key-value storage the storefront keeps its
//! state in: the store abstraction, an in-memory backend, a JSON-file
//! backend, and the shared storage error type.
//!
//! ```rust,no_run
//! use common::{FileStore, FileStoreConfig, KeyValueStore};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FileStoreConfig::from_env()?;
//!     let store = FileStore::open(&config)?;
//!     store.set_item("remember_email", "jane@example.com")?;
//!     println!("Remembered: {:?}", store.get_item("remember_email")?);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod file_store;
pub mod store;

pub use error::{StorageError, StorageResult};
pub use file_store::{FileStore, FileStoreConfig};
pub use store::{KeyValueStore, MemoryStore};

