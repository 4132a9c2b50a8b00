//! Repositories over the local key-value store

pub mod account;

pub use account::AccountStore;
