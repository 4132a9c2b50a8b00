//! Storefront account and session core
//!
//! Registration, sign-in and session tracking for the storefront pages,
//! persisted in a local key-value store. Pages drive [`AuthService`]; the
//! service reports through a [`ui::Notifier`] and redirects through a
//! [`ui::Navigator`].

pub mod clock;
pub mod config;
pub mod error;
pub mod flows;
pub mod header;
pub mod models;
pub mod password;
pub mod repositories;
pub mod service;
pub mod session;
pub mod slots;
pub mod ui;
pub mod validation;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use service::{AuthService, SocialProvider};
