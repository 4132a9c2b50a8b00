//! Authentication service configuration

use std::time::Duration;

use crate::error::{AuthError, AuthResult};

/// Storage keys for the persisted slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// Key of the account collection
    pub accounts: String,
    /// Key of the session token
    pub session_token: String,
    /// Key of the denormalized current user
    pub current_user: String,
    /// Key of the remembered sign-in email
    pub remembered_email: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            accounts: "ecommerce_users".to_string(),
            session_token: "auth_token".to_string(),
            current_user: "currentUser".to_string(),
            remembered_email: "remember_email".to_string(),
        }
    }
}

/// Credential encoding scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordScheme {
    /// Reversible Base64 encoding, compatible with existing stores
    #[default]
    Base64,
    /// Salted Argon2id hashing
    Argon2,
}

impl std::str::FromStr for PasswordScheme {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base64" => Ok(PasswordScheme::Base64),
            "argon2" => Ok(PasswordScheme::Argon2),
            other => Err(AuthError::Configuration(format!(
                "Unknown password scheme: {}",
                other
            ))),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Storage keys for each persisted slot
    pub keys: StorageKeys,
    /// Session lifetime in seconds (default: 7 days)
    pub session_ttl: u64,
    /// Pause between a successful sign-up and the redirect to sign-in
    pub sign_up_redirect_delay: Duration,
    /// Pause between a successful sign-in and the redirect to the landing page
    pub sign_in_redirect_delay: Duration,
    /// Pause between logout and the redirect to the landing page
    pub logout_redirect_delay: Duration,
    /// Credential encoding scheme for new and verified passwords
    pub password_scheme: PasswordScheme,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            keys: StorageKeys::default(),
            session_ttl: 604800,
            sign_up_redirect_delay: Duration::from_millis(2000),
            sign_in_redirect_delay: Duration::from_millis(2000),
            logout_redirect_delay: Duration::from_millis(1500),
            password_scheme: PasswordScheme::Base64,
        }
    }
}

impl AuthConfig {
    /// Create a new AuthConfig from environment variables
    ///
    /// # Environment Variables
    /// - `AUTH_SESSION_TTL_SECONDS`: Session lifetime in seconds (default: 604800)
    /// - `AUTH_SIGNUP_REDIRECT_DELAY_MS`: Delay before redirecting after sign-up (default: 2000)
    /// - `AUTH_SIGNIN_REDIRECT_DELAY_MS`: Delay before redirecting after sign-in (default: 2000)
    /// - `AUTH_LOGOUT_REDIRECT_DELAY_MS`: Delay before redirecting after logout (default: 1500)
    /// - `AUTH_PASSWORD_SCHEME`: `base64` or `argon2` (default: base64)
    /// - `AUTH_ACCOUNTS_KEY`, `AUTH_SESSION_TOKEN_KEY`, `AUTH_CURRENT_USER_KEY`,
    ///   `AUTH_REMEMBERED_EMAIL_KEY`: Storage key overrides
    pub fn from_env() -> AuthResult<Self> {
        let defaults = AuthConfig::default();

        let session_ttl = std::env::var("AUTH_SESSION_TTL_SECONDS")
            .unwrap_or_else(|_| "604800".to_string()) // 7 days
            .parse()
            .unwrap_or(defaults.session_ttl);

        let sign_up_redirect_delay =
            millis_from_env("AUTH_SIGNUP_REDIRECT_DELAY_MS", defaults.sign_up_redirect_delay);
        let sign_in_redirect_delay =
            millis_from_env("AUTH_SIGNIN_REDIRECT_DELAY_MS", defaults.sign_in_redirect_delay);
        let logout_redirect_delay =
            millis_from_env("AUTH_LOGOUT_REDIRECT_DELAY_MS", defaults.logout_redirect_delay);

        let password_scheme = match std::env::var("AUTH_PASSWORD_SCHEME") {
            Ok(value) => value.parse()?,
            Err(_) => PasswordScheme::default(),
        };

        let keys = StorageKeys {
            accounts: std::env::var("AUTH_ACCOUNTS_KEY").unwrap_or(defaults.keys.accounts),
            session_token: std::env::var("AUTH_SESSION_TOKEN_KEY")
                .unwrap_or(defaults.keys.session_token),
            current_user: std::env::var("AUTH_CURRENT_USER_KEY")
                .unwrap_or(defaults.keys.current_user),
            remembered_email: std::env::var("AUTH_REMEMBERED_EMAIL_KEY")
                .unwrap_or(defaults.keys.remembered_email),
        };

        Ok(AuthConfig {
            keys,
            session_ttl,
            sign_up_redirect_delay,
            sign_in_redirect_delay,
            logout_redirect_delay,
            password_scheme,
        })
    }

    /// Session lifetime as a chrono duration
    pub fn session_lifetime(&self) -> chrono::Duration {
        let seconds = i64::try_from(self.session_ttl)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1000);
        chrono::Duration::seconds(seconds)
    }
}

fn millis_from_env(name: &str, default: Duration) -> Duration {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}
