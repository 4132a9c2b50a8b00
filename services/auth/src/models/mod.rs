//! Authentication service models

pub mod form;
pub mod session;
pub mod user;

// Re-export for convenience
pub use form::{SignInForm, SignUpForm};
pub use session::{CurrentUserView, SessionToken};
pub use user::{NewUser, UserRecord};
