//! Form submission flows

pub mod registration;
pub mod sign_in;

pub use registration::{RegistrationFlow, RegistrationState};
pub use sign_in::{SignInFlow, SignInState};
