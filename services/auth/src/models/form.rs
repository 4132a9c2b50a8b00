//! Form payloads submitted by the sign-up and sign-in pages

/// Sign-up form contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub terms_accepted: bool,
}

impl SignUpForm {
    /// Clear every field
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Sign-in form contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

impl SignInForm {
    /// Clear every field
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
