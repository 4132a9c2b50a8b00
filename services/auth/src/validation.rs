//! Input validation utilities

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::models::{SignInForm, SignUpForm};

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Form field that owns an inline error slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    SignUpName,
    SignUpEmail,
    SignUpPassword,
    SignUpConfirmPassword,
    SignUpTerms,
    SignInEmail,
    SignInPassword,
}

impl Field {
    /// Id of the element that displays this field's error
    pub fn slot_id(&self) -> &'static str {
        match self {
            Field::SignUpName => "name-error",
            Field::SignUpEmail => "signup-email-error",
            Field::SignUpPassword => "signup-password-error",
            Field::SignUpConfirmPassword => "confirm-error",
            Field::SignUpTerms => "terms-error",
            Field::SignInEmail => "email-error",
            Field::SignInPassword => "password-error",
        }
    }
}

/// Inline error reported next to a form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.slot_id(), self.message)
    }
}

/// Validate email shape: local part, `@`, domain, `.`, tld, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
    });

    regex.is_match(email)
}

/// Validate password length
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

/// Score a password from 0 to 5
///
/// One point each for: at least 8 characters, at least 12 characters, an
/// ASCII uppercase letter, an ASCII digit, a character outside `[A-Za-z0-9]`.
pub fn password_strength(password: &str) -> u8 {
    let length = password.chars().count();
    let mut strength = 0;

    if length >= 8 {
        strength += 1;
    }
    if length >= 12 {
        strength += 1;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        strength += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        strength += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        strength += 1;
    }

    strength
}

/// Coarse strength bucket shown under the sign-up password field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthLevel {
    Weak,
    Medium,
    Strong,
}

impl StrengthLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0 | 1 => StrengthLevel::Weak,
            2 | 3 => StrengthLevel::Medium,
            _ => StrengthLevel::Strong,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StrengthLevel::Weak => "Weak password",
            StrengthLevel::Medium => "Medium password",
            StrengthLevel::Strong => "Strong password",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            StrengthLevel::Weak => "#e74c3c",
            StrengthLevel::Medium => "#f39c12",
            StrengthLevel::Strong => "#27ae60",
        }
    }
}

/// State of the password strength indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrengthMeter {
    pub score: u8,
    pub level: StrengthLevel,
    /// Bar width in percent
    pub percentage: u8,
}

impl StrengthMeter {
    pub fn measure(password: &str) -> Self {
        let score = password_strength(password);
        Self {
            score,
            level: StrengthLevel::from_score(score),
            percentage: score * 20,
        }
    }
}

/// Validate a sign-up form
///
/// Every check runs so that all offending fields are reported together.
pub fn validate_sign_up(form: &SignUpForm) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if form.name.is_empty() {
        errors.push(FieldError::new(
            Field::SignUpName,
            "Please enter your full name",
        ));
    }

    if !is_valid_email(&form.email) {
        errors.push(FieldError::new(
            Field::SignUpEmail,
            "Please enter a valid email address",
        ));
    }

    if !is_valid_password(&form.password) {
        errors.push(FieldError::new(
            Field::SignUpPassword,
            "Password must be at least 8 characters",
        ));
    }

    if form.password != form.confirm_password {
        errors.push(FieldError::new(
            Field::SignUpConfirmPassword,
            "Passwords do not match",
        ));
    }

    if !form.terms_accepted {
        errors.push(FieldError::new(
            Field::SignUpTerms,
            "Please accept the terms and conditions",
        ));
    }

    errors
}

/// Validate a sign-in form; both fields are checked independently
pub fn validate_sign_in(form: &SignInForm) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if !is_valid_email(&form.email) {
        errors.push(FieldError::new(
            Field::SignInEmail,
            "Please enter a valid email address",
        ));
    }

    if form.password.is_empty() {
        errors.push(FieldError::new(
            Field::SignInPassword,
            "Please enter your password",
        ));
    }

    errors
}
