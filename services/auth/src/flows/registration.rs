//! Sign-up flow

use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::AuthResult;
use crate::models::{NewUser, SignUpForm, UserRecord};
use crate::password::CredentialHasher;
use crate::service::AuthService;
use crate::ui::{Destination, NotificationKind, Notifier};
use crate::validation::{Field, FieldError, validate_sign_up};

/// State of a sign-up submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationState {
    CollectingInput,
    Validating,
    Rejected(Vec<FieldError>),
    Accepted(UserRecord),
}

/// Sign-up state machine
#[derive(Debug, Clone)]
pub struct RegistrationFlow {
    state: RegistrationState,
}

impl Default for RegistrationFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationFlow {
    pub fn new() -> Self {
        Self {
            state: RegistrationState::CollectingInput,
        }
    }

    pub fn state(&self) -> &RegistrationState {
        &self.state
    }

    /// Submit the form
    ///
    /// Rejections leave the store untouched. On acceptance the account is
    /// stored, the form is reset and a redirect to sign-in is scheduled.
    pub fn submit(
        &mut self,
        service: &AuthService,
        form: &mut SignUpForm,
    ) -> AuthResult<&RegistrationState> {
        service.scheduler.cancel();
        self.state = RegistrationState::Validating;

        form.name = form.name.trim().to_string();
        form.email = form.email.trim().to_string();

        let errors = validate_sign_up(form);
        if !errors.is_empty() {
            debug!("Sign-up rejected with {} field errors", errors.len());
            self.state = RegistrationState::Rejected(errors);
            return Ok(&self.state);
        }

        let taken = match service.accounts.email_exists(&form.email) {
            Ok(taken) => taken,
            Err(e) => {
                self.state = RegistrationState::CollectingInput;
                return Err(e);
            }
        };
        if taken {
            warn!("Email already registered: {}", form.email);
            service
                .notifier
                .notify("Email already registered!", NotificationKind::Error);
            self.state = RegistrationState::Rejected(vec![FieldError::new(
                Field::SignUpEmail,
                "This email is already registered",
            )]);
            return Ok(&self.state);
        }

        let record = match self.store_account(service, form) {
            Ok(record) => record,
            Err(e) => {
                self.state = RegistrationState::CollectingInput;
                return Err(e);
            }
        };

        info!("User registered: {}", record.email);
        service
            .notifier
            .notify("Account created successfully!", NotificationKind::Success);
        form.reset();
        service.scheduler.schedule(
            Destination::SignIn,
            service.config.sign_up_redirect_delay,
        );

        self.state = RegistrationState::Accepted(record);
        Ok(&self.state)
    }

    fn store_account(&self, service: &AuthService, form: &SignUpForm) -> AuthResult<UserRecord> {
        let password_hash = service.hasher.encode(&form.password)?;
        let record = UserRecord::from_new(
            NewUser {
                name: form.name.clone(),
                email: form.email.clone(),
                password_hash,
            },
            service.clock.now(),
        );

        service.accounts.insert(record.clone())?;
        Ok(record)
    }
}
