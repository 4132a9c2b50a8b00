//! Sign-in flow

use tracing::{debug, info, warn};

use crate::error::AuthResult;
use crate::models::{SessionToken, SignInForm};
use crate::service::AuthService;
use crate::ui::{Destination, NotificationKind, Notifier};
use crate::validation::{Field, FieldError, validate_sign_in};

/// State of a sign-in submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInState {
    CollectingInput,
    Validating,
    Rejected(Vec<FieldError>),
    Authenticated(SessionToken),
}

/// Sign-in state machine
#[derive(Debug, Clone)]
pub struct SignInFlow {
    state: SignInState,
}

impl Default for SignInFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl SignInFlow {
    pub fn new() -> Self {
        Self {
            state: SignInState::CollectingInput,
        }
    }

    pub fn state(&self) -> &SignInState {
        &self.state
    }

    /// Submit the form
    ///
    /// Unknown email and wrong password are indistinguishable to the caller:
    /// both yield the same message in the password slot.
    pub fn submit(
        &mut self,
        service: &AuthService,
        form: &mut SignInForm,
    ) -> AuthResult<&SignInState> {
        service.scheduler.cancel();
        self.state = SignInState::Validating;

        form.email = form.email.trim().to_string();

        let errors = validate_sign_in(form);
        if !errors.is_empty() {
            debug!("Sign-in rejected with {} field errors", errors.len());
            self.state = SignInState::Rejected(errors);
            return Ok(&self.state);
        }

        match self.authenticate(service, form) {
            Ok(Some(token)) => {
                info!("User logged in: {}", token.user_id);
                service
                    .notifier
                    .notify("Sign in successful!", NotificationKind::Success);
                form.reset();
                service
                    .scheduler
                    .schedule(Destination::Index, service.config.sign_in_redirect_delay);

                self.state = SignInState::Authenticated(token);
            }
            Ok(None) => {
                warn!("Invalid credentials for {}", form.email);
                service
                    .notifier
                    .notify("Invalid credentials!", NotificationKind::Error);
                self.state = SignInState::Rejected(vec![FieldError::new(
                    Field::SignInPassword,
                    "Invalid email or password",
                )]);
            }
            Err(e) => {
                self.state = SignInState::CollectingInput;
                return Err(e);
            }
        }

        Ok(&self.state)
    }

    fn authenticate(
        &self,
        service: &AuthService,
        form: &SignInForm,
    ) -> AuthResult<Option<SessionToken>> {
        let Some(user) = service.accounts.find_by_credentials(
            &form.email,
            &form.password,
            service.hasher.as_ref(),
        )?
        else {
            return Ok(None);
        };

        // Must precede issue: a failed write leaves no session
        if form.remember_me {
            service.sessions.remember_email(Some(&form.email))?;
        } else {
            service.sessions.remember_email(None)?;
        }

        let token = service.sessions.issue(&user)?;
        Ok(Some(token))
    }
}
