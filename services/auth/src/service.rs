//! Authentication service shared by the storefront pages

use std::sync::{Arc, Mutex};

use common::KeyValueStore;
use tracing::{error, info};

use crate::clock::Clock;
use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::flows::{RegistrationFlow, RegistrationState, SignInFlow, SignInState};
use crate::header::HeaderView;
use crate::models::{CurrentUserView, SignInForm, SignUpForm};
use crate::password::{CredentialHasher, hasher_for};
use crate::repositories::AccountStore;
use crate::session::SessionManager;
use crate::slots::TypedStore;
use crate::ui::{Destination, NavigationScheduler, Navigator, NotificationKind, Notifier};

/// Third-party identity providers offered on the sign-in and sign-up pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialProvider {
    Google,
}

impl SocialProvider {
    pub fn display_name(&self) -> &'static str {
        match self {
            SocialProvider::Google => "Google",
        }
    }
}

/// Account and session operations wired to their collaborators
///
/// Clones share the store and the page's sign-up and sign-in flows.
#[derive(Clone)]
pub struct AuthService {
    pub(crate) config: AuthConfig,
    pub(crate) accounts: AccountStore,
    pub(crate) sessions: SessionManager,
    pub(crate) hasher: Arc<dyn CredentialHasher>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) scheduler: NavigationScheduler,
    registration: Arc<Mutex<RegistrationFlow>>,
    sign_in_flow: Arc<Mutex<SignInFlow>>,
}

impl AuthService {
    /// Create a new authentication service
    ///
    /// The credential encoder follows `config.password_scheme`.
    pub fn new(
        config: AuthConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let hasher = hasher_for(config.password_scheme);
        Self::with_hasher(config, store, clock, notifier, navigator, hasher)
    }

    /// Create a new authentication service with an explicit credential encoder
    pub fn with_hasher(
        config: AuthConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        let typed = TypedStore::new(store, config.keys.clone());
        let accounts = AccountStore::new(typed.clone());
        let sessions = SessionManager::new(typed, Arc::clone(&clock), config.session_lifetime());

        Self {
            config,
            accounts,
            sessions,
            hasher,
            clock,
            notifier,
            scheduler: NavigationScheduler::new(navigator),
            registration: Arc::new(Mutex::new(RegistrationFlow::new())),
            sign_in_flow: Arc::new(Mutex::new(SignInFlow::new())),
        }
    }

    /// Prepare storage on page load
    pub fn initialize(&self) -> AuthResult<()> {
        self.accounts.initialize()
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn scheduler(&self) -> &NavigationScheduler {
        &self.scheduler
    }

    /// Submit the sign-up form
    pub fn sign_up(&self, form: &mut SignUpForm) -> AuthResult<RegistrationState> {
        let mut flow = self
            .registration
            .lock()
            .map_err(|_| AuthError::LockPoisoned)?;
        flow.submit(self, form).cloned()
    }

    /// Current state of the sign-up page
    pub fn registration_state(&self) -> AuthResult<RegistrationState> {
        let flow = self
            .registration
            .lock()
            .map_err(|_| AuthError::LockPoisoned)?;
        Ok(flow.state().clone())
    }

    /// Submit the sign-in form
    pub fn sign_in(&self, form: &mut SignInForm) -> AuthResult<SignInState> {
        let mut flow = self
            .sign_in_flow
            .lock()
            .map_err(|_| AuthError::LockPoisoned)?;
        flow.submit(self, form).cloned()
    }

    /// Current state of the sign-in page
    pub fn sign_in_state(&self) -> AuthResult<SignInState> {
        let flow = self
            .sign_in_flow
            .lock()
            .map_err(|_| AuthError::LockPoisoned)?;
        Ok(flow.state().clone())
    }

    /// End the session and return to the landing page
    ///
    /// Safe to call without an active session.
    pub fn logout(&self) -> AuthResult<()> {
        self.scheduler.cancel();
        self.sessions.end_session()?;

        self.notifier
            .notify("Logged out successfully!", NotificationKind::Success);
        self.scheduler
            .schedule(Destination::Index, self.config.logout_redirect_delay);

        Ok(())
    }

    /// The signed-in user, if any
    pub fn current_user(&self) -> AuthResult<Option<CurrentUserView>> {
        self.sessions.current_user()
    }

    /// Whether an unexpired session exists
    pub fn is_authenticated(&self) -> bool {
        self.sessions.is_authenticated()
    }

    /// Header account region for the current session
    ///
    /// Storage failures render the signed-out header.
    pub fn header(&self) -> HeaderView {
        match self.sessions.current_user() {
            Ok(user) => HeaderView::for_user(user.as_ref()),
            Err(e) => {
                error!("Failed to read current user: {}", e);
                HeaderView::SignedOut
            }
        }
    }

    /// Sign-in form as it should appear when the page loads
    pub fn sign_in_prefill(&self) -> AuthResult<SignInForm> {
        let remembered = self.sessions.remembered_email()?;
        Ok(SignInForm {
            remember_me: remembered.is_some(),
            email: remembered.unwrap_or_default(),
            password: String::new(),
        })
    }

    /// Social sign-in is not available yet; tell the user so
    pub fn request_social_sign_in(&self, provider: SocialProvider) {
        info!("Social sign-in requested: {}", provider.display_name());
        self.notifier.notify(
            &format!("{} authentication coming soon!", provider.display_name()),
            NotificationKind::Info,
        );
    }
}
