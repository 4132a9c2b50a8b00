//! UI collaborators: notifications, navigation and delayed transitions
//!
//! The account flows never draw anything themselves. They report through a
//! [`Notifier`] and leave the page through a [`Navigator`], usually after a
//! short pause scheduled on the [`NavigationScheduler`].

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Kind of a toast notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-blocking notification presenter
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, kind: NotificationKind);
}

/// Notifier that writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Error => warn!(kind = %kind, "{}", message),
            _ => info!(kind = %kind, "{}", message),
        }
    }
}

/// Named page the flows can redirect to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    SignIn,
    SignUp,
    Index,
}

impl Destination {
    /// Page address for a full-page redirect
    pub fn path(&self) -> &'static str {
        match self {
            Destination::SignIn => "signin.html",
            Destination::SignUp => "signup.html",
            Destination::Index => "index.html",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Performs a full-page redirect
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: Destination);
}

/// Navigator that only logs the redirect
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, destination: Destination) {
        info!("Navigating to {}", destination);
    }
}

/// Holds at most one pending "navigate after delay" transition
///
/// Scheduling a new transition or calling [`cancel`](Self::cancel) aborts the
/// pending one. Outside a tokio runtime the redirect happens immediately.
#[derive(Clone)]
pub struct NavigationScheduler {
    navigator: Arc<dyn Navigator>,
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl NavigationScheduler {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self {
            navigator,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Navigate to `destination` once `delay` has elapsed
    pub fn schedule(&self, destination: Destination, delay: Duration) {
        self.cancel();

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No async runtime, navigating to {} immediately", destination);
            self.navigator.navigate(destination);
            return;
        };

        debug!("Navigating to {} in {:?}", destination, delay);
        let navigator = Arc::clone(&self.navigator);
        let task = handle.spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.navigate(destination);
        });

        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some(task);
        }
    }

    /// Abort the pending transition, if any
    pub fn cancel(&self) {
        let previous = match self.pending.lock() {
            Ok(mut pending) => pending.take(),
            Err(_) => None,
        };

        if let Some(task) = previous {
            if !task.is_finished() {
                debug!("Cancelling pending navigation");
            }
            task.abort();
        }
    }

    /// Whether a transition is scheduled and has not fired yet
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .map(|p| p.as_ref().is_some_and(|t| !t.is_finished()))
            .unwrap_or(false)
    }
}
