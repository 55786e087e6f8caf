//! Customer session store: who is signed in, and the operations that change it.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps the whole page tree. Login/register/logout delegate to the identity
//! backend, then update local state, push a notification, and navigate to the
//! storefront root, in that order.
//!
//! DESIGN
//! ======
//! Initialization is an explicit two-phase protocol keyed on a
//! browsing-session flag: the first load of a browsing session wipes any
//! persisted session artifacts and marks the flag; later loads (reloads,
//! remounts) restore the persisted session instead.
//!
//! Every operation takes a ticket when it is issued. A completion is applied
//! only if its ticket is newer than the last applied one, so a slow response
//! for an abandoned request can never overwrite a newer result.
//!
//! ERROR HANDLING
//! ==============
//! Login/register failures are returned to the caller *and* pushed as an
//! error notification. Logout and initialization failures are logged and
//! swallowed; the session simply ends up absent.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::SessionConfig;
use crate::error::{IdentityError, SessionError};
use crate::net::identity::IdentityBackend;
use crate::net::types::{Credentials, Identity, Registration};
use crate::state::notifications::{NotificationKind, NotificationSink};
use crate::util::navigation::Navigator;
use crate::util::session_flag::SessionStorage;

const SIGNED_OUT_MESSAGE: &str = "You have been signed out.";

/// Observable session snapshot, mirrored into UI state by the app root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    /// First-load reconciliation has finished (in any branch).
    pub initialized: bool,
    /// An identity-backend call is in flight; forms disable submission.
    pub busy: bool,
    /// Message of the most recent login/register failure.
    pub last_error: Option<String>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Which branch `initialize` took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitOutcome {
    /// First load in this browsing session; persisted artifacts were cleared.
    FreshSession,
    /// A persisted session was validated and restored.
    Restored,
    /// Nothing valid was persisted (or reading it failed).
    Anonymous,
    /// A newer session operation completed while this one was waiting.
    Superseded,
}

/// Collaborators the session store delegates to.
#[derive(Clone)]
pub struct SessionDeps {
    pub backend: Rc<dyn IdentityBackend>,
    pub navigator: Rc<dyn Navigator>,
    pub storage: Rc<dyn SessionStorage>,
    pub notifier: Rc<dyn NotificationSink>,
}

#[derive(Clone, Copy, Debug)]
enum SignIn {
    Login,
    Register,
}

impl SignIn {
    fn label(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
        }
    }

    fn welcome(self, name: &str) -> String {
        match self {
            Self::Login => format!("Welcome back, {name}!"),
            Self::Register => format!("Welcome, {name}! Your account has been created."),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Ticket(u64);

type Listener = Box<dyn Fn(&SessionState)>;

/// Owner of the current session.
pub struct SessionStore {
    deps: SessionDeps,
    config: SessionConfig,
    state: RefCell<SessionState>,
    issued: Cell<u64>,
    applied: Cell<u64>,
    in_flight: Cell<u32>,
    listeners: RefCell<Vec<Listener>>,
}

impl SessionStore {
    pub fn new(deps: SessionDeps, config: SessionConfig) -> Self {
        Self {
            deps,
            config,
            state: RefCell::new(SessionState::default()),
            issued: Cell::new(0),
            applied: Cell::new(0),
            in_flight: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Call `listener` with a snapshot after every state change.
    ///
    /// Listeners must not subscribe further listeners from inside the callback.
    pub fn subscribe(&self, listener: impl Fn(&SessionState) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.get() > 0
    }

    /// First-load reconciliation for this browsing session.
    pub async fn initialize(&self) -> InitOutcome {
        let ticket = self.issue();
        let key = self.config.init_flag_key.as_str();

        let outcome = if self.deps.storage.get(key).is_none() {
            if let Err(err) = self.deps.backend.logout().await {
                tracing::warn!(error = %err, "clearing stale session artifacts failed");
            }
            self.deps.storage.set(key, "true");
            if self.claim(ticket) {
                self.update(|s| s.identity = None);
                InitOutcome::FreshSession
            } else {
                InitOutcome::Superseded
            }
        } else {
            self.restore(ticket).await
        };

        self.update(|s| s.initialized = true);
        tracing::info!(?outcome, "session initialized");
        outcome
    }

    async fn restore(&self, ticket: Ticket) -> InitOutcome {
        if !self.deps.backend.is_logged_in() {
            return InitOutcome::Anonymous;
        }
        match self.deps.backend.current_identity().await {
            Ok(Some(identity)) => {
                if !self.claim(ticket) {
                    return InitOutcome::Superseded;
                }
                tracing::debug!(customer = %identity.id, "restored persisted session");
                self.update(|s| s.identity = Some(identity));
                InitOutcome::Restored
            }
            Ok(None) => InitOutcome::Anonymous,
            Err(err) => {
                tracing::warn!(error = %err, "reading persisted session failed");
                InitOutcome::Anonymous
            }
        }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns the backend failure (also pushed as a notification), or
    /// `SessionError::Superseded` if a newer session operation already
    /// completed.
    pub async fn login(&self, credentials: &Credentials) -> Result<Identity, SessionError> {
        let ticket = self.issue();
        let _busy = InFlight::enter(self);
        let result = self.deps.backend.login(credentials).await;
        self.complete_sign_in(ticket, SignIn::Login, result)
    }

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// Same contract as [`SessionStore::login`].
    pub async fn register(&self, registration: &Registration) -> Result<Identity, SessionError> {
        let ticket = self.issue();
        let _busy = InFlight::enter(self);
        let result = self.deps.backend.register(registration).await;
        self.complete_sign_in(ticket, SignIn::Register, result)
    }

    /// Sign out. Safe to call when nobody is signed in.
    pub async fn logout(&self) {
        let ticket = self.issue();
        let _busy = InFlight::enter(self);
        if let Err(err) = self.deps.backend.logout().await {
            tracing::warn!(error = %err, "backend logout failed; clearing local session anyway");
        }
        if !self.claim(ticket) {
            tracing::debug!("discarding stale logout completion");
            return;
        }

        let had_session = self.is_authenticated();
        self.update(|s| {
            s.identity = None;
            s.last_error = None;
        });
        if had_session {
            tracing::info!("signed out");
            self.deps.notifier.notify(SIGNED_OUT_MESSAGE, NotificationKind::Info);
        }
        self.deps.navigator.navigate_to(&self.config.root_path);
    }

    fn complete_sign_in(
        &self,
        ticket: Ticket,
        op: SignIn,
        result: Result<Identity, IdentityError>,
    ) -> Result<Identity, SessionError> {
        if !self.claim(ticket) {
            tracing::debug!(op = op.label(), ok = result.is_ok(), "discarding stale session response");
            return Err(SessionError::Superseded);
        }

        match result {
            Ok(identity) => {
                let name = identity
                    .display_name()
                    .unwrap_or(&self.config.display_name_fallback)
                    .to_owned();
                self.update(|s| {
                    s.identity = Some(identity.clone());
                    s.last_error = None;
                });
                tracing::info!(op = op.label(), customer = %identity.id, "signed in");
                self.deps.notifier.notify(&op.welcome(&name), NotificationKind::Success);
                self.deps.navigator.navigate_to(&self.config.root_path);
                Ok(identity)
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(op = op.label(), error = %err, "sign-in failed");
                self.update(|s| s.last_error = Some(message.clone()));
                self.deps.notifier.notify(&message, NotificationKind::Error);
                Err(err.into())
            }
        }
    }

    fn issue(&self) -> Ticket {
        let next = self.issued.get() + 1;
        self.issued.set(next);
        Ticket(next)
    }

    /// Mark `ticket` applied if nothing newer has been; `false` means stale.
    fn claim(&self, ticket: Ticket) -> bool {
        if ticket.0 <= self.applied.get() {
            return false;
        }
        self.applied.set(ticket.0);
        true
    }

    fn update(&self, f: impl FnOnce(&mut SessionState)) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            f(&mut state);
            state.clone()
        };
        for listener in self.listeners.borrow().iter() {
            listener(&snapshot);
        }
    }
}

/// Keeps `busy` set while at least one backend call is outstanding.
struct InFlight<'a> {
    store: &'a SessionStore,
}

impl<'a> InFlight<'a> {
    fn enter(store: &'a SessionStore) -> Self {
        store.in_flight.set(store.in_flight.get() + 1);
        if !store.state.borrow().busy {
            store.update(|s| s.busy = true);
        }
        Self { store }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let remaining = self.store.in_flight.get().saturating_sub(1);
        self.store.in_flight.set(remaining);
        if remaining == 0 {
            self.store.update(|s| s.busy = false);
        }
    }
}
