//! Native composition root wiring session, loading, and notifications.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser uses `app::AppProviders`, which holds the same components in
//! Leptos signals. `AppContext` is the equivalent for hosts without a reactive
//! runtime (server render, integration tests): it owns each component,
//! connects the session store to the notification list through
//! `NotificationSink`, and lets the host drive routes and time explicitly.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::StorefrontConfig;
use crate::net::identity::IdentityBackend;
use crate::state::loading::{LoadingCoordinator, LoadingState, RouteTransition};
use crate::state::notifications::{Notification, NotificationCenter, NotificationKind, NotificationSink};
use crate::state::session::{SessionDeps, SessionStore};
use crate::util::clock::Clock;
use crate::util::navigation::{Navigator, RouteTarget};
use crate::util::session_flag::SessionStorage;

/// External collaborators supplied by the host.
#[derive(Clone)]
pub struct Collaborators {
    pub backend: Rc<dyn IdentityBackend>,
    pub navigator: Rc<dyn Navigator>,
    pub storage: Rc<dyn SessionStorage>,
    pub clock: Rc<dyn Clock>,
}

/// Notification list shared between producers and the host.
#[derive(Clone)]
pub struct SharedNotifications {
    center: Rc<RefCell<NotificationCenter>>,
    clock: Rc<dyn Clock>,
}

impl NotificationSink for SharedNotifications {
    fn notify(&self, message: &str, kind: NotificationKind) -> String {
        let now = self.clock.now_ms();
        self.center.borrow_mut().push_default(message, kind, now)
    }
}

/// Owns the three orchestration components for one mounted page tree.
pub struct AppContext {
    session: Rc<SessionStore>,
    notifications: SharedNotifications,
    loading: RefCell<LoadingCoordinator>,
    watch_query: bool,
    navigator: Rc<dyn Navigator>,
    clock: Rc<dyn Clock>,
}

impl AppContext {
    pub fn new(config: &StorefrontConfig, collaborators: Collaborators) -> Self {
        let Collaborators { backend, navigator, storage, clock } = collaborators;
        let notifications = SharedNotifications {
            center: Rc::new(RefCell::new(NotificationCenter::new(&config.notifications))),
            clock: Rc::clone(&clock),
        };
        let deps = SessionDeps {
            backend,
            navigator: Rc::clone(&navigator),
            storage,
            notifier: Rc::new(notifications.clone()),
        };

        Self {
            session: Rc::new(SessionStore::new(deps, config.session.clone())),
            notifications,
            loading: RefCell::new(LoadingCoordinator::new(&config.loading)),
            watch_query: config.loading.watch_query,
            navigator,
            clock,
        }
    }

    /// Establish the initial route, then run session initialization.
    ///
    /// Route observation starts here, never before, so the first target is a
    /// baseline rather than a transition.
    pub async fn mount(&self) {
        self.sync_route();
        self.session.initialize().await;
    }

    /// Feed the navigator's current target to the loading coordinator.
    pub fn sync_route(&self) -> RouteTransition {
        let query = self.watch_query.then(|| self.navigator.current_query());
        let target = RouteTarget::new(self.navigator.current_path(), query);
        self.loading.borrow_mut().observe(target, self.clock.now_ms())
    }

    /// Advance timers: end the loader and expire notifications that are due.
    pub fn tick(&self) {
        let now = self.clock.now_ms();
        self.loading.borrow_mut().tick(now);
        self.notifications.center.borrow_mut().expire(now);
    }

    /// Unmount: cancel the loader and drop pending notifications.
    pub fn teardown(&self) {
        self.loading.borrow_mut().cancel();
        self.notifications.center.borrow_mut().clear();
    }

    pub fn session(&self) -> Rc<SessionStore> {
        Rc::clone(&self.session)
    }

    pub fn loading(&self) -> LoadingState {
        self.loading.borrow().state()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.center.borrow().items().to_vec()
    }

    pub fn notifier(&self) -> Rc<dyn NotificationSink> {
        Rc::new(self.notifications.clone())
    }

    pub fn dismiss(&self, id: &str) -> bool {
        self.notifications.center.borrow_mut().dismiss(id)
    }

    /// Earliest time the host should call [`AppContext::tick`] again.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        let loading = self.loading.borrow().deadline_ms();
        let notify = self.notifications.center.borrow().next_deadline_ms();
        match (loading, notify) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
