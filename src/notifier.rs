//! Reactive notification handle shared through Leptos context.
//!
//! SYSTEM CONTEXT
//! ==============
//! `AppProviders` provides one `Notifier`; the session store and every
//! component push through it. Each push that carries a duration schedules
//! its own dismissal timer (hydrate), so there is no path that adds an entry
//! without arranging its removal.

#[cfg(test)]
#[path = "notifier_test.rs"]
mod notifier_test;

use std::time::Duration;

use leptos::prelude::*;

use crate::config::NotificationConfig;
use crate::state::notifications::{Notification, NotificationCenter, NotificationKind, NotificationSink};
use crate::util::clock::now_ms;

/// Copyable handle over the notification list signal.
#[derive(Clone, Copy)]
pub struct Notifier {
    center: RwSignal<NotificationCenter>,
}

impl Notifier {
    pub fn new(config: &NotificationConfig) -> Self {
        Self { center: RwSignal::new(NotificationCenter::new(config)) }
    }

    /// Show `message` for `duration`; `None` or zero keeps it until dismissed.
    ///
    /// Returns the entry id, or an empty string once the owning tree is gone.
    pub fn push(&self, message: &str, kind: NotificationKind, duration: Option<Duration>) -> String {
        let now = now_ms();
        let Some(id) = self.center.try_update(|c| c.push(message, kind, duration, now)) else {
            tracing::debug!(text = message, "notification dropped after unmount");
            return String::new();
        };
        if let Some(after) = dismissal_delay(duration) {
            self.schedule_dismiss(id.clone(), after);
        }
        id
    }

    pub fn dismiss(&self, id: &str) -> bool {
        self.center.try_update(|c| c.dismiss(id)).unwrap_or(false)
    }

    pub fn clear(&self) {
        self.center.try_update(NotificationCenter::clear);
    }

    /// Visible entries, oldest first. Tracks the signal.
    pub fn items(&self) -> Vec<Notification> {
        self.center.try_with(|c| c.items().to_vec()).unwrap_or_default()
    }

    pub fn default_duration(&self) -> Duration {
        self.center
            .try_with_untracked(NotificationCenter::default_duration)
            .unwrap_or_default()
    }

    #[cfg(feature = "hydrate")]
    fn schedule_dismiss(&self, id: String, after: Duration) {
        let center = self.center;
        leptos::task::spawn_local(async move {
            gloo_timers::future::sleep(after).await;
            center.try_update(|c| c.dismiss(&id));
        });
    }

    #[cfg(not(feature = "hydrate"))]
    fn schedule_dismiss(&self, _id: String, _after: Duration) {}
}

/// Timer to arm for a push with `duration`; `None` for manual dismissal.
fn dismissal_delay(duration: Option<Duration>) -> Option<Duration> {
    duration.filter(|d| !d.is_zero())
}

impl NotificationSink for Notifier {
    fn notify(&self, message: &str, kind: NotificationKind) -> String {
        self.push(message, kind, Some(self.default_duration()))
    }
}
