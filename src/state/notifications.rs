//! Transient notification list ("toasts").
//!
//! DESIGN
//! ======
//! Each entry carries its own deadline, so expiry timers are independent:
//! dismissing one entry never shifts another's lifetime. Hosts either dismiss
//! by id when a per-entry timer fires (browser) or sweep with `expire(now)`.
//! Dismissing an unknown id is a no-op so a timer racing a close click is
//! harmless.
//!
//! TRADE-OFFS
//! ==========
//! The list is capped (`max_visible`) and drops the oldest entries on
//! overflow; producers such as login/logout can fire in quick succession and
//! the newest outcome is the one the user needs to read.

#[cfg(test)]
#[path = "notifications_test.rs"]
mod notifications_test;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::NotificationConfig;

/// Severity of a notification; drives styling only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    #[default]
    Info,
}

impl NotificationKind {
    /// CSS modifier for the toast element.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Success => "notification--success",
            Self::Error => "notification--error",
            Self::Info => "notification--info",
        }
    }
}

/// A single visible notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier (UUID v4 string).
    pub id: String,
    pub message: String,
    pub kind: NotificationKind,
    /// Requested lifetime; `0` means it stays until dismissed.
    pub duration_ms: u64,
    /// Absolute deadline, `None` for manual dismissal.
    pub expires_at_ms: Option<u64>,
}

/// Ordered notification list; insertion order is display order.
#[derive(Clone, Debug)]
pub struct NotificationCenter {
    items: Vec<Notification>,
    default_duration: Duration,
    max_visible: usize,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(&NotificationConfig::default())
    }
}

impl NotificationCenter {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            items: Vec::new(),
            default_duration: Duration::from_millis(config.default_duration_ms),
            max_visible: config.max_visible.max(1),
        }
    }

    /// Append a notification and return its id.
    ///
    /// `None` or a zero duration means the caller will dismiss it manually.
    pub fn push(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        duration: Option<Duration>,
        now_ms: u64,
    ) -> String {
        let duration_ms = duration.map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        let expires_at_ms = (duration_ms > 0).then(|| now_ms.saturating_add(duration_ms));
        let id = uuid::Uuid::new_v4().to_string();

        self.items.push(Notification {
            id: id.clone(),
            message: message.into(),
            kind,
            duration_ms,
            expires_at_ms,
        });

        if self.items.len() > self.max_visible {
            let overflow = self.items.len() - self.max_visible;
            self.items.drain(..overflow);
            tracing::debug!(dropped = overflow, "notification list over capacity");
        }

        id
    }

    /// Append with the configured default lifetime.
    pub fn push_default(&mut self, message: impl Into<String>, kind: NotificationKind, now_ms: u64) -> String {
        let duration = self.default_duration;
        self.push(message, kind, Some(duration), now_ms)
    }

    /// Remove the entry with `id`. Returns `false` if it was already gone.
    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Remove every entry whose deadline is at or before `now_ms`.
    pub fn expire(&mut self, now_ms: u64) -> usize {
        let before = self.items.len();
        self.items
            .retain(|n| n.expires_at_ms.map_or(true, |deadline| deadline > now_ms));
        before - self.items.len()
    }

    /// Earliest pending deadline, for hosts that sweep on a timer.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.items.iter().filter_map(|n| n.expires_at_ms).min()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn default_duration(&self) -> Duration {
        self.default_duration
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Producer-facing seam for pushing notifications.
///
/// Implemented by the composition roots; the session store holds one of these
/// instead of the list itself.
pub trait NotificationSink {
    /// Push with the default lifetime and return the notification id.
    fn notify(&self, message: &str, kind: NotificationKind) -> String;
}
