//! Storefront runtime configuration.
//!
//! DESIGN
//! ======
//! One serde-backed struct per component so each coordinator takes only the
//! section it owns. Hosts either deserialize JSON (embedded in the page or
//! fetched at boot) or start from defaults and apply environment overrides.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::state::loading::LoaderVariant;

const DEFAULT_LOADER_MIN_MS: u64 = 600;
const DEFAULT_NOTIFY_DURATION_MS: u64 = 3000;
const DEFAULT_NOTIFY_MAX_VISIBLE: usize = 5;
const DEFAULT_INIT_FLAG_KEY: &str = "storefront_session_initialized";

/// Top-level configuration for the storefront orchestration core.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    pub session: SessionConfig,
    pub loading: LoadingConfig,
    pub notifications: NotificationConfig,
}

/// Session store settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Browsing-session storage key marking first-load reconciliation as done.
    pub init_flag_key: String,
    /// Path navigated to after login, registration, and logout.
    pub root_path: String,
    /// Name used in welcome messages when the identity has no first name.
    pub display_name_fallback: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            init_flag_key: DEFAULT_INIT_FLAG_KEY.to_owned(),
            root_path: "/".to_owned(),
            display_name_fallback: "there".to_owned(),
        }
    }
}

/// Route-transition loader settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    /// Minimum time the loader stays visible once a transition starts.
    pub min_display_ms: u64,
    /// Whether a query-string change alone counts as a navigation.
    pub watch_query: bool,
    pub default_variant: LoaderVariant,
    /// Route prefix (full path or first segment) to loader variant.
    pub routes: BTreeMap<String, LoaderVariant>,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        let routes = [
            ("/collection", LoaderVariant::Fabric),
            ("/products", LoaderVariant::Fabric),
            ("/cart", LoaderVariant::Minimal),
            ("/checkout", LoaderVariant::Minimal),
            ("/account", LoaderVariant::Minimal),
        ]
        .into_iter()
        .map(|(path, variant)| (path.to_owned(), variant))
        .collect();

        Self {
            min_display_ms: DEFAULT_LOADER_MIN_MS,
            watch_query: true,
            default_variant: LoaderVariant::Classic,
            routes,
        }
    }
}

/// Notification channel settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Lifetime used by producers that do not pick their own.
    pub default_duration_ms: u64,
    /// Visible list cap; the oldest entries are dropped beyond it.
    pub max_visible: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: DEFAULT_NOTIFY_DURATION_MS,
            max_visible: DEFAULT_NOTIFY_MAX_VISIBLE,
        }
    }
}

impl StorefrontConfig {
    /// Parse a JSON document; missing sections and fields fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and
    /// `ConfigError::Invalid` when validation fails.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with `STOREFRONT_*` environment overrides applied.
    ///
    /// Unparseable values are ignored and the default is kept.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.loading.min_display_ms = env_parse("STOREFRONT_LOADER_MIN_MS", config.loading.min_display_ms);
        config.loading.watch_query = env_parse("STOREFRONT_LOADER_WATCH_QUERY", config.loading.watch_query);
        config.notifications.default_duration_ms =
            env_parse("STOREFRONT_NOTIFY_DURATION_MS", config.notifications.default_duration_ms);
        config.notifications.max_visible =
            env_parse("STOREFRONT_NOTIFY_MAX_VISIBLE", config.notifications.max_visible);
        if let Ok(key) = std::env::var("STOREFRONT_INIT_FLAG_KEY") {
            if !key.trim().is_empty() {
                config.session.init_flag_key = key;
            }
        }
        config
    }

    /// Check invariants the coordinators rely on.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.init_flag_key.trim().is_empty() {
            return Err(ConfigError::Invalid("session.init_flag_key must not be empty".to_owned()));
        }
        if !self.session.root_path.starts_with('/') {
            return Err(ConfigError::Invalid("session.root_path must start with '/'".to_owned()));
        }
        if self.notifications.max_visible == 0 {
            return Err(ConfigError::Invalid("notifications.max_visible must be at least 1".to_owned()));
        }
        if let Some(bad) = self.loading.routes.keys().find(|k| !k.starts_with('/')) {
            return Err(ConfigError::Invalid(format!("loading route {bad:?} must start with '/'")));
        }
        Ok(())
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
