//! Route-transition loading indicator state machine.
//!
//! DESIGN
//! ======
//! Two states, Idle and Loading. A changed navigation target resolves its
//! loader variant and enters Loading in one update, so the first frame of the
//! indicator already has the destination's look. Loading ends once the
//! minimum display time has passed; this is a perceived-latency floor, not a
//! data-readiness signal.
//!
//! Every entry into Loading bumps `generation`. Timer tasks carry the
//! generation they were started for and `finish` ignores stale ones, so a
//! restart never gets cut short by the previous transition's timer.

#[cfg(test)]
#[path = "loading_test.rs"]
mod loading_test;

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::LoadingConfig;
use crate::util::navigation::RouteTarget;

/// Visual style of the loading indicator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderVariant {
    /// Plain spinner used wherever no route mapping applies.
    #[default]
    Classic,
    /// Woven-fabric animation for catalogue pages.
    Fabric,
    /// Thin progress bar for cart, checkout, and account flows.
    Minimal,
}

impl LoaderVariant {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Classic => "loader--classic",
            Self::Fabric => "loader--fabric",
            Self::Minimal => "loader--minimal",
        }
    }
}

/// Static route prefix to loader variant lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteVariantMap {
    entries: HashMap<String, LoaderVariant>,
    default: LoaderVariant,
}

impl RouteVariantMap {
    pub fn new(default: LoaderVariant) -> Self {
        Self { entries: HashMap::new(), default }
    }

    #[must_use]
    pub fn with_route(mut self, path: &str, variant: LoaderVariant) -> Self {
        self.insert(path, variant);
        self
    }

    pub fn insert(&mut self, path: &str, variant: LoaderVariant) {
        self.entries.insert(normalize_path(path).to_owned(), variant);
    }

    /// Exact path first, then the first path segment, then the default.
    pub fn resolve(&self, path: &str) -> LoaderVariant {
        let path = normalize_path(path);
        if let Some(variant) = self.entries.get(path) {
            return *variant;
        }
        first_segment(path)
            .and_then(|segment| self.entries.get(segment))
            .copied()
            .unwrap_or(self.default)
    }

    pub fn default_variant(&self) -> LoaderVariant {
        self.default
    }
}

impl From<&LoadingConfig> for RouteVariantMap {
    fn from(config: &LoadingConfig) -> Self {
        config
            .routes
            .iter()
            .fold(Self::new(config.default_variant), |map, (path, variant)| {
                map.with_route(path, *variant)
            })
    }
}

/// Drop a trailing slash (root stays `/`) and any query or fragment.
fn normalize_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// `/collection/shirts` → `/collection`; `None` for the root.
fn first_segment(path: &str) -> Option<&str> {
    let rest = path.strip_prefix('/')?;
    let end = rest.find('/').map_or(path.len(), |i| i + 1);
    (end > 1).then(|| &path[..end])
}

/// Snapshot rendered by the loading indicator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadingState {
    pub is_loading: bool,
    pub variant: LoaderVariant,
}

/// Result of observing a navigation target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteTransition {
    /// First target seen; establishes the baseline, no loader.
    Initial,
    /// Same target as before.
    Unchanged,
    /// Idle → Loading.
    Started { variant: LoaderVariant, generation: u64 },
    /// New target while already Loading; timer restarted.
    Restarted { variant: LoaderVariant, generation: u64 },
}

impl RouteTransition {
    /// Generation to hand to a timer task, if one should be scheduled.
    pub fn timer_generation(self) -> Option<u64> {
        match self {
            Self::Started { generation, .. } | Self::Restarted { generation, .. } => Some(generation),
            Self::Initial | Self::Unchanged => None,
        }
    }
}

/// Idle/Loading state machine driven by navigation targets and time.
#[derive(Clone, Debug)]
pub struct LoadingCoordinator {
    routes: RouteVariantMap,
    min_display: Duration,
    state: LoadingState,
    current: Option<RouteTarget>,
    entered_at_ms: Option<u64>,
    generation: u64,
}

impl Default for LoadingCoordinator {
    fn default() -> Self {
        Self::new(&LoadingConfig::default())
    }
}

impl LoadingCoordinator {
    pub fn new(config: &LoadingConfig) -> Self {
        Self::with_routes(RouteVariantMap::from(config), Duration::from_millis(config.min_display_ms))
    }

    pub fn with_routes(routes: RouteVariantMap, min_display: Duration) -> Self {
        let state = LoadingState { is_loading: false, variant: routes.default_variant() };
        Self {
            routes,
            min_display,
            state,
            current: None,
            entered_at_ms: None,
            generation: 0,
        }
    }

    /// Feed the router's current target.
    pub fn observe(&mut self, target: RouteTarget, now_ms: u64) -> RouteTransition {
        let Some(previous) = self.current.as_ref() else {
            self.current = Some(target);
            return RouteTransition::Initial;
        };
        if *previous == target {
            return RouteTransition::Unchanged;
        }

        let variant = self.routes.resolve(&target.path);
        let was_loading = self.state.is_loading;
        self.generation += 1;
        self.state = LoadingState { is_loading: true, variant };
        self.entered_at_ms = Some(now_ms);
        tracing::debug!(path = %target.path, ?variant, generation = self.generation, "route loading");
        self.current = Some(target);

        if was_loading {
            RouteTransition::Restarted { variant, generation: self.generation }
        } else {
            RouteTransition::Started { variant, generation: self.generation }
        }
    }

    /// Go Idle if the minimum display time has elapsed. Returns `true` on the
    /// Loading → Idle edge.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms() {
            Some(deadline) if now_ms >= deadline => {
                self.go_idle();
                true
            }
            _ => false,
        }
    }

    /// Timer completion for `generation`. Stale generations are ignored.
    pub fn finish(&mut self, generation: u64) -> bool {
        if !self.state.is_loading || generation != self.generation {
            return false;
        }
        self.go_idle();
        true
    }

    /// Unmount: back to Idle and invalidate outstanding timers.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.go_idle();
    }

    /// When the current Loading phase may end.
    pub fn deadline_ms(&self) -> Option<u64> {
        if !self.state.is_loading {
            return None;
        }
        let min = u64::try_from(self.min_display.as_millis()).unwrap_or(u64::MAX);
        self.entered_at_ms.map(|at| at.saturating_add(min))
    }

    pub fn state(&self) -> LoadingState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn min_display(&self) -> Duration {
        self.min_display
    }

    pub fn current_target(&self) -> Option<&RouteTarget> {
        self.current.as_ref()
    }

    fn go_idle(&mut self) {
        self.state.is_loading = false;
        self.entered_at_ms = None;
    }
}
