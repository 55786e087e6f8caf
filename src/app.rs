//! Browser composition root: provides session, loading, and notification
//! state to the page tree as Leptos contexts.
//!
//! SYSTEM CONTEXT
//! ==============
//! `AppProviders` must sit inside a `leptos_router` `<Router>`; it reads the
//! location for the loader and uses the router to navigate after session
//! changes. Children get:
//!
//! - `RwSignal<SessionState>` mirrored from the session store
//! - `RwSignal<LoadingCoordinator>` driven by location changes
//! - `Notifier` for showing notifications; the session store uses the same one
//! - `SessionClient` for login/register/logout requests
//!
//! TRADE-OFFS
//! ==========
//! Timers are fire-and-forget local tasks. Each one names what it ends (a
//! loader generation, a notification id), so a timer outliving its target is
//! a no-op, and `try_update` makes one outliving the whole tree a no-op too.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::collections::BTreeMap;
use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::params::ParamsMap;

use crate::components::loading_indicator::LoadingIndicator;
use crate::components::notification_list::NotificationList;
use crate::config::StorefrontConfig;
use crate::net::identity::IdentityBackend;
use crate::net::session_client::SessionClient;
use crate::notifier::Notifier;
use crate::state::loading::{LoadingCoordinator, RouteTransition};
use crate::state::session::{SessionDeps, SessionState, SessionStore};
use crate::util::clock::now_ms;
use crate::util::navigation::{Navigator, RouteTarget};
use crate::util::session_flag::SessionStorage;

/// Host-supplied services for [`AppProviders`].
#[derive(Clone)]
pub struct AppServices {
    pub backend: Rc<dyn IdentityBackend>,
    pub storage: Rc<dyn SessionStorage>,
    pub config: StorefrontConfig,
}

/// Flatten the router's decoded query parameters; a repeated key keeps its
/// last value.
pub fn query_map(params: &ParamsMap) -> BTreeMap<String, String> {
    params
        .clone()
        .into_iter()
        .map(|(key, value)| (key.into_owned(), value))
        .collect()
}

/// `Navigator` over the enclosing `leptos_router` router.
struct RouterNavigator {
    pathname: Memo<String>,
    query: Memo<ParamsMap>,
    navigate: Box<dyn Fn(&str, NavigateOptions)>,
}

impl RouterNavigator {
    fn from_router() -> Self {
        let location = use_location();
        Self {
            pathname: location.pathname,
            query: location.query,
            navigate: Box::new(use_navigate()),
        }
    }
}

impl Navigator for RouterNavigator {
    fn current_path(&self) -> String {
        self.pathname.try_get_untracked().unwrap_or_default()
    }

    fn current_query(&self) -> BTreeMap<String, String> {
        self.query.try_with_untracked(query_map).unwrap_or_default()
    }

    fn navigate_to(&self, path: &str) {
        (self.navigate)(path, NavigateOptions::default());
    }
}

/// Wraps the page tree with session, loading, and notification state.
///
/// Renders the loading indicator and notification list after `children`.
#[component]
pub fn AppProviders(services: AppServices, children: Children) -> impl IntoView {
    let AppServices { backend, storage, config } = services;
    if let Err(e) = config.validate() {
        tracing::warn!(error = %e, "storefront config rejected; continuing with it as given");
    }

    let notifier = Notifier::new(&config.notifications);
    let loading = RwSignal::new(LoadingCoordinator::new(&config.loading));
    let session = RwSignal::new(SessionState::default());

    let navigator = Rc::new(RouterNavigator::from_router());
    let (pathname, params) = (navigator.pathname, navigator.query);
    let deps = SessionDeps {
        backend,
        navigator,
        storage,
        notifier: Rc::new(notifier),
    };
    let store = Rc::new(SessionStore::new(deps, config.session.clone()));
    store.subscribe(move |state| {
        let _ = session.try_set(state.clone());
    });

    let (client, commands) = SessionClient::channel();

    provide_context(notifier);
    provide_context(loading);
    provide_context(session);
    provide_context(client);

    #[cfg(feature = "hydrate")]
    {
        leptos::task::spawn_local(crate::net::session_client::serve(Rc::clone(&store), commands));
        leptos::task::spawn_local(async move {
            store.initialize().await;
        });
    }
    #[cfg(not(feature = "hydrate"))]
    drop((store, commands));

    let watch_query = config.loading.watch_query;
    Effect::new(move || {
        let path = pathname.get();
        let query = watch_query.then(|| params.with(query_map));
        let now = now_ms();
        let transition = loading.try_update(|l| l.observe(RouteTarget::new(path, query), now));

        if let Some(generation) = transition.and_then(RouteTransition::timer_generation) {
            schedule_loader_end(loading, generation);
        }
    });

    on_cleanup(move || {
        loading.try_update(LoadingCoordinator::cancel);
        notifier.clear();
    });

    view! {
        {children()}
        <LoadingIndicator/>
        <NotificationList/>
    }
}

#[cfg(feature = "hydrate")]
fn schedule_loader_end(loading: RwSignal<LoadingCoordinator>, generation: u64) {
    let Some(min) = loading.try_with_untracked(LoadingCoordinator::min_display) else {
        return;
    };
    leptos::task::spawn_local(async move {
        gloo_timers::future::sleep(min).await;
        loading.try_update(|l| l.finish(generation));
    });
}

#[cfg(not(feature = "hydrate"))]
fn schedule_loader_end(_loading: RwSignal<LoadingCoordinator>, _generation: u64) {}
