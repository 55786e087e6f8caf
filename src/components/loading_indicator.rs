//! Route-transition loader overlay.

use leptos::prelude::*;

use crate::state::loading::LoadingCoordinator;

/// Shows the resolved loader variant while a route transition is in progress.
#[component]
pub fn LoadingIndicator() -> impl IntoView {
    let loading = expect_context::<RwSignal<LoadingCoordinator>>();
    let state = move || loading.with(LoadingCoordinator::state);

    view! {
        <Show when=move || state().is_loading>
            <div
                class=move || format!("loader {}", state().variant.css_class())
                role="progressbar"
                aria-busy="true"
            >
                <span class="loader__bar"></span>
            </div>
        </Show>
    }
}
