//! Account sign-out control.

use leptos::prelude::*;

use crate::net::session_client::SessionClient;
use crate::state::session::SessionState;

/// Signs the customer out through the session store. Hidden while signed out.
///
/// Notification and redirect are handled by the store; the button only sends
/// the request.
#[component]
pub fn SignOutButton() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let client = expect_context::<SessionClient>();

    let on_click = move |_: leptos::ev::MouseEvent| {
        let client = client.clone();
        leptos::task::spawn_local(async move {
            if let Err(e) = client.logout().await {
                tracing::warn!(error = %e, "sign-out request not delivered");
            }
        });
    };

    view! {
        <Show when=move || session.with(SessionState::is_authenticated)>
            <button
                class="sign-out-button"
                disabled=move || session.with(|s| s.busy)
                on:click=on_click.clone()
            >
                "Sign out"
            </button>
        </Show>
    }
}
