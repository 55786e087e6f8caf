//! Stack of transient notifications.
//!
//! SYSTEM CONTEXT
//! ==============
//! Entries are pushed through the `Notifier` context, which also arms each
//! entry's expiry timer. This view renders and handles manual dismissal.

use leptos::prelude::*;

use crate::notifier::Notifier;

/// Renders visible notifications, newest last, each with a close button.
#[component]
pub fn NotificationList() -> impl IntoView {
    let notifier = expect_context::<Notifier>();

    view! {
        <div class="notification-list" aria-live="polite">
            {move || {
                notifier
                    .items()
                    .into_iter()
                    .map(|note| {
                        let id = note.id.clone();
                        let class = format!("notification {}", note.kind.css_class());
                        view! {
                            <div class=class role="status">
                                <span class="notification__message">{note.message}</span>
                                <button
                                    class="notification__close"
                                    title="Dismiss"
                                    on:click=move |_| {
                                        notifier.dismiss(&id);
                                    }
                                >
                                    "\u{00d7}"
                                </button>
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
