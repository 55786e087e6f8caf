//! # storefront
//!
//! Client-side orchestration for a storefront: customer session lifecycle,
//! route-transition loading indicator, and transient notifications.
//!
//! The orchestration core (`state`, `net`, `util`) is plain Rust with no
//! reactive runtime, so it runs in native tests. `app` and `components`
//! mirror it into Leptos signals for the browser; `context` does the same
//! for hosts that drive time and routing explicitly.

pub mod app;
pub mod components;
pub mod config;
pub mod context;
pub mod error;
pub mod net;
pub mod notifier;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_support;


/// Install panic and log output for the current target.
///
/// In the browser, `tracing` events reach the console through its `log`
/// bridge and `console_log`; native and server hosts get a
/// `tracing_subscriber::fmt` subscriber. Safe to call more than once.
pub fn init_logging() {
    #[cfg(feature = "hydrate")]
    {
        console_error_panic_hook::set_once();
        let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
        // Fails only when a logger is already installed.
        let _ = console_log::init_with_level(level);
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = tracing_subscriber::fmt().try_init();
    }
}
