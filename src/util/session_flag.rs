//! Browsing-session scoped key/value storage.
//!
//! Backs the one-time initialization flag. In the browser this is
//! `window.sessionStorage`, which survives reloads and in-tab navigation but
//! not a browser restart. Requires a browser environment for the real store;
//! other targets use `MemorySessionStorage`.

use std::cell::RefCell;
use std::collections::HashMap;

/// Key/value store whose lifetime is one browsing session.
pub trait SessionStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// `window.sessionStorage`. Reads return `None` and writes are dropped when
/// storage is unavailable (private mode, server render).
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSessionStorage;

impl SessionStorage for BrowserSessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            let storage = web_sys::window().and_then(|w| w.session_storage().ok().flatten())?;
            storage.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            None
        }
    }

    fn set(&self, key: &str, value: &str) {
        #[cfg(feature = "hydrate")]
        {
            let Some(storage) = web_sys::window().and_then(|w| w.session_storage().ok().flatten()) else {
                tracing::warn!(key, "sessionStorage unavailable; flag not persisted");
                return;
            };
            let _ = storage.set_item(key, value);
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
        }
    }
}

/// Process-local stand-in for `sessionStorage`.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
    }
}
