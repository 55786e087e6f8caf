//! Navigation collaborator contract and route target helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store only needs `navigate_to`; the loading coordinator only
//! needs the current path and query. Both go through `Navigator` so neither
//! touches the router directly.

#[cfg(test)]
#[path = "navigation_test.rs"]
mod navigation_test;

use std::cell::RefCell;
use std::collections::BTreeMap;

/// Router access used by the orchestration core.
pub trait Navigator {
    fn current_path(&self) -> String;
    fn current_query(&self) -> BTreeMap<String, String>;
    /// Fire-and-forget navigation.
    fn navigate_to(&self, path: &str);
}

/// A navigation destination as observed by the loading coordinator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteTarget {
    pub path: String,
    /// Present only when query changes count as navigations.
    pub query: Option<BTreeMap<String, String>>,
}

impl RouteTarget {
    pub fn new(path: impl Into<String>, query: Option<BTreeMap<String, String>>) -> Self {
        Self { path: path.into(), query }
    }

    /// Path only; query changes are ignored.
    pub fn path(path: impl Into<String>) -> Self {
        Self::new(path, None)
    }
}

/// Split a `?a=1&b=two` search string for `MemoryNavigator`.
///
/// Keys without `=` map to an empty value; empty pairs are skipped. Values
/// are kept as written (no percent-decoding); the browser reads the router's
/// decoded query map instead (`app::query_map`).
pub fn parse_query(search: &str) -> BTreeMap<String, String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_owned(), v.to_owned()),
            None => (pair.to_owned(), String::new()),
        })
        .collect()
}

/// In-memory navigator recording every `navigate_to` call.
///
/// Used by native hosts (server render, tests) where there is no router.
#[derive(Debug)]
pub struct MemoryNavigator {
    path: RefCell<String>,
    query: RefCell<BTreeMap<String, String>>,
    history: RefCell<Vec<String>>,
}

impl MemoryNavigator {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            path: RefCell::new(initial_path.into()),
            query: RefCell::new(BTreeMap::new()),
            history: RefCell::new(Vec::new()),
        }
    }

    /// Simulate the user following a link (query string allowed).
    pub fn visit(&self, href: &str) {
        let (path, search) = href.split_once('?').unwrap_or((href, ""));
        *self.path.borrow_mut() = path.to_owned();
        *self.query.borrow_mut() = parse_query(search);
    }

    /// Paths passed to `navigate_to`, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.path.borrow().clone()
    }

    fn current_query(&self) -> BTreeMap<String, String> {
        self.query.borrow().clone()
    }

    fn navigate_to(&self, path: &str) {
        self.history.borrow_mut().push(path.to_owned());
        self.visit(path);
    }
}
