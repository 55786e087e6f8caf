//! Orchestration state machines.
//!
//! DESIGN
//! ======
//! Each component owns one concern (`session`, `loading`, `notifications`)
//! and never reads the clock or the router itself; time and route targets are
//! passed in. They talk to each other only through the narrow traits in
//! `notifications` and `util::navigation`.

pub mod loading;
pub mod notifications;
pub mod session;
