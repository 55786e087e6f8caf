//! Identity backend contract, wire types, and the session command channel.

pub mod identity;
pub mod session_client;
pub mod types;
