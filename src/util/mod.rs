//! Utility helpers shared across the orchestration core.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns (time, router,
//! `sessionStorage`) behind small traits so the coordinators stay testable.

pub mod clock;
pub mod navigation;
pub mod session_flag;
