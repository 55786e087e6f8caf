//! Reusable UI components driven by the shared orchestration signals.

pub mod loading_indicator;
pub mod notification_list;
pub mod sign_out_button;
