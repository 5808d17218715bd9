//! HTTP handlers
//!
//! Each handler decodes its request, makes one core call off the executor and
//! maps the result. No business rules live here.

pub mod accounts;
pub mod admin;
pub mod posts;
pub mod sessions;
pub mod webhooks;

// Re-export AppState from config
pub use crate::config::AppState;
