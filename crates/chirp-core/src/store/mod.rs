//! Record store module
//!
//! Single-document JSON storage for accounts and posts.

pub mod document;
pub mod json_store;

pub use document::{Account, AccountSummary, Document, Post};
pub use json_store::JsonStore;
