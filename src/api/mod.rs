//! Dashboard API module
//!
//! Provides a typed client for the dashboard's REST backend.

pub mod client;
pub mod endpoints;
pub mod types;
pub mod validate;

pub use client::ApiClient;
pub use endpoints::{TaskInput, group_by_semester, sort_weeks};
pub use types::*;
