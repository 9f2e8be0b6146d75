//! taskboard
//!
//! Command-line client for a course task dashboard, with role-gated access to
//! every view.
//!
//! ## Features
//!
//! - **Access gate** verifying the stored bearer token once per navigation
//! - **Semester, week, task, course and email** administration over the REST backend
//! - **Deadline tracking** with countdowns and locally kept done marks
//! - **Flexible configuration** via TOML files and environment variables
//!
//! ## Access Model
//!
//! ```text
//! no token → denied
//! token → verify (one request) → role claim → granted | denied
//! ```
//!
//! A failed verification clears the stored token and role. A valid token
//! bound to the wrong role only denies the navigation at hand.
//!
//! ## Example Configuration
//!
//! ```toml
//! [api]
//! url = "https://tasks.example.com"
//! # or API_URL / TASKBOARD__API__URL
//!
//! [auth]
//! verify_path = "/user/auth/check_token"
//! verify_method = "post"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod tracker;
pub mod util;

// Re-export main types
pub use api::ApiClient;
pub use auth::{AccessGate, GateDecision, Role};
pub use config::{AppConfig, load_config};
pub use error::{AppError, Result};
