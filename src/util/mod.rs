//! Utility functions shared across the application.

mod fs;
mod secret;

pub use fs::write_atomic;
pub use secret::SecretString;

use std::fmt::Display;

/// Build an endpoint path from a resource root and id segments.
///
/// Each segment is URL encoded, so string ids such as matkul or email ids
/// cannot escape their path position.
///
/// # Example
/// ```ignore
/// let path = resource_path("/task", &[&3, &"7"]);
/// // Returns "/task/3/7"
/// ```
pub fn resource_path(root: &str, segments: &[&dyn Display]) -> String {
    let mut path = root.trim_end_matches('/').to_string();
    for segment in segments {
        path.push('/');
        path.push_str(&urlencoding::encode(&segment.to_string()));
    }
    path
}
