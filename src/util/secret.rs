//! Redacting wrapper for bearer tokens.

use std::fmt;

/// A credential token that never shows up in logs.
///
/// `Debug` and `Display` print `[REDACTED]`; the raw value is only reachable
/// through [`SecretString::expose_secret`], which the HTTP layer calls when it
/// builds the `Authorization` header and the session file calls when it
/// persists the token.
///
/// ```ignore
/// let token = SecretString::new("abc123");
/// tracing::info!(%token, "stored");  // logs "[REDACTED]"
/// ```
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    /// Wrap a string-like value.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The raw value.
    #[inline]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Whether two secrets carry the same value.
    ///
    /// Every byte is compared, wherever the first difference is.
    pub fn same_as(&self, other: &SecretString) -> bool {
        let (a, b) = (self.0.as_bytes(), other.0.as_bytes());
        let mut diff = a.len() ^ b.len();
        for i in 0..a.len().max(b.len()) {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            diff |= usize::from(x ^ y);
        }
        diff == 0
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // Best effort only; copies made by reqwest headers are out of reach
        self.0.clear();
        self.0.shrink_to_fit();
    }
}
