//! Token verification
//!
//! Turns a bearer token into a validated [`Role`] by asking the backend. The
//! response body goes through [`parse_verification`] so that a body without a
//! recognizable role claim is a typed failure, not a crash further down.

use crate::api::ApiClient;
use crate::auth::role::Role;
use crate::config::{AuthConfig, VerifyMethod};
use crate::error::VerifyError;
use crate::util::SecretString;
// async_trait required for dyn-compatibility with Arc<dyn Verifier>
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Verification capability used by the gate
///
/// One call is one round trip: implementations must not retry.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Verify `token` and return the role it is bound to
    async fn verify(&self, token: &SecretString) -> Result<Role, VerifyError>;
}

/// Shared handle type for verifiers
pub type SharedVerifier = Arc<dyn Verifier>;

/// Verifier backed by the dashboard's token check endpoint
pub struct HttpVerifier {
    client: Arc<ApiClient>,
    path: String,
    method: VerifyMethod,
}

impl HttpVerifier {
    pub fn new(client: Arc<ApiClient>, config: &AuthConfig) -> Self {
        Self {
            client,
            path: config.verify_path.clone(),
            method: config.verify_method,
        }
    }
}

#[async_trait]
impl Verifier for HttpVerifier {
    #[instrument(skip_all, fields(path = %self.path, method = ?self.method))]
    async fn verify(&self, token: &SecretString) -> Result<Role, VerifyError> {
        let body = self
            .client
            .check_token(self.method, &self.path, token)
            .await?;
        let role = parse_verification(&body)?;
        debug!(%role, "Token verified");
        Ok(role)
    }
}

/// Locations of the role claim, in order of preference
const ROLE_POINTERS: &[&str] = &["/data/role", "/role", "/data/user/role", "/user/role"];

/// Validate a verification response body and extract the role claim
///
/// Accepts `{"data": {"role": ..}}`, `{"role": ..}` and the same with a nested
/// `user` object. The first pointer that exists decides; a claim that is not
/// exactly `admin` or `user` is rejected rather than skipped.
pub fn parse_verification(body: &[u8]) -> Result<Role, VerifyError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| VerifyError::Malformed(format!("body is not JSON: {}", e)))?;

    let claim = ROLE_POINTERS
        .iter()
        .find_map(|pointer| value.pointer(pointer))
        .ok_or_else(|| VerifyError::Malformed("response carries no role claim".to_string()))?;

    let claim = claim
        .as_str()
        .ok_or_else(|| VerifyError::Malformed(format!("role claim is not a string: {}", claim)))?;

    Role::try_parse(claim).ok_or_else(|| VerifyError::Malformed(format!("unknown role '{}'", claim)))
}
