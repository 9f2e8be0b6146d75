//! Access gate
//!
//! Guards entry to protected views. Each attempt to enter a view is a
//! [`Navigation`]: it starts `Pending`, verifies the stored token at most once
//! and settles on `Granted` or `Denied`, after which it never changes.
//!
//! ```text
//!            no token ─────────────────────────────┐
//!  Pending ─ verify ok, role satisfies requirement ─┼─> Granted
//!            verify ok, role mismatch ──────────────┤
//!            verify failed (clears credentials) ────┴─> Denied
//! ```
//!
//! A role mismatch only denies the navigation; the token and the verified
//! role stay in the session so the same sign-in keeps working for views the
//! role is entitled to.

use crate::auth::role::Role;
use crate::auth::session::SharedSession;
use crate::auth::verify::SharedVerifier;
use crate::error::{AccessDeniedError, VerifyError};
use crate::util::SecretString;
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Outcome of a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Verification in flight; render a neutral placeholder
    Pending,
    /// Render the protected content
    Granted { role: Role },
    /// Redirect to the public entry point
    Denied(DenyReason),
}

impl GateDecision {
    pub fn is_pending(&self) -> bool {
        matches!(self, GateDecision::Pending)
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, GateDecision::Granted { .. })
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, GateDecision::Denied(_))
    }
}

/// Why a navigation was denied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// No token stored; no verification was attempted
    MissingCredential,
    /// The token did not verify; credentials were cleared
    VerificationFailed(VerifyError),
    /// The token is valid but bound to another role
    RoleMismatch { required: Role, actual: Role },
    /// The navigation was torn down before verification finished
    Interrupted,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::MissingCredential => f.write_str("not signed in"),
            DenyReason::VerificationFailed(e) => write!(f, "session is no longer valid: {}", e),
            DenyReason::RoleMismatch { required, actual } => {
                write!(f, "requires role '{}', signed in as '{}'", required, actual)
            }
            DenyReason::Interrupted => f.write_str("verification was interrupted"),
        }
    }
}

/// Factory for navigation instances
///
/// Holds the injected session context and verification capability; cheap to
/// clone.
#[derive(Clone)]
pub struct AccessGate {
    session: SharedSession,
    verifier: SharedVerifier,
}

impl AccessGate {
    pub fn new(session: SharedSession, verifier: SharedVerifier) -> Self {
        Self { session, verifier }
    }

    /// Start a fresh navigation into a view with the given requirement
    pub fn navigate(&self, requirement: Option<Role>) -> Navigation {
        Navigation {
            session: self.session.clone(),
            verifier: self.verifier.clone(),
            requirement,
            decision: GateDecision::Pending,
            teardown: CancellationToken::new(),
        }
    }

    /// Evaluate a fresh navigation to completion
    pub async fn evaluate(&self, requirement: Option<Role>) -> GateDecision {
        self.navigate(requirement).evaluate().await
    }

    /// Run `content` only if a fresh navigation is granted
    ///
    /// The content receives the verified role.
    pub async fn guard<F, Fut, T>(
        &self,
        requirement: Option<Role>,
        content: F,
    ) -> Result<T, AccessDeniedError>
    where
        F: FnOnce(Role) -> Fut,
        Fut: Future<Output = T>,
    {
        self.navigate(requirement).run(content).await
    }
}

/// One attempt to enter a protected view
pub struct Navigation {
    session: SharedSession,
    verifier: SharedVerifier,
    requirement: Option<Role>,
    decision: GateDecision,
    teardown: CancellationToken,
}

impl Navigation {
    /// Current decision
    pub fn decision(&self) -> &GateDecision {
        &self.decision
    }

    /// Handle that tears this navigation down
    ///
    /// Cancelling it while verification is in flight discards the response:
    /// the session is left untouched and the decision stays `Pending`.
    pub fn teardown_handle(&self) -> CancellationToken {
        self.teardown.clone()
    }

    /// Drive the navigation to a decision
    ///
    /// Verifies at most once; a settled navigation returns its decision
    /// again without touching the network.
    pub async fn evaluate(&mut self) -> GateDecision {
        if !self.decision.is_pending() || self.teardown.is_cancelled() {
            return self.decision.clone();
        }

        let token = match self.session.token() {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => return self.settle(GateDecision::Denied(DenyReason::MissingCredential)),
            Err(e) => {
                warn!(error = %e, "Failed to read session, treating as signed out");
                return self.settle(GateDecision::Denied(DenyReason::MissingCredential));
            }
        };

        debug!(requirement = ?self.requirement, "Verifying session");

        let outcome = tokio::select! {
            biased;
            _ = self.teardown.cancelled() => {
                debug!("Navigation torn down, discarding verification");
                return GateDecision::Pending;
            }
            outcome = self.verifier.verify(&token) => outcome,
        };

        match outcome {
            Ok(role) => {
                self.write_if_current(&token, |session| session.set_role(role));
                let decision = match self.requirement {
                    Some(required) if required != role => {
                        GateDecision::Denied(DenyReason::RoleMismatch {
                            required,
                            actual: role,
                        })
                    }
                    _ => GateDecision::Granted { role },
                };
                self.settle(decision)
            }
            Err(e) => {
                self.write_if_current(&token, |session| session.clear());
                self.settle(GateDecision::Denied(DenyReason::VerificationFailed(e)))
            }
        }
    }

    /// Evaluate, then run `content` with the verified role if granted
    ///
    /// A navigation torn down before it settled is refused as interrupted.
    pub async fn run<F, Fut, T>(mut self, content: F) -> Result<T, AccessDeniedError>
    where
        F: FnOnce(Role) -> Fut,
        Fut: Future<Output = T>,
    {
        match self.evaluate().await {
            GateDecision::Granted { role } => Ok(content(role).await),
            GateDecision::Denied(reason) => Err(AccessDeniedError::new(reason)),
            GateDecision::Pending => Err(AccessDeniedError::new(DenyReason::Interrupted)),
        }
    }

    fn settle(&mut self, decision: GateDecision) -> GateDecision {
        match &decision {
            GateDecision::Granted { role } => debug!(%role, "Navigation granted"),
            GateDecision::Denied(reason) => info!(%reason, "Navigation denied"),
            GateDecision::Pending => {}
        }
        self.decision = decision.clone();
        decision
    }

    /// Apply a session write only if the stored token is still the one that
    /// was verified; a sign-out/sign-in in the meantime wins.
    fn write_if_current(
        &self,
        verified: &SecretString,
        write: impl FnOnce(&SharedSession) -> Result<(), crate::error::StorageError>,
    ) {
        match self.session.token() {
            Ok(Some(current)) if current.same_as(verified) => {
                if let Err(e) = write(&self.session) {
                    warn!(error = %e, "Failed to update session");
                }
            }
            Ok(_) => debug!("Session changed during verification, leaving it untouched"),
            Err(e) => warn!(error = %e, "Failed to read session"),
        }
    }
}
