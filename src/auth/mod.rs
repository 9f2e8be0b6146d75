//! Authentication and access gating
//!
//! - [`session`]: the injected credential store (token + cached role)
//! - [`verify`]: turns a token into a validated [`Role`] via the backend
//! - [`gate`]: decides whether a navigation into a protected view may proceed

pub mod gate;
pub mod role;
pub mod session;
pub mod verify;

pub use gate::{AccessGate, DenyReason, GateDecision, Navigation};
pub use role::Role;
pub use session::{FileSessionStore, MemorySessionStore, SessionStore, SharedSession};
pub use verify::{HttpVerifier, SharedVerifier, Verifier, parse_verification};
