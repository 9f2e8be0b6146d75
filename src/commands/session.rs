//! `login`, `logout` and `check`

use crate::api::validate;
use crate::auth::{DenyReason, GateDecision, Role};
use crate::commands::Context;
use crate::error::{AccessDeniedError, Result};
use crate::util::SecretString;
use clap::Args;
use tracing::info;

/// Arguments for `taskboard login`.
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Bearer token issued by the backend
    #[arg(long, env = "TASKBOARD_TOKEN", hide_env_values = true)]
    pub token: String,
}

/// Arguments for `taskboard check`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Role the session must carry (admin, user)
    #[arg(long)]
    pub role: Option<Role>,
}

/// Store the token, then verify it like any navigation would
///
/// A token that fails verification is cleared again by the gate, so a bad
/// login leaves the user signed out.
pub(crate) async fn login(args: &LoginArgs, ctx: &Context) -> Result<String> {
    let token = validate::required("token", &args.token)?;
    ctx.session.set_token(SecretString::new(token))?;

    match ctx.gate.evaluate(None).await {
        GateDecision::Granted { role } => {
            info!(%role, "Signed in");
            Ok(describe(Some(role)))
        }
        GateDecision::Denied(reason) => Err(AccessDeniedError::new(reason).into()),
        GateDecision::Pending => Err(AccessDeniedError::new(DenyReason::Interrupted).into()),
    }
}

pub(crate) fn logout(ctx: &Context) -> Result<String> {
    ctx.session.clear()?;
    info!("Signed out");
    Ok("Signed out".to_string())
}

pub(crate) fn describe(role: Option<Role>) -> String {
    match role {
        Some(role) => format!("Signed in as {}", role),
        None => "Not signed in".to_string(),
    }
}
