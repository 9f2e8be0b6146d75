//! Command-line surface
//!
//! Every resource command is a navigation into a protected view: it goes
//! through the [`AccessGate`] first and only runs once the gate grants it.
//! Listing needs any signed-in role, changing data needs `admin`.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (configuration, backend, validation)
//! - 2: Access denied

mod resources;
mod session;
mod tasks;

pub use resources::{EmailCommand, MatkulCommand, SemesterCommand, WeekCommand};
pub use session::{CheckArgs, LoginArgs};
pub use tasks::TaskCommand;

use crate::api::ApiClient;
use crate::auth::{AccessGate, HttpVerifier, Role, SharedSession};
use crate::config::AppConfig;
use crate::error::{AccessDeniedError, AppError, Result};
use crate::tracker::AssignmentFile;
use clap::Subcommand;
use std::sync::Arc;
use tracing::debug;

/// Exit codes for taskboard commands.
pub mod exit_codes {
    /// Success exit code.
    pub const SUCCESS: u8 = 0;
    /// General error exit code.
    pub const ERROR: u8 = 1;
    /// The gate refused the command.
    pub const ACCESS_DENIED: u8 = 2;
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store a bearer token and verify it
    Login(LoginArgs),

    /// Forget the stored token and role
    Logout,

    /// Verify the stored token, optionally against a role
    Check(CheckArgs),

    /// Manage semesters
    #[command(subcommand)]
    Semester(SemesterCommand),

    /// Manage weeks
    #[command(subcommand)]
    Week(WeekCommand),

    /// List, add and tick off tasks
    #[command(subcommand)]
    Task(TaskCommand),

    /// Manage courses
    #[command(subcommand)]
    Matkul(MatkulCommand),

    /// Manage notification emails
    #[command(subcommand)]
    Email(EmailCommand),
}

impl Command {
    /// Whether the command passes through the gate
    pub fn is_guarded(&self) -> bool {
        !matches!(self, Command::Login(_) | Command::Logout)
    }

    /// Role the command's view requires; `None` admits any verified role
    pub fn requirement(&self) -> Option<Role> {
        match self {
            Command::Login(_) | Command::Logout => None,
            Command::Check(args) => args.role,
            Command::Semester(cmd) => cmd.requirement(),
            Command::Week(cmd) => cmd.requirement(),
            Command::Task(cmd) => cmd.requirement(),
            Command::Matkul(cmd) => cmd.requirement(),
            Command::Email(cmd) => cmd.requirement(),
        }
    }
}

/// Everything a command needs, wired from configuration
#[derive(Clone)]
pub struct Context {
    pub session: SharedSession,
    pub api: Arc<ApiClient>,
    pub gate: AccessGate,
    pub assignments: AssignmentFile,
}

impl Context {
    /// Wire the client, verifier and gate around an existing session store
    pub fn new(config: &AppConfig, session: SharedSession) -> Result<Self> {
        let api = Arc::new(ApiClient::new(&config.api, session.clone())?);
        let verifier = Arc::new(HttpVerifier::new(api.clone(), &config.auth));
        let gate = AccessGate::new(session.clone(), verifier);

        Ok(Self {
            session,
            api,
            gate,
            assignments: AssignmentFile::new(config.storage.assignments_file()),
        })
    }
}

/// Run a command and return what it prints
pub async fn run(command: Command, ctx: &Context) -> Result<String> {
    if !command.is_guarded() {
        return execute(command, ctx, None).await;
    }

    let requirement = command.requirement();
    debug!(?requirement, "Entering protected command");

    ctx.gate
        .guard(requirement, move |role| execute(command, ctx, Some(role)))
        .await?
}

async fn execute(command: Command, ctx: &Context, role: Option<Role>) -> Result<String> {
    match command {
        Command::Login(args) => session::login(&args, ctx).await,
        Command::Logout => session::logout(ctx),
        Command::Check(_) => Ok(session::describe(role)),
        Command::Semester(cmd) => resources::semester(cmd, &ctx.api).await,
        Command::Week(cmd) => resources::week(cmd, &ctx.api).await,
        Command::Task(cmd) => tasks::run(cmd, ctx).await,
        Command::Matkul(cmd) => resources::matkul(cmd, &ctx.api).await,
        Command::Email(cmd) => resources::email(cmd, &ctx.api).await,
    }
}

/// Line printed when the gate refuses a command
pub fn denial_message(denied: &AccessDeniedError) -> String {
    format!(
        "access denied ({}); sign in again with 'taskboard login'",
        denied.reason
    )
}

/// Process exit status for a failed command
pub fn exit_code(error: &AppError) -> u8 {
    match error {
        AppError::AccessDenied(_) => exit_codes::ACCESS_DENIED,
        _ => exit_codes::ERROR,
    }
}
