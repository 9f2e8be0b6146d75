//! Semester, week, course and email administration

use crate::api::{ApiClient, group_by_semester};
use crate::auth::Role;
use crate::error::Result;
use clap::Subcommand;
use std::fmt::Write;

/// `taskboard semester` subcommands.
#[derive(Debug, Subcommand)]
pub enum SemesterCommand {
    /// List semesters
    List,
    /// Add a semester by number
    Add { number: String },
    /// Renumber a semester
    Update { semester_id: u64, number: String },
    /// Delete a semester
    Delete { semester_id: u64 },
}

impl SemesterCommand {
    pub fn requirement(&self) -> Option<Role> {
        match self {
            SemesterCommand::List => None,
            _ => Some(Role::Admin),
        }
    }
}

/// `taskboard week` subcommands.
#[derive(Debug, Subcommand)]
pub enum WeekCommand {
    /// List the weeks of one semester
    List {
        #[arg(long)]
        semester: u64,
    },
    /// List the weeks of every semester, grouped by semester
    All,
    /// Add a week to a semester
    Add {
        #[arg(long)]
        semester: u64,
        number: String,
    },
    /// Renumber a week
    Update { week_id: u64, number: String },
    /// Delete a week
    Delete { week_id: u64 },
}

impl WeekCommand {
    pub fn requirement(&self) -> Option<Role> {
        match self {
            WeekCommand::List { .. } | WeekCommand::All => None,
            _ => Some(Role::Admin),
        }
    }
}

/// `taskboard matkul` subcommands.
#[derive(Debug, Subcommand)]
pub enum MatkulCommand {
    /// List courses
    List,
    /// Add a course
    Add { name: String },
    /// Rename a course
    Update { matkul_id: String, name: String },
    /// Delete a course
    Delete { matkul_id: String },
}

impl MatkulCommand {
    pub fn requirement(&self) -> Option<Role> {
        match self {
            MatkulCommand::List => None,
            _ => Some(Role::Admin),
        }
    }
}

/// `taskboard email` subcommands.
#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// List registered emails
    List,
    /// Register an email
    Add { email: String },
    /// Change a registered email
    Update { email_id: String, email: String },
    /// Remove a registered email
    Delete { email_id: String },
}

impl EmailCommand {
    pub fn requirement(&self) -> Option<Role> {
        match self {
            EmailCommand::List => None,
            _ => Some(Role::Admin),
        }
    }
}

pub(crate) async fn semester(cmd: SemesterCommand, api: &ApiClient) -> Result<String> {
    match cmd {
        SemesterCommand::List => {
            let semesters = api.list_semesters().await?;
            if semesters.is_empty() {
                return Ok("No semesters yet".to_string());
            }
            let mut out = String::new();
            for s in semesters {
                let _ = writeln!(out, "{:>6}  Semester {}", s.semester_id, s.semester_number);
            }
            Ok(out)
        }
        SemesterCommand::Add { number } => {
            let number = api.create_semester(&number).await?;
            Ok(format!("Semester {} added", number))
        }
        SemesterCommand::Update {
            semester_id,
            number,
        } => {
            let number = api.update_semester(semester_id, &number).await?;
            Ok(format!("Semester {} is now semester {}", semester_id, number))
        }
        SemesterCommand::Delete { semester_id } => {
            api.delete_semester(semester_id).await?;
            Ok(format!("Semester {} deleted", semester_id))
        }
    }
}

pub(crate) async fn week(cmd: WeekCommand, api: &ApiClient) -> Result<String> {
    match cmd {
        WeekCommand::List { semester } => {
            let weeks = api.list_weeks(semester).await?;
            if weeks.is_empty() {
                return Ok(format!("No weeks in semester {}", semester));
            }
            let mut out = String::new();
            for w in weeks {
                let _ = writeln!(out, "{:>6}  Week {}", w.week_id, w.week_number);
            }
            Ok(out)
        }
        WeekCommand::All => {
            let weeks = api.list_all_weeks().await?;
            if weeks.is_empty() {
                return Ok("No weeks yet".to_string());
            }
            let mut out = String::new();
            for (semester_number, group) in group_by_semester(&weeks) {
                let _ = writeln!(out, "Semester {}", semester_number);
                for w in group {
                    let _ = writeln!(out, "{:>6}  Week {}", w.week_id, w.week_number);
                }
            }
            Ok(out)
        }
        WeekCommand::Add { semester, number } => {
            let number = api.create_week(semester, &number).await?;
            Ok(format!("Week {} added to semester {}", number, semester))
        }
        WeekCommand::Update { week_id, number } => {
            let number = api.update_week(week_id, &number).await?;
            Ok(format!("Week {} is now week {}", week_id, number))
        }
        WeekCommand::Delete { week_id } => {
            api.delete_week(week_id).await?;
            Ok(format!("Week {} deleted", week_id))
        }
    }
}

pub(crate) async fn matkul(cmd: MatkulCommand, api: &ApiClient) -> Result<String> {
    match cmd {
        MatkulCommand::List => {
            let courses = api.list_matkul().await?;
            if courses.is_empty() {
                return Ok("No courses yet".to_string());
            }
            let mut out = String::new();
            for m in courses {
                let _ = writeln!(out, "{:>12}  {}", m.matkul_id, m.name);
            }
            Ok(out)
        }
        MatkulCommand::Add { name } => {
            api.create_matkul(&name).await?;
            Ok(format!("Course '{}' added", name.trim()))
        }
        MatkulCommand::Update { matkul_id, name } => {
            api.update_matkul(&matkul_id, &name).await?;
            Ok(format!("Course {} renamed to '{}'", matkul_id, name.trim()))
        }
        MatkulCommand::Delete { matkul_id } => {
            api.delete_matkul(&matkul_id).await?;
            Ok(format!("Course {} deleted", matkul_id))
        }
    }
}

pub(crate) async fn email(cmd: EmailCommand, api: &ApiClient) -> Result<String> {
    match cmd {
        EmailCommand::List => {
            let emails = api.list_emails().await?;
            if emails.is_empty() {
                return Ok("No emails registered".to_string());
            }
            let mut out = String::new();
            for e in emails {
                let _ = writeln!(out, "{:>12}  {}", e.email_id, e.email);
            }
            Ok(out)
        }
        EmailCommand::Add { email } => {
            api.create_email(&email).await?;
            Ok(format!("Email {} registered", email.trim()))
        }
        EmailCommand::Update { email_id, email } => {
            api.update_email(&email_id, &email).await?;
            Ok(format!("Email {} changed to {}", email_id, email.trim()))
        }
        EmailCommand::Delete { email_id } => {
            api.delete_email(&email_id).await?;
            Ok(format!("Email {} removed", email_id))
        }
    }
}
