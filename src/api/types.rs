//! Dashboard API types
//!
//! Resources as the backend serves them, plus the request bodies it accepts.

use serde::{Deserialize, Serialize};

/// Semester
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    pub semester_id: u64,
    pub semester_number: u32,
}

/// Week within a semester
///
/// The per-semester listing does not always repeat the semester; the
/// aggregated listing fills both fields in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub week_id: u64,
    pub week_number: u32,
    #[serde(default)]
    pub semester_id: Option<u64>,
    #[serde(default)]
    pub semester_number: Option<u32>,
}

/// Task with a deadline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: u64,
    #[serde(default)]
    pub user_id: Option<String>,
    pub week_id: u64,
    pub semester_id: u64,
    pub name: String,
    pub matkul: String,
    #[serde(default)]
    pub link: String,
    pub deadline: String,
}

/// Course ("mata kuliah")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matkul {
    pub matkul_id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Registered email address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailEntry {
    pub email_id: String,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body for creating or renumbering a semester
#[derive(Debug, Clone, Serialize)]
pub struct SemesterBody {
    pub semester_number: u32,
}

/// Body for creating a week
#[derive(Debug, Clone, Serialize)]
pub struct NewWeek {
    pub week_number: u32,
    pub semester_id: u64,
}

/// Body for renumbering a week
#[derive(Debug, Clone, Serialize)]
pub struct WeekBody {
    pub week_number: u32,
}

/// Body for creating a task
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub name: String,
    pub matkul: String,
    pub link: String,
    pub deadline: String,
    pub semester_id: u64,
    pub week_id: u64,
}

/// Body for creating or renaming a course
#[derive(Debug, Clone, Serialize)]
pub struct MatkulBody {
    pub name: String,
}

/// Body for creating or changing an email
#[derive(Debug, Clone, Serialize)]
pub struct EmailBody {
    pub email: String,
}
