//! Dashboard resource operations
//!
//! Typed CRUD over semesters, weeks, tasks, courses and emails. Writes are
//! validated locally first so obviously bad input never reaches the backend.

use crate::api::client::ApiClient;
use crate::api::types::*;
use crate::api::validate;
use crate::error::{ApiResult, Result};
use crate::tracker::parse_deadline;
use crate::util::resource_path;
use futures::future::join_all;
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

/// Fields for a new task, as typed by the user
#[derive(Debug, Clone, Default)]
pub struct TaskInput {
    pub name: String,
    pub matkul: String,
    pub link: String,
    pub deadline: String,
}

impl ApiClient {
    // ------------------------------------------------------------------
    // Semesters
    // ------------------------------------------------------------------

    pub async fn list_semesters(&self) -> ApiResult<Vec<Semester>> {
        self.get_list("/semester").await
    }

    /// Create a semester; the number must be new
    #[instrument(skip(self))]
    pub async fn create_semester(&self, input: &str) -> Result<u32> {
        let number = validate::positive_number("semester", input)?;
        let existing = self.list_semesters().await?;
        validate::unique(
            "semester",
            number,
            existing.iter().map(|s| s.semester_number),
        )?;

        self.post_json(
            "/semester",
            &SemesterBody {
                semester_number: number,
            },
        )
        .await?;
        info!(number, "Semester created");
        Ok(number)
    }

    #[instrument(skip(self))]
    pub async fn update_semester(&self, semester_id: u64, input: &str) -> Result<u32> {
        let number = validate::positive_number("semester", input)?;
        self.put_json(
            &resource_path("/semester", &[&semester_id]),
            &SemesterBody {
                semester_number: number,
            },
        )
        .await?;
        Ok(number)
    }

    pub async fn delete_semester(&self, semester_id: u64) -> ApiResult<()> {
        self.delete(&resource_path("/semester", &[&semester_id]))
            .await
    }

    // ------------------------------------------------------------------
    // Weeks
    // ------------------------------------------------------------------

    pub async fn list_weeks(&self, semester_id: u64) -> ApiResult<Vec<Week>> {
        self.get_list(&resource_path("/week", &[&semester_id]))
            .await
    }

    /// Weeks of every semester, sorted by semester then week number
    ///
    /// One request per semester, issued concurrently and joined; a semester
    /// whose request fails is logged and left out.
    #[instrument(skip(self))]
    pub async fn list_all_weeks(&self) -> ApiResult<Vec<Week>> {
        let semesters = self.list_semesters().await?;

        let fetches = semesters.iter().map(|semester| async move {
            (semester, self.list_weeks(semester.semester_id).await)
        });

        let mut weeks = Vec::new();
        for (semester, result) in join_all(fetches).await {
            match result {
                Ok(batch) => weeks.extend(batch.into_iter().map(|mut week| {
                    week.semester_id = Some(semester.semester_id);
                    week.semester_number.get_or_insert(semester.semester_number);
                    week
                })),
                Err(e) => warn!(
                    semester_id = semester.semester_id,
                    error = %e,
                    "Failed to fetch weeks for semester"
                ),
            }
        }

        sort_weeks(&mut weeks);
        Ok(weeks)
    }

    /// Create a week in a semester; the number must be new there
    #[instrument(skip(self))]
    pub async fn create_week(&self, semester_id: u64, input: &str) -> Result<u32> {
        let number = validate::positive_number("week", input)?;
        let existing = self.list_weeks(semester_id).await?;
        validate::unique("week", number, existing.iter().map(|w| w.week_number))?;

        self.post_json(
            "/week",
            &NewWeek {
                week_number: number,
                semester_id,
            },
        )
        .await?;
        info!(semester_id, number, "Week created");
        Ok(number)
    }

    #[instrument(skip(self))]
    pub async fn update_week(&self, week_id: u64, input: &str) -> Result<u32> {
        let number = validate::positive_number("week", input)?;
        self.put_json(
            &resource_path("/week", &[&week_id]),
            &WeekBody {
                week_number: number,
            },
        )
        .await?;
        Ok(number)
    }

    pub async fn delete_week(&self, week_id: u64) -> ApiResult<()> {
        self.delete(&resource_path("/week", &[&week_id])).await
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    pub async fn list_tasks(&self, semester_id: u64, week_id: u64) -> ApiResult<Vec<Task>> {
        self.get_list(&resource_path("/task", &[&semester_id, &week_id]))
            .await
    }

    /// Create a task; name, course and a parseable deadline are required
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_task(&self, semester_id: u64, week_id: u64, input: &TaskInput) -> Result<()> {
        let name = validate::required("name", &input.name)?;
        let matkul = validate::required("matkul", &input.matkul)?;
        let deadline = validate::required("deadline", &input.deadline)?;
        parse_deadline(&deadline)?;

        self.post_json(
            "/task",
            &NewTask {
                name,
                matkul,
                link: input.link.trim().to_string(),
                deadline,
                semester_id,
                week_id,
            },
        )
        .await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Courses
    // ------------------------------------------------------------------

    pub async fn list_matkul(&self) -> ApiResult<Vec<Matkul>> {
        self.get_list("/matkul").await
    }

    pub async fn create_matkul(&self, name: &str) -> Result<()> {
        let name = validate::required("matkul name", name)?;
        self.post_json("/matkul", &MatkulBody { name }).await?;
        Ok(())
    }

    pub async fn update_matkul(&self, matkul_id: &str, name: &str) -> Result<()> {
        let name = validate::required("matkul name", name)?;
        self.put_json(&resource_path("/matkul", &[&matkul_id]), &MatkulBody { name })
            .await?;
        Ok(())
    }

    pub async fn delete_matkul(&self, matkul_id: &str) -> ApiResult<()> {
        self.delete(&resource_path("/matkul", &[&matkul_id])).await
    }

    // ------------------------------------------------------------------
    // Emails
    // ------------------------------------------------------------------

    pub async fn list_emails(&self) -> ApiResult<Vec<EmailEntry>> {
        self.get_list("/email").await
    }

    pub async fn create_email(&self, email: &str) -> Result<()> {
        let email = validate::email(email)?;
        self.post_json("/email", &EmailBody { email }).await?;
        Ok(())
    }

    pub async fn update_email(&self, email_id: &str, email: &str) -> Result<()> {
        let email = validate::email(email)?;
        self.put_json(&resource_path("/email", &[&email_id]), &EmailBody { email })
            .await?;
        Ok(())
    }

    pub async fn delete_email(&self, email_id: &str) -> ApiResult<()> {
        self.delete(&resource_path("/email", &[&email_id])).await
    }
}

/// Order weeks by semester number, then week number
pub fn sort_weeks(weeks: &mut [Week]) {
    weeks.sort_by_key(|w| (w.semester_number.unwrap_or(0), w.week_number));
}

/// Group weeks by semester number, each group in input order
pub fn group_by_semester(weeks: &[Week]) -> BTreeMap<u32, Vec<&Week>> {
    let mut groups: BTreeMap<u32, Vec<&Week>> = BTreeMap::new();
    for week in weeks {
        groups
            .entry(week.semester_number.unwrap_or(0))
            .or_default()
            .push(week);
    }
    groups
}
