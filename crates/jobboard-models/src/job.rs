//! Job listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::DocumentId;

/// Maximum number of listings returned by the open-jobs query.
pub const AVAILABLE_JOBS_LIMIT: usize = 6;

/// A posted position.
///
/// Every named field is optional: listings are stored as submitted, and any
/// field not named here is carried in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Store-generated identifier
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Category, matched exactly by the job-type filter
    #[serde(rename = "jobType", default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,

    /// Email of the recruiter who posted the job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hr_email: Option<String>,

    /// Last day to apply, `YYYY-MM-DD`
    #[serde(
        rename = "applicationDeadline",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub application_deadline: Option<String>,

    /// Number of applications received; absent until the first one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicants_count: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_logo: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    /// Whether applications are still accepted on `today` (`YYYY-MM-DD`).
    ///
    /// Dates compare as strings, so a missing deadline never matches.
    pub fn is_open_on(&self, today: &str) -> bool {
        self.application_deadline
            .as_deref()
            .is_some_and(|deadline| deadline >= today)
    }
}

/// Today's date in the form deadlines are stored in.
pub fn deadline_cutoff(now: DateTime<Utc>) -> String {
    now.date_naive().format("%Y-%m-%d").to_string()
}

/// Query string accepted by the job listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobQuery {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "jobType", default)]
    pub job_type: Option<String>,
}

/// Filter applied to the job listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobFilter {
    All,
    /// Case-insensitive substring match on `title`
    TitleContains(String),
    /// Exact match on `jobType`
    JobType(String),
}

impl JobFilter {
    /// Build the filter from query parameters.
    ///
    /// The job-type filter replaces the title filter when both are given;
    /// existing clients rely on that. Empty values are ignored.
    pub fn from_query(query: &JobQuery) -> Self {
        let mut filter = JobFilter::All;
        if let Some(title) = query.title.as_deref().filter(|t| !t.is_empty()) {
            filter = JobFilter::TitleContains(title.to_string());
        }
        if let Some(job_type) = query.job_type.as_deref().filter(|t| !t.is_empty()) {
            filter = JobFilter::JobType(job_type.to_string());
        }
        filter
    }

    /// Evaluate the filter against a listing.
    pub fn matches(&self, job: &Job) -> bool {
        match self {
            JobFilter::All => true,
            JobFilter::TitleContains(needle) => job
                .title
                .as_deref()
                .is_some_and(|title| title.to_lowercase().contains(&needle.to_lowercase())),
            JobFilter::JobType(job_type) => job.job_type.as_deref() == Some(job_type.as_str()),
        }
    }
}
