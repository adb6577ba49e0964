//! Applications submitted against job listings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{DocumentId, Job};

/// A candidate's submission for a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Application {
    /// Store-generated identifier
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,

    /// Hex id of the job applied for, kept as a plain string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant_email: Option<String>,

    /// Workflow state such as "pending" or "accepted"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Application {
    /// Parsed reference to the parent job, if `job_id` is a valid id.
    pub fn job_ref(&self) -> Option<DocumentId> {
        self.job_id.as_deref().and_then(|id| DocumentId::parse(id).ok())
    }
}

/// Body of a status change.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Which job fields are copied onto an application when joining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinFields {
    /// `title` and `company`
    Summary,
    /// `title`, `company` and `company_logo`
    WithLogo,
}

impl JoinFields {
    fn keys(self) -> &'static [&'static str] {
        match self {
            JoinFields::Summary => &["title", "company"],
            JoinFields::WithLogo => &["title", "company", "company_logo"],
        }
    }
}

/// An application as returned to clients, with job fields joined at read time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: Application,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_logo: Option<String>,
}

impl ApplicationView {
    /// View without job fields (dangling or missing reference).
    pub fn bare(application: Application) -> Self {
        Self {
            application,
            title: None,
            company: None,
            company_logo: None,
        }
    }

    /// View with the job's fields copied over.
    ///
    /// Joined fields replace same-named fields stored on the application.
    pub fn joined(mut application: Application, job: &Job, fields: JoinFields) -> Self {
        for key in fields.keys() {
            application.extra.remove(*key);
        }
        Self {
            application,
            title: job.title.clone(),
            company: job.company.clone(),
            company_logo: match fields {
                JoinFields::WithLogo => job.company_logo.clone(),
                JoinFields::Summary => None,
            },
        }
    }
}
