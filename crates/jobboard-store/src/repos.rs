//! Repository traits for the two collections.

use async_trait::async_trait;
use serde_json::{Map, Value};

use jobboard_models::{
    Application, DeleteAck, DocumentId, InsertAck, Job, JobFilter, UpdateAck,
};

use crate::error::StoreResult;

/// Access to the `jobs` collection.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Listings matching `filter`, in store order.
    async fn find_jobs(&self, filter: &JobFilter) -> StoreResult<Vec<Job>>;

    /// Up to `limit` listings whose deadline is `today` or later.
    async fn open_jobs(&self, today: &str, limit: usize) -> StoreResult<Vec<Job>>;

    /// Listings posted by `hr_email`.
    async fn jobs_by_hr_email(&self, hr_email: &str) -> StoreResult<Vec<Job>>;

    async fn get_job(&self, id: &DocumentId) -> StoreResult<Option<Job>>;

    /// Insert a listing. Any `_id` on `job` is ignored.
    async fn insert_job(&self, job: Job) -> StoreResult<InsertAck>;

    /// Overwrite the given top-level fields, leaving the rest untouched.
    async fn update_job(&self, id: &DocumentId, fields: Map<String, Value>)
        -> StoreResult<UpdateAck>;

    async fn delete_job(&self, id: &DocumentId) -> StoreResult<DeleteAck>;

    /// Atomically add one to `applicants_count`, creating it if absent.
    async fn increment_applicants(&self, id: &DocumentId) -> StoreResult<UpdateAck>;
}

/// Access to the `applications` collection.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn all_applications(&self) -> StoreResult<Vec<Application>>;

    async fn get_application(&self, id: &DocumentId) -> StoreResult<Option<Application>>;

    async fn applications_by_applicant(&self, email: &str) -> StoreResult<Vec<Application>>;

    /// Applications whose `job_id` string equals `job_id`.
    async fn applications_for_job(&self, job_id: &str) -> StoreResult<Vec<Application>>;

    /// Insert an application. Any `_id` on `application` is ignored.
    async fn insert_application(&self, application: Application) -> StoreResult<InsertAck>;

    /// Overwrite only the `status` field.
    async fn set_application_status(&self, id: &DocumentId, status: &str)
        -> StoreResult<UpdateAck>;

    async fn delete_application(&self, id: &DocumentId) -> StoreResult<DeleteAck>;
}

/// A store holding both collections.
#[async_trait]
pub trait DocumentStore: JobRepository + ApplicationRepository {
    /// Backend name for logs and readiness output.
    fn backend(&self) -> &'static str;

    /// Round-trip to the store to check it is reachable.
    async fn ping(&self) -> StoreResult<()>;
}
