//! In-process document store.
//!
//! Documents are kept in id order, which is also insertion order because
//! generated ids increase monotonically. Every write runs under the
//! collection's write lock.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use jobboard_models::{
    Application, DeleteAck, DocumentId, InsertAck, Job, JobFilter, UpdateAck,
};

use crate::error::{StoreError, StoreResult};
use crate::repos::{ApplicationRepository, DocumentStore, JobRepository};

/// Document store backed by in-memory maps.
#[derive(Default)]
pub struct MemoryStore {
    jobs: RwLock<BTreeMap<DocumentId, Job>>,
    applications: RwLock<BTreeMap<DocumentId, Application>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Apply a `$set`-style merge of `fields` onto `job`.
fn merge_fields(job: &Job, fields: Map<String, Value>) -> StoreResult<Job> {
    let mut doc = match serde_json::to_value(job)? {
        Value::Object(map) => map,
        _ => return Err(StoreError::invalid_document("job is not an object")),
    };
    for (key, value) in fields {
        if key != "_id" {
            doc.insert(key, value);
        }
    }
    let mut merged: Job = serde_json::from_value(Value::Object(doc))
        .map_err(|e| StoreError::invalid_document(e.to_string()))?;
    merged.id = job.id;
    Ok(merged)
}

#[async_trait]
impl JobRepository for MemoryStore {
    async fn find_jobs(&self, filter: &JobFilter) -> StoreResult<Vec<Job>> {
        let jobs = self.jobs.read().await;
        Ok(jobs.values().filter(|j| filter.matches(j)).cloned().collect())
    }

    async fn open_jobs(&self, today: &str, limit: usize) -> StoreResult<Vec<Job>> {
        let jobs = self.jobs.read().await;
        Ok(jobs
            .values()
            .filter(|j| j.is_open_on(today))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn jobs_by_hr_email(&self, hr_email: &str) -> StoreResult<Vec<Job>> {
        let jobs = self.jobs.read().await;
        Ok(jobs
            .values()
            .filter(|j| j.hr_email.as_deref() == Some(hr_email))
            .cloned()
            .collect())
    }

    async fn get_job(&self, id: &DocumentId) -> StoreResult<Option<Job>> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn insert_job(&self, mut job: Job) -> StoreResult<InsertAck> {
        let id = DocumentId::new();
        job.id = Some(id);
        self.jobs.write().await.insert(id, job);
        Ok(InsertAck::new(id))
    }

    async fn update_job(
        &self,
        id: &DocumentId,
        fields: Map<String, Value>,
    ) -> StoreResult<UpdateAck> {
        let mut jobs = self.jobs.write().await;
        let Some(current) = jobs.get_mut(id) else {
            return Ok(UpdateAck::unmatched());
        };
        let merged = merge_fields(current, fields)?;
        if merged == *current {
            return Ok(UpdateAck::new(1, 0));
        }
        *current = merged;
        Ok(UpdateAck::new(1, 1))
    }

    async fn delete_job(&self, id: &DocumentId) -> StoreResult<DeleteAck> {
        let removed = self.jobs.write().await.remove(id);
        Ok(DeleteAck::new(removed.map_or(0, |_| 1)))
    }

    async fn increment_applicants(&self, id: &DocumentId) -> StoreResult<UpdateAck> {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(id) {
            Some(job) => {
                job.applicants_count = Some(job.applicants_count.unwrap_or(0) + 1);
                Ok(UpdateAck::new(1, 1))
            }
            None => Ok(UpdateAck::unmatched()),
        }
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn all_applications(&self) -> StoreResult<Vec<Application>> {
        Ok(self.applications.read().await.values().cloned().collect())
    }

    async fn get_application(&self, id: &DocumentId) -> StoreResult<Option<Application>> {
        Ok(self.applications.read().await.get(id).cloned())
    }

    async fn applications_by_applicant(&self, email: &str) -> StoreResult<Vec<Application>> {
        let applications = self.applications.read().await;
        Ok(applications
            .values()
            .filter(|a| a.applicant_email.as_deref() == Some(email))
            .cloned()
            .collect())
    }

    async fn applications_for_job(&self, job_id: &str) -> StoreResult<Vec<Application>> {
        let applications = self.applications.read().await;
        Ok(applications
            .values()
            .filter(|a| a.job_id.as_deref() == Some(job_id))
            .cloned()
            .collect())
    }

    async fn insert_application(&self, mut application: Application) -> StoreResult<InsertAck> {
        let id = DocumentId::new();
        application.id = Some(id);
        self.applications.write().await.insert(id, application);
        Ok(InsertAck::new(id))
    }

    async fn set_application_status(
        &self,
        id: &DocumentId,
        status: &str,
    ) -> StoreResult<UpdateAck> {
        let mut applications = self.applications.write().await;
        match applications.get_mut(id) {
            Some(application) if application.status.as_deref() == Some(status) => {
                Ok(UpdateAck::new(1, 0))
            }
            Some(application) => {
                application.status = Some(status.to_string());
                Ok(UpdateAck::new(1, 1))
            }
            None => Ok(UpdateAck::unmatched()),
        }
    }

    async fn delete_application(&self, id: &DocumentId) -> StoreResult<DeleteAck> {
        let removed = self.applications.write().await.remove(id);
        Ok(DeleteAck::new(removed.map_or(0, |_| 1)))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
