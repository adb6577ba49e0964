//! Application submission and the read-time job join.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use jobboard_models::{Application, ApplicationView, DocumentId, InsertAck, Job, JoinFields};
use jobboard_store::DocumentStore;

use crate::error::{ApiError, ApiResult};
use crate::metrics;

/// Service for applications that touch more than one collection.
#[derive(Clone)]
pub struct ApplicationService {
    store: Arc<dyn DocumentStore>,
}

impl ApplicationService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Store a new application and bump its job's applicant counter.
    ///
    /// The referenced job must exist; otherwise nothing is written.
    pub async fn submit(&self, application: Application) -> ApiResult<InsertAck> {
        let job_id = match application.job_id.as_deref() {
            None => return Err(ApiError::bad_request("job_id is required")),
            Some(raw) => DocumentId::parse(raw)?,
        };

        if self.store.get_job(&job_id).await?.is_none() {
            return Err(ApiError::not_found("Job not found"));
        }

        let ack = self.store.insert_application(application).await?;
        let counted = self.store.increment_applicants(&job_id).await?;
        if counted.matched_count == 0 {
            // Job removed between the existence check and the increment.
            warn!(job_id = %job_id, application_id = %ack.inserted_id, "Applicant count not updated");
        }

        metrics::record_application_submitted();
        info!(job_id = %job_id, application_id = %ack.inserted_id, "Application submitted");
        Ok(ack)
    }

    /// Copy job fields onto each application.
    ///
    /// Each distinct job is fetched once. Applications whose `job_id` is
    /// missing, malformed or dangling are returned as-is.
    pub async fn join(
        &self,
        applications: Vec<Application>,
        fields: JoinFields,
    ) -> ApiResult<Vec<ApplicationView>> {
        let mut jobs: HashMap<DocumentId, Option<Job>> = HashMap::new();
        let mut views = Vec::with_capacity(applications.len());

        for application in applications {
            let Some(job_id) = application.job_ref() else {
                views.push(ApplicationView::bare(application));
                continue;
            };

            if !jobs.contains_key(&job_id) {
                let job = self.store.get_job(&job_id).await?;
                jobs.insert(job_id, job);
            }

            let view = match jobs.get(&job_id).and_then(Option::as_ref) {
                Some(job) => ApplicationView::joined(application, job, fields),
                None => ApplicationView::bare(application),
            };
            views.push(view);
        }

        debug!(rows = views.len(), jobs = jobs.len(), "Joined applications");
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use jobboard_store::{ApplicationRepository, JobRepository, MemoryStore};

    use super::*;

    fn application(job_id: Option<String>) -> Application {
        Application {
            job_id,
            applicant_email: Some("jane@mail.com".into()),
            ..Default::default()
        }
    }

    async fn seeded() -> (ApplicationService, Arc<MemoryStore>, DocumentId) {
        let store = Arc::new(MemoryStore::new());
        let ack = store
            .insert_job(Job {
                title: Some("Rust Dev".into()),
                company: Some("Acme".into()),
                company_logo: Some("https://acme.io/logo.png".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        (ApplicationService::new(store.clone()), store, ack.inserted_id)
    }

    #[tokio::test]
    async fn test_submit_increments_counter() {
        let (service, store, job_id) = seeded().await;
        service.submit(application(Some(job_id.to_hex()))).await.unwrap();
        service.submit(application(Some(job_id.to_hex()))).await.unwrap();

        let job = store.get_job(&job_id).await.unwrap().unwrap();
        assert_eq!(job.applicants_count, Some(2));
    }

    #[tokio::test]
    async fn test_submit_rejects_bad_references() {
        let (service, store, _) = seeded().await;

        let err = service.submit(application(None)).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err = service.submit(application(Some("nope".into()))).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let missing = DocumentId::new().to_hex();
        let err = service.submit(application(Some(missing))).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        assert!(store.all_applications().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_join_fields() {
        let (service, _, job_id) = seeded().await;
        let rows = vec![
            application(Some(job_id.to_hex())),
            application(Some(DocumentId::new().to_hex())),
            application(None),
        ];

        let views = service.join(rows.clone(), JoinFields::Summary).await.unwrap();
        assert_eq!(views[0].title.as_deref(), Some("Rust Dev"));
        assert_eq!(views[0].company.as_deref(), Some("Acme"));
        assert_eq!(views[0].company_logo, None);
        assert_eq!(views[1].title, None);
        assert_eq!(views[2].title, None);

        let views = service.join(rows, JoinFields::WithLogo).await.unwrap();
        assert_eq!(views[0].company_logo.as_deref(), Some("https://acme.io/logo.png"));
    }
}
