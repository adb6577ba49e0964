//! MongoDB-backed document store.
//!
//! Documents are written through `bson` serialization and read back through
//! relaxed extended JSON, so model types only ever see JSON-shaped values.

use std::future::Future;
use std::time::Instant;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::options::{ClientOptions, FindOptions};
use mongodb::results::UpdateResult;
use mongodb::{Client, Collection, Database};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info_span, warn, Instrument};

use jobboard_models::{
    Application, DeleteAck, DocumentId, InsertAck, Job, JobFilter, UpdateAck,
};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::metrics::record_operation;
use crate::repos::{ApplicationRepository, DocumentStore, JobRepository};

const JOBS: &str = "jobs";
const APPLICATIONS: &str = "applications";

/// Document store backed by a MongoDB database.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
    jobs: Collection<Document>,
    applications: Collection<Document>,
}

impl MongoStore {
    /// Create a store for `config.database`.
    ///
    /// Parsing the URI may resolve SRV records; no server connection is made
    /// until the first operation.
    pub async fn new(config: &StoreConfig) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        if let Some(app_name) = &config.app_name {
            options.app_name = Some(app_name.clone());
        }
        let client = Client::with_options(options)?;
        let db = client.database(&config.database);
        debug!(database = %config.database, "MongoDB client created");

        Ok(Self {
            jobs: db.collection(JOBS),
            applications: db.collection(APPLICATIONS),
            db,
        })
    }

    /// Run a store operation inside a span and record its outcome.
    async fn observe<T, F>(&self, operation: &'static str, collection: &str, fut: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        let span = info_span!("store_request", operation = %operation, collection = %collection);

        let start = Instant::now();
        let result = fut.instrument(span).await;
        record_operation(operation, result.is_ok(), start.elapsed().as_secs_f64());

        if let Err(e) = &result {
            warn!(operation, collection, error = %e, "Store operation failed");
        }
        result
    }
}

// =============================================================================
// Conversions
// =============================================================================

fn id_filter(id: &DocumentId) -> Document {
    doc! { "_id": id.as_object_id() }
}

/// Serialize a model for insertion, leaving `_id` to the server.
fn to_document<T: Serialize>(value: &T) -> StoreResult<Document> {
    let mut document = bson::to_document(value)?;
    document.remove("_id");
    Ok(document)
}

fn from_document<T: DeserializeOwned>(document: Document) -> StoreResult<T> {
    let value = Bson::Document(document).into_relaxed_extjson();
    Ok(serde_json::from_value(value)?)
}

fn job_filter_to_document(filter: &JobFilter) -> Document {
    match filter {
        JobFilter::All => Document::new(),
        JobFilter::TitleContains(needle) => doc! {
            "title": { "$regex": regex::escape(needle), "$options": "i" }
        },
        JobFilter::JobType(job_type) => doc! { "jobType": job_type.as_str() },
    }
}

fn inserted_id(inserted: &Bson) -> StoreResult<DocumentId> {
    inserted
        .as_object_id()
        .map(DocumentId::from)
        .ok_or_else(|| StoreError::UnexpectedResponse(format!("non-ObjectId _id {}", inserted)))
}

fn update_ack(result: &UpdateResult) -> UpdateAck {
    let upserted_id = result
        .upserted_id
        .as_ref()
        .and_then(Bson::as_object_id)
        .map(DocumentId::from);
    UpdateAck {
        acknowledged: true,
        matched_count: result.matched_count,
        modified_count: result.modified_count,
        upserted_count: u64::from(upserted_id.is_some()),
        upserted_id,
    }
}

async fn find_many<T: DeserializeOwned>(
    collection: &Collection<Document>,
    filter: Document,
    options: Option<FindOptions>,
) -> StoreResult<Vec<T>> {
    let cursor = collection.find(filter, options).await?;
    let documents: Vec<Document> = cursor.try_collect().await?;
    documents.into_iter().map(from_document).collect()
}

async fn find_one<T: DeserializeOwned>(
    collection: &Collection<Document>,
    id: &DocumentId,
) -> StoreResult<Option<T>> {
    collection
        .find_one(id_filter(id), None)
        .await?
        .map(from_document)
        .transpose()
}

// =============================================================================
// Repositories
// =============================================================================

#[async_trait]
impl JobRepository for MongoStore {
    async fn find_jobs(&self, filter: &JobFilter) -> StoreResult<Vec<Job>> {
        self.observe("find_jobs", JOBS, async {
            find_many(&self.jobs, job_filter_to_document(filter), None).await
        })
        .await
    }

    async fn open_jobs(&self, today: &str, limit: usize) -> StoreResult<Vec<Job>> {
        self.observe("open_jobs", JOBS, async {
            let options = FindOptions::builder().limit(limit as i64).build();
            find_many(
                &self.jobs,
                doc! { "applicationDeadline": { "$gte": today } },
                Some(options),
            )
            .await
        })
        .await
    }

    async fn jobs_by_hr_email(&self, hr_email: &str) -> StoreResult<Vec<Job>> {
        self.observe("jobs_by_hr_email", JOBS, async {
            find_many(&self.jobs, doc! { "hr_email": hr_email }, None).await
        })
        .await
    }

    async fn get_job(&self, id: &DocumentId) -> StoreResult<Option<Job>> {
        self.observe("get_job", JOBS, find_one(&self.jobs, id)).await
    }

    async fn insert_job(&self, job: Job) -> StoreResult<InsertAck> {
        self.observe("insert_job", JOBS, async {
            let result = self.jobs.insert_one(to_document(&job)?, None).await?;
            Ok(InsertAck::new(inserted_id(&result.inserted_id)?))
        })
        .await
    }

    async fn update_job(
        &self,
        id: &DocumentId,
        fields: Map<String, Value>,
    ) -> StoreResult<UpdateAck> {
        self.observe("update_job", JOBS, async {
            let mut set = Document::new();
            for (key, value) in fields {
                if key != "_id" {
                    set.insert(key, bson::to_bson(&value)?);
                }
            }

            // Older servers reject an empty $set.
            if set.is_empty() {
                let matched = self.jobs.count_documents(id_filter(id), None).await?;
                return Ok(UpdateAck::new(matched.min(1), 0));
            }

            let result = self
                .jobs
                .update_one(id_filter(id), doc! { "$set": set }, None)
                .await?;
            Ok(update_ack(&result))
        })
        .await
    }

    async fn delete_job(&self, id: &DocumentId) -> StoreResult<DeleteAck> {
        self.observe("delete_job", JOBS, async {
            let result = self.jobs.delete_one(id_filter(id), None).await?;
            Ok(DeleteAck::new(result.deleted_count))
        })
        .await
    }

    async fn increment_applicants(&self, id: &DocumentId) -> StoreResult<UpdateAck> {
        self.observe("increment_applicants", JOBS, async {
            let result = self
                .jobs
                .update_one(id_filter(id), doc! { "$inc": { "applicants_count": 1 } }, None)
                .await?;
            Ok(update_ack(&result))
        })
        .await
    }
}

#[async_trait]
impl ApplicationRepository for MongoStore {
    async fn all_applications(&self) -> StoreResult<Vec<Application>> {
        self.observe("all_applications", APPLICATIONS, async {
            find_many(&self.applications, Document::new(), None).await
        })
        .await
    }

    async fn get_application(&self, id: &DocumentId) -> StoreResult<Option<Application>> {
        self.observe("get_application", APPLICATIONS, find_one(&self.applications, id))
            .await
    }

    async fn applications_by_applicant(&self, email: &str) -> StoreResult<Vec<Application>> {
        self.observe("applications_by_applicant", APPLICATIONS, async {
            find_many(&self.applications, doc! { "applicant_email": email }, None).await
        })
        .await
    }

    async fn applications_for_job(&self, job_id: &str) -> StoreResult<Vec<Application>> {
        self.observe("applications_for_job", APPLICATIONS, async {
            find_many(&self.applications, doc! { "job_id": job_id }, None).await
        })
        .await
    }

    async fn insert_application(&self, application: Application) -> StoreResult<InsertAck> {
        self.observe("insert_application", APPLICATIONS, async {
            let result = self
                .applications
                .insert_one(to_document(&application)?, None)
                .await?;
            Ok(InsertAck::new(inserted_id(&result.inserted_id)?))
        })
        .await
    }

    async fn set_application_status(
        &self,
        id: &DocumentId,
        status: &str,
    ) -> StoreResult<UpdateAck> {
        self.observe("set_application_status", APPLICATIONS, async {
            let result = self
                .applications
                .update_one(id_filter(id), doc! { "$set": { "status": status } }, None)
                .await?;
            Ok(update_ack(&result))
        })
        .await
    }

    async fn delete_application(&self, id: &DocumentId) -> StoreResult<DeleteAck> {
        self.observe("delete_application", APPLICATIONS, async {
            let result = self.applications.delete_one(id_filter(id), None).await?;
            Ok(DeleteAck::new(result.deleted_count))
        })
        .await
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> StoreResult<()> {
        self.observe("ping", "admin", async {
            self.db.run_command(doc! { "ping": 1 }, None).await?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_title_filter_escapes_regex() {
        let filter = job_filter_to_document(&JobFilter::TitleContains("C++ (Senior)".into()));
        let title = filter.get_document("title").unwrap();
        assert_eq!(title.get_str("$regex").unwrap(), r"C\+\+ \(Senior\)");
        assert_eq!(title.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_job_type_filter_is_equality() {
        let filter = job_filter_to_document(&JobFilter::JobType("Remote".into()));
        assert_eq!(filter, doc! { "jobType": "Remote" });
        assert!(job_filter_to_document(&JobFilter::All).is_empty());
    }

    #[test]
    fn test_to_document_drops_id() {
        let job = Job {
            id: Some(DocumentId::new()),
            title: Some("Rust Dev".into()),
            ..Default::default()
        };
        let document = to_document(&job).unwrap();
        assert!(!document.contains_key("_id"));
        assert_eq!(document.get_str("title").unwrap(), "Rust Dev");
    }

    #[test]
    fn test_from_document_reads_object_id_and_extras() {
        let oid = bson::oid::ObjectId::new();
        let document = doc! {
            "_id": oid,
            "title": "Rust Dev",
            "applicants_count": 3_i32,
            "salary": { "min": 10, "max": 20 },
        };
        let job: Job = from_document(document).unwrap();
        assert_eq!(job.id.map(|id| id.to_hex()), Some(oid.to_hex()));
        assert_eq!(job.applicants_count, Some(3));
        assert_eq!(job.extra["salary"], json!({ "min": 10, "max": 20 }));
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB (MONGODB_URI)"]
    async fn test_round_trip_against_server() {
        let config = StoreConfig::from_env().unwrap();
        let store = MongoStore::new(&config).await.unwrap();
        store.ping().await.unwrap();

        let ack = store
            .insert_job(Job {
                title: Some("Integration".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        store.increment_applicants(&ack.inserted_id).await.unwrap();
        let job = store.get_job(&ack.inserted_id).await.unwrap().unwrap();
        assert_eq!(job.applicants_count, Some(1));
        store.delete_job(&ack.inserted_id).await.unwrap();
    }
}
