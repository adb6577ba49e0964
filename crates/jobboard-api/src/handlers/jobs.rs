//! Job listing handlers.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, info};

use jobboard_models::{
    deadline_cutoff, DeleteAck, DocumentId, InsertAck, Job, JobFilter, JobQuery, UpdateAck,
    AVAILABLE_JOBS_LIMIT,
};

use crate::auth::SessionUser;
use crate::error::{ApiError, ApiJson, ApiPath, ApiQuery, ApiResult};
use crate::handlers::typed_body;
use crate::state::AppState;

/// `GET /jobs`: all listings, optionally filtered by `title` or `jobType`.
pub async fn list_jobs(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<JobQuery>,
) -> ApiResult<Json<Vec<Job>>> {
    let filter = JobFilter::from_query(&query);
    debug!(?filter, "Listing jobs");
    Ok(Json(state.store.find_jobs(&filter).await?))
}

/// `GET /availableJobs`: listings whose deadline has not passed.
pub async fn available_jobs(State(state): State<AppState>) -> ApiResult<Json<Vec<Job>>> {
    let today = deadline_cutoff(Utc::now());
    Ok(Json(
        state.store.open_jobs(&today, AVAILABLE_JOBS_LIMIT).await?,
    ))
}

/// `GET /jobs/:id`
pub async fn get_job(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<Option<Job>>> {
    let id = DocumentId::parse(&id)?;
    Ok(Json(state.store.get_job(&id).await?))
}

/// `GET /user-jobs/:email`: listings posted by the signed-in recruiter.
pub async fn user_jobs(
    user: SessionUser,
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> ApiResult<Json<Vec<Job>>> {
    user.ensure_owner(&email)?;
    Ok(Json(state.store.jobs_by_hr_email(&email).await?))
}

/// `POST /jobs`
pub async fn create_job(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Map<String, Value>>,
) -> ApiResult<Json<InsertAck>> {
    let job: Job = typed_body(body, "job")?;
    let ack = state.store.insert_job(job).await?;
    info!(job_id = %ack.inserted_id, "Job created");
    Ok(Json(ack))
}

/// `PUT /jobs/:id`: merge the body's fields into the listing.
pub async fn update_job(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(mut fields): ApiJson<Map<String, Value>>,
) -> ApiResult<Json<UpdateAck>> {
    let id = DocumentId::parse(&id)?;
    fields.remove("_id");

    // Known fields must keep their types; the counter must stay numeric.
    typed_body::<Job>(fields.clone(), "job")?;
    if fields.get("applicants_count").is_some_and(Value::is_null) {
        return Err(ApiError::bad_request("applicants_count must be a number"));
    }

    let ack = state.store.update_job(&id, fields).await?;
    info!(job_id = %id, matched = ack.matched_count, "Job updated");
    Ok(Json(ack))
}

/// `DELETE /jobs/:id`. Applications referencing the job are kept.
pub async fn delete_job(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<DeleteAck>> {
    let id = DocumentId::parse(&id)?;
    let ack = state.store.delete_job(&id).await?;
    info!(job_id = %id, deleted = ack.deleted_count, "Job deleted");
    Ok(Json(ack))
}
