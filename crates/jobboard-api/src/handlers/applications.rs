//! Application handlers.

use axum::extract::State;
use axum::Json;
use serde_json::{Map, Value};
use tracing::info;

use jobboard_models::{
    Application, ApplicationView, DeleteAck, DocumentId, InsertAck, JoinFields, StatusUpdate,
    UpdateAck,
};

use crate::auth::SessionUser;
use crate::error::{ApiJson, ApiPath, ApiResult};
use crate::handlers::typed_body;
use crate::state::AppState;

/// `GET /applications`: every application with its job's title and company.
pub async fn list_applications(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ApplicationView>>> {
    let applications = state.store.all_applications().await?;
    Ok(Json(
        state.applications.join(applications, JoinFields::Summary).await?,
    ))
}

/// `GET /applications/:id`
pub async fn get_application(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<Option<Application>>> {
    let id = DocumentId::parse(&id)?;
    Ok(Json(state.store.get_application(&id).await?))
}

/// `GET /user-applications/:email`: the signed-in applicant's applications.
pub async fn user_applications(
    user: SessionUser,
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> ApiResult<Json<Vec<ApplicationView>>> {
    user.ensure_owner(&email)?;
    let applications = state.store.applications_by_applicant(&email).await?;
    Ok(Json(
        state.applications.join(applications, JoinFields::Summary).await?,
    ))
}

/// `GET /applications/jobs/:job_id`: applications for one listing.
pub async fn job_applications(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<String>,
) -> ApiResult<Json<Vec<ApplicationView>>> {
    let applications = state.store.applications_for_job(&job_id).await?;
    Ok(Json(
        state.applications.join(applications, JoinFields::WithLogo).await?,
    ))
}

/// `POST /applications`
pub async fn create_application(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Map<String, Value>>,
) -> ApiResult<Json<InsertAck>> {
    let application: Application = typed_body(body, "application")?;
    Ok(Json(state.applications.submit(application).await?))
}

/// `PATCH /applications/:id`: change the status and nothing else.
pub async fn update_application_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(update): ApiJson<StatusUpdate>,
) -> ApiResult<Json<UpdateAck>> {
    let id = DocumentId::parse(&id)?;
    let ack = state.store.set_application_status(&id, &update.status).await?;
    info!(application_id = %id, status = %update.status, "Application status updated");
    Ok(Json(ack))
}

/// `DELETE /applications/:id`. The job's applicant count is left as is.
pub async fn delete_application(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<DeleteAck>> {
    let id = DocumentId::parse(&id)?;
    Ok(Json(state.store.delete_application(&id).await?))
}
