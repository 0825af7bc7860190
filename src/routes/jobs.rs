use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::job_dto::{CreateJobApplicationPayload, JobListQuery, UpdateJobApplicationPayload},
    error::Result,
    middleware::auth::AuthUser,
    services::job_service::is_valid_score,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(
        ("skip" = Option<i64>, Query, description = "Number of items to skip"),
        ("limit" = Option<i64>, Query, description = "Maximum items to return"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "Job applications owned by the caller", body = Vec<JobApplication>)
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let items = state.job_service.list(auth.id, query).await?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobApplicationPayload,
    responses(
        (status = 201, description = "Job application created", body = JobApplication),
        (status = 400, description = "Invalid payload or unknown reference")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateJobApplicationPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.create(auth.id, payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job application ID")),
    responses(
        (status = 200, description = "Job application found", body = JobApplication),
        (status = 404, description = "Job application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get(auth.id, id).await?;
    Ok(Json(job))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job application ID")),
    request_body = UpdateJobApplicationPayload,
    responses(
        (status = 200, description = "Job application updated", body = JobApplication),
        (status = 400, description = "Invalid payload or unknown reference"),
        (status = 404, description = "Job application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobApplicationPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.update(auth.id, id, payload).await?;
    Ok(Json(job))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job application ID")),
    responses(
        (status = 204, description = "Job application deleted"),
        (status = 404, description = "Job application not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.job_service.delete(auth.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Scores a resume against the application's job description.
///
/// A parsed in-range score is written to the application; degraded results are returned but not stored.
#[utoipa::path(
    get,
    path = "/api/jobs/{id}/match-score/{resume_id}",
    params(
        ("id" = Uuid, Path, description = "Job application ID"),
        ("resume_id" = Uuid, Path, description = "Resume ID")
    ),
    responses(
        (status = 200, description = "Match score", body = MatchScore),
        (status = 404, description = "Job application or resume not found"),
        (status = 502, description = "AI provider failed")
    )
)]
#[axum::debug_handler]
pub async fn get_match_score(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((id, resume_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get(auth.id, id).await?;
    let resume = state.resume_service.get(auth.id, resume_id).await?;

    let outcome = state
        .ai_service
        .calculate_job_match_score(&resume.content, &job.job_description)
        .await?;

    let score = outcome.score().value();
    if outcome.is_degraded() {
        tracing::info!(job_id = %id, "Match score degraded; stored score left unchanged");
    } else if let Some(score) = score.filter(|s| is_valid_score(*s)) {
        state.job_service.set_match_score(auth.id, id, score).await?;
    } else {
        tracing::warn!(job_id = %id, score = ?score, "Model returned an out-of-range match score; not stored");
    }

    Ok(Json(outcome))
}
