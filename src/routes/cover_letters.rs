use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        cover_letter_dto::{
            CreateCoverLetterPayload, GenerateCoverLetterPayload, UpdateCoverLetterPayload,
        },
        list_query::ListQuery,
    },
    error::{Error, Result},
    middleware::auth::AuthUser,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/cover-letters",
    params(
        ("skip" = Option<i64>, Query, description = "Number of items to skip"),
        ("limit" = Option<i64>, Query, description = "Maximum items to return")
    ),
    responses(
        (status = 200, description = "Cover letters owned by the caller", body = Vec<CoverLetter>)
    )
)]
#[axum::debug_handler]
pub async fn list_cover_letters(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let items = state.cover_letter_service.list(auth.id, query).await?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/cover-letters",
    request_body = CreateCoverLetterPayload,
    responses(
        (status = 201, description = "Cover letter created", body = CoverLetter),
        (status = 400, description = "Invalid payload or unknown resume")
    )
)]
#[axum::debug_handler]
pub async fn create_cover_letter(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateCoverLetterPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let letter = state.cover_letter_service.create(auth.id, payload).await?;
    Ok((StatusCode::CREATED, Json(letter)))
}

/// Drafts a cover letter from one of the caller's resumes and saves it.
#[utoipa::path(
    post,
    path = "/api/cover-letters/generate",
    request_body = GenerateCoverLetterPayload,
    responses(
        (status = 201, description = "Cover letter generated and stored", body = CoverLetter),
        (status = 400, description = "Invalid payload or unknown resume"),
        (status = 502, description = "AI provider failed")
    )
)]
#[axum::debug_handler]
pub async fn generate_cover_letter(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<GenerateCoverLetterPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let resume = state
        .resume_service
        .get(auth.id, payload.resume_id)
        .await
        .map_err(|e| match e {
            Error::NotFound(_) => {
                Error::BadRequest(format!("Resume {} does not exist", payload.resume_id))
            }
            other => other,
        })?;
    let user = state.user_service.get_by_id(auth.id).await?;

    let content = state
        .ai_service
        .generate_cover_letter(
            &resume.content,
            &payload.job_description,
            &user.full_name,
            &payload.company_name,
        )
        .await?;

    let title = payload
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| format!("Cover Letter - {}", payload.company_name));
    let letter = state
        .cover_letter_service
        .create(
            auth.id,
            CreateCoverLetterPayload {
                title,
                content,
                job_description: payload.job_description,
                resume_id: Some(resume.id),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(letter)))
}

#[utoipa::path(
    get,
    path = "/api/cover-letters/{id}",
    params(("id" = Uuid, Path, description = "Cover letter ID")),
    responses(
        (status = 200, description = "Cover letter found", body = CoverLetter),
        (status = 404, description = "Cover letter not found")
    )
)]
#[axum::debug_handler]
pub async fn get_cover_letter(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let letter = state.cover_letter_service.get(auth.id, id).await?;
    Ok(Json(letter))
}

#[utoipa::path(
    put,
    path = "/api/cover-letters/{id}",
    params(("id" = Uuid, Path, description = "Cover letter ID")),
    request_body = UpdateCoverLetterPayload,
    responses(
        (status = 200, description = "Cover letter updated", body = CoverLetter),
        (status = 404, description = "Cover letter not found")
    )
)]
#[axum::debug_handler]
pub async fn update_cover_letter(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCoverLetterPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let letter = state
        .cover_letter_service
        .update(auth.id, id, payload)
        .await?;
    Ok(Json(letter))
}

#[utoipa::path(
    delete,
    path = "/api/cover-letters/{id}",
    params(("id" = Uuid, Path, description = "Cover letter ID")),
    responses(
        (status = 204, description = "Cover letter deleted"),
        (status = 404, description = "Cover letter not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_cover_letter(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.cover_letter_service.delete(auth.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
