use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        list_query::ListQuery,
        resume_dto::{CreateResumePayload, UpdateResumePayload},
    },
    error::{Error, Result},
    middleware::auth::AuthUser,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/resumes",
    params(
        ("skip" = Option<i64>, Query, description = "Number of items to skip"),
        ("limit" = Option<i64>, Query, description = "Maximum items to return")
    ),
    responses(
        (status = 200, description = "Resumes owned by the caller", body = Vec<Resume>)
    )
)]
#[axum::debug_handler]
pub async fn list_resumes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let items = state.resume_service.list(auth.id, query).await?;
    Ok(Json(items))
}

/// Multipart upload: `title`, optional `content`, optional `parsed_data` (JSON) and optional `file`.
#[utoipa::path(
    post,
    path = "/api/resumes",
    responses(
        (status = 201, description = "Resume created", body = Resume),
        (status = 400, description = "Missing title or rejected file")
    )
)]
#[axum::debug_handler]
pub async fn create_resume(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut payload = CreateResumePayload::default();
    let mut upload: Option<(String, bytes::Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to get next field: {}", e);
        Error::BadRequest(e.to_string())
    })? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "title" => payload.title = field.text().await?,
            "content" => payload.content = field.text().await?,
            "parsed_data" => {
                let raw = field.text().await?;
                if !raw.trim().is_empty() {
                    payload.parsed_data = Some(serde_json::from_str(&raw)?);
                }
            }
            "file" => {
                let filename = field.file_name().unwrap_or("resume.bin").to_string();
                let data = field.bytes().await?;
                if !data.is_empty() {
                    upload = Some((filename, data));
                }
            }
            _ => {}
        }
    }

    let payload = payload.normalized();
    payload.validate()?;

    let resume = state
        .resume_service
        .create_with_upload(
            auth.id,
            payload,
            upload.as_ref().map(|(name, data)| (name.as_str(), &data[..])),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

#[utoipa::path(
    get,
    path = "/api/resumes/{id}",
    params(("id" = Uuid, Path, description = "Resume ID")),
    responses(
        (status = 200, description = "Resume found", body = Resume),
        (status = 404, description = "Resume not found")
    )
)]
#[axum::debug_handler]
pub async fn get_resume(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let resume = state.resume_service.get(auth.id, id).await?;
    Ok(Json(resume))
}

#[utoipa::path(
    put,
    path = "/api/resumes/{id}",
    params(("id" = Uuid, Path, description = "Resume ID")),
    request_body = UpdateResumePayload,
    responses(
        (status = 200, description = "Resume updated", body = Resume),
        (status = 404, description = "Resume not found")
    )
)]
#[axum::debug_handler]
pub async fn update_resume(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateResumePayload>,
) -> Result<impl IntoResponse> {
    let payload = payload.normalized();
    payload.validate()?;
    let resume = state.resume_service.update(auth.id, id, payload).await?;
    Ok(Json(resume))
}

#[utoipa::path(
    delete,
    path = "/api/resumes/{id}",
    params(("id" = Uuid, Path, description = "Resume ID")),
    responses(
        (status = 204, description = "Resume deleted"),
        (status = 404, description = "Resume not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_resume(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.resume_service.delete(auth.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
