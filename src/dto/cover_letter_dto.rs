use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::dto::patch::nullable;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCoverLetterPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default)]
    pub job_description: String,
    pub resume_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCoverLetterPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
    pub job_description: Option<String>,
    /// `null` unlinks the resume; an absent key leaves it as is.
    #[serde(default, deserialize_with = "nullable")]
    pub resume_id: Option<Option<Uuid>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateCoverLetterPayload {
    pub resume_id: Uuid,
    #[validate(length(min = 1, message = "job_description is required"))]
    pub job_description: String,
    #[validate(length(min = 1, message = "company_name is required"))]
    pub company_name: String,
    pub title: Option<String>,
}
