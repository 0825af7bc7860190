use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::dto::patch::nullable;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateJobApplicationPayload {
    #[validate(length(min = 1))]
    pub job_title: String,
    #[validate(length(min = 1))]
    pub company: String,
    #[serde(default)]
    pub job_description: String,
    #[validate(url)]
    pub job_url: Option<String>,
    pub status: Option<String>,
    pub resume_id: Option<Uuid>,
    pub cover_letter_id: Option<Uuid>,
    #[validate(range(min = 0.0, max = 100.0, message = "match_score must be within 0-100"))]
    pub match_score: Option<f64>,
    pub applied_date: Option<DateTime<Utc>>,
}

/// Partial update. The nullable columns distinguish an absent key (unchanged) from `null` (cleared).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateJobApplicationPayload {
    #[validate(length(min = 1))]
    pub job_title: Option<String>,
    #[validate(length(min = 1))]
    pub company: Option<String>,
    pub job_description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub job_url: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub resume_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    pub cover_letter_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    pub match_score: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub applied_date: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_tells_cleared_fields_from_missing_ones() {
        let payload: UpdateJobApplicationPayload = serde_json::from_str(
            r#"{"resume_id": null, "match_score": 64.5, "status": "interview"}"#,
        )
        .unwrap();
        assert_eq!(payload.resume_id, Some(None));
        assert_eq!(payload.match_score, Some(Some(64.5)));
        assert_eq!(payload.cover_letter_id, None);
        assert_eq!(payload.job_url, None);
        assert_eq!(payload.status.as_deref(), Some("interview"));
    }

    #[test]
    fn create_rejects_out_of_range_score_and_bad_url() {
        let payload: CreateJobApplicationPayload = serde_json::from_str(
            r#"{"job_title": "Engineer", "company": "Acme", "match_score": 150}"#,
        )
        .unwrap();
        let err = payload.validate().unwrap_err();
        assert!(err.to_string().contains("match_score"));

        let payload: CreateJobApplicationPayload = serde_json::from_str(
            r#"{"job_title": "Engineer", "company": "Acme", "job_url": "not a url"}"#,
        )
        .unwrap();
        assert!(payload.validate().is_err());
    }
}
