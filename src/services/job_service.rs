use crate::database::refs::{ensure_reference, RefTable};
use crate::dto::job_dto::{CreateJobApplicationPayload, JobListQuery, UpdateJobApplicationPayload};
use crate::dto::list_query::ListQuery;
use crate::dto::patch::assignment;
use crate::error::{Error, Result};
use crate::models::job_application::{ApplicationStatus, JobApplication};
use sqlx::PgPool;
use uuid::Uuid;

const JOB_COLUMNS: &str = "id, user_id, job_title, company, job_description, job_url, status, \
     resume_id, cover_letter_id, match_score, applied_date, created_at";

#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        payload: CreateJobApplicationPayload,
    ) -> Result<JobApplication> {
        let status = parse_status(payload.status.as_deref())?.unwrap_or_default();
        ensure_reference(&self.pool, RefTable::Resumes, user_id, payload.resume_id).await?;
        ensure_reference(
            &self.pool,
            RefTable::CoverLetters,
            user_id,
            payload.cover_letter_id,
        )
        .await?;

        let sql = format!(
            r#"
            INSERT INTO job_applications (
                user_id, job_title, company, job_description, job_url, status,
                resume_id, cover_letter_id, match_score, applied_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, JobApplication>(&sql)
            .bind(user_id)
            .bind(payload.job_title)
            .bind(payload.company)
            .bind(payload.job_description)
            .bind(payload.job_url)
            .bind(status.as_str())
            .bind(payload.resume_id)
            .bind(payload.cover_letter_id)
            .bind(payload.match_score)
            .bind(payload.applied_date)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!(job_id = %job.id, user_id = %user_id, status = %status, "Job application created");
        Ok(job)
    }

    pub async fn list(&self, user_id: Uuid, query: JobListQuery) -> Result<Vec<JobApplication>> {
        let status = parse_status(query.status.as_deref())?;
        let (skip, limit) = ListQuery::new(query.skip, query.limit).bounds();

        let sql = format!(
            r#"
            SELECT {} FROM job_applications
            WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
            JOB_COLUMNS
        );
        let items = sqlx::query_as::<_, JobApplication>(&sql)
            .bind(user_id)
            .bind(status.map(|s| s.as_str()))
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<JobApplication> {
        let sql = format!(
            "SELECT {} FROM job_applications WHERE id = $1 AND user_id = $2",
            JOB_COLUMNS
        );
        sqlx::query_as::<_, JobApplication>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Job application not found".to_string()))
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        payload: UpdateJobApplicationPayload,
    ) -> Result<JobApplication> {
        let status = parse_status(payload.status.as_deref())?;
        check_update(&payload)?;
        self.get(user_id, id).await?;
        ensure_reference(
            &self.pool,
            RefTable::Resumes,
            user_id,
            payload.resume_id.flatten(),
        )
        .await?;
        ensure_reference(
            &self.pool,
            RefTable::CoverLetters,
            user_id,
            payload.cover_letter_id.flatten(),
        )
        .await?;

        let (set_url, job_url) = assignment(payload.job_url);
        let (set_resume, resume_id) = assignment(payload.resume_id);
        let (set_letter, cover_letter_id) = assignment(payload.cover_letter_id);
        let (set_score, match_score) = assignment(payload.match_score);
        let (set_applied, applied_date) = assignment(payload.applied_date);

        let sql = format!(
            r#"
            UPDATE job_applications
            SET
                job_title = COALESCE($3, job_title),
                company = COALESCE($4, company),
                job_description = COALESCE($5, job_description),
                status = COALESCE($6, status),
                job_url = CASE WHEN $7 THEN $8 ELSE job_url END,
                resume_id = CASE WHEN $9 THEN $10 ELSE resume_id END,
                cover_letter_id = CASE WHEN $11 THEN $12 ELSE cover_letter_id END,
                match_score = CASE WHEN $13 THEN $14 ELSE match_score END,
                applied_date = CASE WHEN $15 THEN $16 ELSE applied_date END
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, JobApplication>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(payload.job_title)
            .bind(payload.company)
            .bind(payload.job_description)
            .bind(status.map(|s| s.as_str()))
            .bind(set_url)
            .bind(job_url)
            .bind(set_resume)
            .bind(resume_id)
            .bind(set_letter)
            .bind(cover_letter_id)
            .bind(set_score)
            .bind(match_score)
            .bind(set_applied)
            .bind(applied_date)
            .fetch_one(&self.pool)
            .await?;
        Ok(job)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM job_applications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Job application not found".to_string()));
        }
        Ok(())
    }

    /// Stores a model-produced score. Scores outside 0..=100 are refused.
    pub async fn set_match_score(
        &self,
        user_id: Uuid,
        id: Uuid,
        score: f64,
    ) -> Result<JobApplication> {
        if !is_valid_score(score) {
            return Err(Error::BadRequest(format!(
                "Match score {} is outside 0-100",
                score
            )));
        }

        let sql = format!(
            "UPDATE job_applications SET match_score = $3 WHERE id = $1 AND user_id = $2 RETURNING {}",
            JOB_COLUMNS
        );
        sqlx::query_as::<_, JobApplication>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(score)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Job application not found".to_string()))
    }
}

pub fn is_valid_score(score: f64) -> bool {
    score.is_finite() && (0.0..=100.0).contains(&score)
}

/// Checks the nullable fields the derive cannot reach.
fn check_update(payload: &UpdateJobApplicationPayload) -> Result<()> {
    if let Some(Some(score)) = payload.match_score {
        if !is_valid_score(score) {
            return Err(Error::BadRequest(
                "match_score must be within 0-100".to_string(),
            ));
        }
    }
    if let Some(Some(url)) = &payload.job_url {
        if reqwest::Url::parse(url).is_err() {
            return Err(Error::BadRequest(format!("job_url {} is not a valid URL", url)));
        }
    }
    Ok(())
}

fn parse_status(raw: Option<&str>) -> Result<Option<ApplicationStatus>> {
    raw.map(|s| s.parse::<ApplicationStatus>())
        .transpose()
        .map_err(Error::BadRequest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_bounds_are_inclusive() {
        assert!(is_valid_score(0.0));
        assert!(is_valid_score(100.0));
        assert!(is_valid_score(73.5));
        assert!(!is_valid_score(-0.5));
        assert!(!is_valid_score(100.01));
        assert!(!is_valid_score(f64::NAN));
    }

    #[test]
    fn update_checks_nullable_fields_only_when_set() {
        let mut payload = UpdateJobApplicationPayload {
            match_score: Some(None),
            job_url: Some(None),
            ..Default::default()
        };
        assert!(check_update(&payload).is_ok());

        payload.match_score = Some(Some(101.0));
        assert!(matches!(check_update(&payload), Err(Error::BadRequest(_))));

        payload.match_score = Some(Some(55.0));
        payload.job_url = Some(Some("careers page".to_string()));
        assert!(matches!(check_update(&payload), Err(Error::BadRequest(_))));

        payload.job_url = Some(Some("https://acme.example/jobs/42".to_string()));
        assert!(check_update(&payload).is_ok());
    }

    #[test]
    fn status_is_optional_but_must_be_known() {
        assert_eq!(parse_status(None).unwrap(), None);
        assert_eq!(
            parse_status(Some("Offer")).unwrap(),
            Some(ApplicationStatus::Offer)
        );
        assert!(matches!(parse_status(Some("lost")), Err(Error::BadRequest(_))));
    }
}
