use crate::database::refs::{ensure_reference, RefTable};
use crate::dto::cover_letter_dto::{CreateCoverLetterPayload, UpdateCoverLetterPayload};
use crate::dto::list_query::ListQuery;
use crate::dto::patch::assignment;
use crate::error::{Error, Result};
use crate::models::cover_letter::CoverLetter;
use sqlx::PgPool;
use uuid::Uuid;

const COVER_LETTER_COLUMNS: &str =
    "id, user_id, title, content, job_description, resume_id, created_at";

#[derive(Clone)]
pub struct CoverLetterService {
    pool: PgPool,
}

impl CoverLetterService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        payload: CreateCoverLetterPayload,
    ) -> Result<CoverLetter> {
        ensure_reference(&self.pool, RefTable::Resumes, user_id, payload.resume_id).await?;

        let sql = format!(
            r#"
            INSERT INTO cover_letters (user_id, title, content, job_description, resume_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            COVER_LETTER_COLUMNS
        );
        let letter = sqlx::query_as::<_, CoverLetter>(&sql)
            .bind(user_id)
            .bind(payload.title)
            .bind(payload.content)
            .bind(payload.job_description)
            .bind(payload.resume_id)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!(cover_letter_id = %letter.id, user_id = %user_id, "Cover letter created");
        Ok(letter)
    }

    pub async fn list(&self, user_id: Uuid, query: ListQuery) -> Result<Vec<CoverLetter>> {
        let (skip, limit) = query.bounds();
        let sql = format!(
            "SELECT {} FROM cover_letters WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            COVER_LETTER_COLUMNS
        );
        let items = sqlx::query_as::<_, CoverLetter>(&sql)
            .bind(user_id)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<CoverLetter> {
        let sql = format!(
            "SELECT {} FROM cover_letters WHERE id = $1 AND user_id = $2",
            COVER_LETTER_COLUMNS
        );
        sqlx::query_as::<_, CoverLetter>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Cover letter not found".to_string()))
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        payload: UpdateCoverLetterPayload,
    ) -> Result<CoverLetter> {
        self.get(user_id, id).await?;
        ensure_reference(
            &self.pool,
            RefTable::Resumes,
            user_id,
            payload.resume_id.flatten(),
        )
        .await?;
        let (set_resume, resume_id) = assignment(payload.resume_id);

        let sql = format!(
            r#"
            UPDATE cover_letters
            SET
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                job_description = COALESCE($5, job_description),
                resume_id = CASE WHEN $6 THEN $7 ELSE resume_id END
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            COVER_LETTER_COLUMNS
        );
        let letter = sqlx::query_as::<_, CoverLetter>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(payload.title)
            .bind(payload.content)
            .bind(payload.job_description)
            .bind(set_resume)
            .bind(resume_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(letter)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM cover_letters WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Cover letter not found".to_string()));
        }
        Ok(())
    }
}
