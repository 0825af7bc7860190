use crate::error::{Error, Result};
use sqlx::PgPool;
use uuid::Uuid;

/// Tables a record may point at through an optional foreign key.
#[derive(Debug, Clone, Copy)]
pub enum RefTable {
    Resumes,
    CoverLetters,
}

impl RefTable {
    fn table(self) -> &'static str {
        match self {
            RefTable::Resumes => "resumes",
            RefTable::CoverLetters => "cover_letters",
        }
    }

    fn label(self) -> &'static str {
        match self {
            RefTable::Resumes => "Resume",
            RefTable::CoverLetters => "Cover letter",
        }
    }
}

/// Rejects a reference unless the row exists and belongs to `user_id`. `None` always passes.
pub async fn ensure_reference(
    pool: &PgPool,
    target: RefTable,
    user_id: Uuid,
    id: Option<Uuid>,
) -> Result<()> {
    let Some(id) = id else {
        return Ok(());
    };

    let query = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1 AND user_id = $2)",
        target.table()
    );
    let exists: bool = sqlx::query_scalar(&query)
        .bind(id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    if exists {
        Ok(())
    } else {
        Err(Error::BadRequest(format!("{} {} does not exist", target.label(), id)))
    }
}
