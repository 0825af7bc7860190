use crate::dto::user_dto::UpdateUserPayload;
use crate::error::{Error, Result};
use crate::models::user::User;
use crate::utils::crypto::hash_password;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, hashed_password, full_name, is_active, created_at";

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, email: &str, hashed_password: &str, full_name: &str) -> Result<User> {
        let email = normalize_email(email);
        if self.find_by_email(&email).await?.is_some() {
            return Err(Error::BadRequest("Email already registered".to_string()));
        }

        let query = format!(
            "INSERT INTO users (email, hashed_password, full_name) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&email)
            .bind(hashed_password)
            .bind(full_name.trim())
            .fetch_one(&self.pool)
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<User> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        user.ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateUserPayload) -> Result<User> {
        let current = self.get_by_id(id).await?;

        let email = payload.email.as_deref().map(normalize_email);
        if let Some(ref email) = email {
            if *email != current.email && self.find_by_email(email).await?.is_some() {
                return Err(Error::BadRequest("Email already registered".to_string()));
            }
        }
        let hashed_password = payload.password.as_deref().map(hash_password).transpose()?;

        let query = format!(
            r#"
            UPDATE users
            SET
                email = COALESCE($2, email),
                full_name = COALESCE($3, full_name),
                hashed_password = COALESCE($4, hashed_password)
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(email)
            .bind(payload.full_name)
            .bind(hashed_password)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("User not found".to_string()));
        }
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize_email;

    #[test]
    fn emails_compare_case_insensitively() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
