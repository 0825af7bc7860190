use crate::dto::auth_dto::{LoginPayload, RegisterPayload};
use crate::error::{Error, Result};
use crate::middleware::auth::issue_token;
use crate::models::user::User;
use crate::services::user_service::UserService;
use crate::utils::crypto::{hash_password, verify_password};

#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    jwt_secret: String,
    expire_minutes: i64,
}

impl AuthService {
    pub fn new(users: UserService, jwt_secret: String, expire_minutes: i64) -> Self {
        Self {
            users,
            jwt_secret,
            expire_minutes,
        }
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<(User, String)> {
        let hashed = hash_password(&payload.password)?;
        let user = self
            .users
            .create(&payload.email, &hashed, &payload.full_name)
            .await?;
        let token = self.token_for(&user)?;
        Ok((user, token))
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<String> {
        let invalid = || Error::Unauthorized("Incorrect email or password".to_string());

        let user = self
            .users
            .find_by_email(&payload.username)
            .await?
            .ok_or_else(invalid)?;
        if !verify_password(&payload.password, &user.hashed_password)? {
            tracing::info!(user_id = %user.id, "Failed login attempt");
            return Err(invalid());
        }
        if !user.is_active {
            return Err(Error::BadRequest("Inactive user".to_string()));
        }

        self.token_for(&user)
    }

    fn token_for(&self, user: &User) -> Result<String> {
        issue_token(user.id, &self.jwt_secret, self.expire_minutes)
    }
}
