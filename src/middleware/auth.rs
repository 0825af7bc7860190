use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

/// Identity of the caller, inserted into request extensions once the bearer token checks out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

pub fn issue_token(user_id: Uuid, secret: &str, expire_minutes: i64) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::minutes(expire_minutes)).timestamp() as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(signing_failure)
}

fn signing_failure(err: jsonwebtoken::errors::Error) -> Error {
    tracing::error!(error = %err, "Failed to sign access token");
    Error::Internal("Failed to issue access token".to_string())
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

fn unauthorized(code: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": code }))).into_response()
}

pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return unauthorized("missing_authorization");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("bad_authorization");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return unauthorized("unsupported_scheme");
    };

    let claims = match decode_token(token.trim(), &state.config.jwt_secret) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            return unauthorized("invalid_token");
        }
    };
    let Ok(id) = Uuid::parse_str(&claims.sub) else {
        return unauthorized("invalid_token");
    };

    // Tokens outlive their account; a deleted user must not reach the handlers.
    match state.user_service.get_by_id(id).await {
        Ok(_) => {}
        Err(Error::NotFound(_)) => {
            tracing::debug!(user_id = %id, "Bearer token names an unknown user");
            return unauthorized("invalid_token");
        }
        Err(e) => return e.into_response(),
    }

    req.extensions_mut().insert(AuthUser { id });
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_decodes_to_the_same_subject() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, "secret", 30).unwrap();
        let claims = decode_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_another_key_is_rejected() {
        let token = issue_token(Uuid::new_v4(), "secret", 30).unwrap();
        assert!(decode_token(&token, "other-secret").is_err());
    }

    #[test]
    fn signing_failures_are_server_errors() {
        let err = signing_failure(jsonwebtoken::errors::ErrorKind::InvalidKeyFormat.into());
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue_token(Uuid::new_v4(), "secret", -120).unwrap();
        assert!(decode_token(&token, "secret").is_err());
    }
}
