use crate::error::{Error, Result};
use crate::utils::crypto::random_secret;
use dotenvy::dotenv;
use std::env;

const DEFAULT_TOKEN_EXPIRE_MINUTES: i64 = 60 * 24 * 8;

#[derive(Debug, Clone)]
pub struct Config {
    pub project_name: String,
    pub api_prefix: String,
    pub server_address: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub access_token_expire_minutes: i64,
    pub cors_origins: Vec<String>,
    pub upload_dir: String,
    pub llm: LlmConfig,
}

/// Connection settings for the chat-completion provider.
///
/// With an `endpoint` the provider is addressed as an Azure OpenAI deployment,
/// without one the public OpenAI API is used and `deployment` is sent as the model.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub deployment: String,
    pub api_version: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let first = |names: &[&str]| names.iter().find_map(|n| get(*n));

        let jwt_secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET is not set, generating an ephemeral signing key");
                random_secret(48)
            }
        };

        let access_token_expire_minutes = match get("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(raw) => parse_value("ACCESS_TOKEN_EXPIRE_MINUTES", &raw)?,
            None => DEFAULT_TOKEN_EXPIRE_MINUTES,
        };
        if access_token_expire_minutes <= 0 {
            return Err(Error::Config(
                "ACCESS_TOKEN_EXPIRE_MINUTES must be positive".to_string(),
            ));
        }

        let cors_origins = get("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["http://localhost:3000".to_string()]);

        let mut api_prefix = get("API_PREFIX").unwrap_or_else(|| "/api".to_string());
        if !api_prefix.starts_with('/') {
            api_prefix.insert(0, '/');
        }
        let api_prefix = api_prefix.trim_end_matches('/').to_string();

        Ok(Self {
            project_name: get("PROJECT_NAME")
                .unwrap_or_else(|| "Job Application Agent".to_string()),
            api_prefix,
            server_address: get("SERVER_ADDRESS").unwrap_or_else(|| "0.0.0.0:8000".to_string()),
            database_url: get("DATABASE_URL").ok_or_else(|| {
                Error::Config("Missing environment variable: DATABASE_URL".to_string())
            })?,
            jwt_secret,
            access_token_expire_minutes,
            cors_origins,
            upload_dir: get("UPLOAD_DIR").unwrap_or_else(|| "./uploads/resumes".to_string()),
            llm: LlmConfig {
                endpoint: first(&["LLM_ENDPOINT", "AZURE_OPENAI_ENDPOINT"]),
                api_key: first(&["LLM_API_KEY", "AZURE_OPENAI_KEY", "OPENAI_API_KEY"]),
                deployment: first(&["LLM_DEPLOYMENT", "AZURE_OPENAI_DEPLOYMENT"])
                    .unwrap_or_else(|| "gpt-4".to_string()),
                api_version: get("LLM_API_VERSION").unwrap_or_else(|| "2023-05-15".to_string()),
            },
        })
    }
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}
