pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::services::{
    ai_service::AIService,
    auth_service::AuthService,
    cover_letter_service::CoverLetterService,
    job_service::JobService,
    llm_provider::{ChatProvider, OpenAiCompatibleProvider},
    resume_service::ResumeService,
    user_service::UserService,
};
use reqwest::Client;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub ai_service: AIService,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub resume_service: ResumeService,
    pub cover_letter_service: CoverLetterService,
    pub job_service: JobService,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> error::Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;
        let provider = OpenAiCompatibleProvider::new(&config.llm, http_client);
        Ok(Self::with_provider(pool, config, Arc::new(provider)))
    }

    /// Builds the state around any chat-completion backend.
    pub fn with_provider(pool: PgPool, config: Config, provider: Arc<dyn ChatProvider>) -> Self {
        let user_service = UserService::new(pool.clone());
        let auth_service = AuthService::new(
            user_service.clone(),
            config.jwt_secret.clone(),
            config.access_token_expire_minutes,
        );
        let resume_service = ResumeService::new(pool.clone(), config.upload_dir.clone());
        let cover_letter_service = CoverLetterService::new(pool.clone());
        let job_service = JobService::new(pool.clone());

        Self {
            pool,
            config: Arc::new(config),
            ai_service: AIService::new(provider),
            auth_service,
            user_service,
            resume_service,
            cover_letter_service,
            job_service,
        }
    }
}
