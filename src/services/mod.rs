pub mod ai_service;
pub mod auth_service;
pub mod cover_letter_service;
pub mod job_service;
pub mod llm_provider;
pub mod resume_service;
pub mod user_service;
