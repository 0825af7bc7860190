pub mod auth_dto;
pub mod cover_letter_dto;
pub mod job_dto;
pub mod list_query;
pub mod patch;
pub mod resume_dto;
pub mod user_dto;
