pub mod cover_letter;
pub mod job_application;
pub mod resume;
pub mod user;
