pub mod auth;
pub mod cover_letters;
pub mod health;
pub mod jobs;
pub mod resumes;
pub mod users;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::{auth::require_bearer_auth, cors::cors_layer};
use crate::AppState;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let public_api = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let protected_api = Router::new()
        .route(
            "/users/me",
            get(users::get_me)
                .put(users::update_me)
                .delete(users::delete_me),
        )
        .route(
            "/resumes",
            get(resumes::list_resumes).post(resumes::create_resume),
        )
        .route(
            "/resumes/:id",
            get(resumes::get_resume)
                .put(resumes::update_resume)
                .delete(resumes::delete_resume),
        )
        .route(
            "/cover-letters",
            get(cover_letters::list_cover_letters).post(cover_letters::create_cover_letter),
        )
        .route(
            "/cover-letters/generate",
            post(cover_letters::generate_cover_letter),
        )
        .route(
            "/cover-letters/:id",
            get(cover_letters::get_cover_letter)
                .put(cover_letters::update_cover_letter)
                .delete(cover_letters::delete_cover_letter),
        )
        .route("/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route(
            "/jobs/:id",
            get(jobs::get_job)
                .put(jobs::update_job)
                .delete(jobs::delete_job),
        )
        .route(
            "/jobs/:id/match-score/:resume_id",
            get(jobs::get_match_score),
        )
        .route_layer(from_fn_with_state(state.clone(), require_bearer_auth));

    let api = public_api.merge(protected_api);
    let base_routes = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health));

    let prefix = state.config.api_prefix.clone();
    let app = if prefix.is_empty() {
        base_routes.merge(api)
    } else {
        base_routes.nest(&prefix, api)
    };

    let cors = cors_layer(&state.config.cors_origins);
    app.with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
