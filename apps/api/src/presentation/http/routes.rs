use super::{
    handlers::{health, options, registration},
    middleware::{logging::logging_middleware, request_id::request_id_middleware},
    state::AppState,
};
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/api/v1/health", get(health::health_check))
        // Select options
        .route("/api/v1/registration/options", get(options::get_options))
        // Registration sessions
        .route("/api/v1/registration/sessions", post(registration::create_session))
        .route(
            "/api/v1/registration/sessions/{id}",
            get(registration::get_session).delete(registration::delete_session),
        )
        .route(
            "/api/v1/registration/sessions/{id}/participant",
            put(registration::update_participant),
        )
        .route(
            "/api/v1/registration/sessions/{id}/team",
            put(registration::update_team_details),
        )
        .route(
            "/api/v1/registration/sessions/{id}/team/strength",
            put(registration::change_team_size),
        )
        .route(
            "/api/v1/registration/sessions/{id}/team/members/{member_id}",
            put(registration::update_member),
        )
        .route(
            "/api/v1/registration/sessions/{id}/submit",
            post(registration::submit_registration),
        )
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
