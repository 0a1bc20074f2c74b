use crate::{config::StoreBackend, presentation::http::state::AppState};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    store: &'static str,
    open_sessions: usize,
    version: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_status = match (&state.db, state.config.store_backend) {
        (Some(db), _) => match sqlx::query("SELECT 1").execute(db).await {
            Ok(_) => "up",
            Err(e) => {
                tracing::error!("Health check failed: Database unreachable: {}", e);
                "down"
            }
        },
        (None, StoreBackend::Memory) => "memory",
        (None, StoreBackend::Postgres) => "down",
    };

    let healthy = store_status != "down";
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" },
        store: store_status,
        open_sessions: state.sessions.len().await,
        version: env!("CARGO_PKG_VERSION"),
    };

    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(response))
}
