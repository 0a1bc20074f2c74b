use registration_api::{
    config::{Config, StoreBackend},
    domain::registration::repository::RegistrationStore,
    infrastructure::{
        database::pool::create_pool,
        repositories::{InMemoryRegistrationStore, SqlxRegistrationStore},
    },
    presentation::http::{routes::create_router, state::AppState},
    workers::session_sweeper::SessionSweeper,
};
use http::{HeaderValue, Method, header};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info,registration_api=debug,tower_http=debug"))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::from_env()?;

    let (store, db) = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for the postgres store"))?;
            let db = create_pool(database_url, config.database_max_connections).await?;
            let mut migrator = sqlx::migrate!("./migrations");
            migrator.set_ignore_missing(config.ignore_missing_migrations);
            migrator.run(&db).await?;
            let store: Arc<dyn RegistrationStore> = Arc::new(SqlxRegistrationStore::new(db.clone()));
            (store, Some(db))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory registration store; registrations are lost on restart");
            let store: Arc<dyn RegistrationStore> = Arc::new(InMemoryRegistrationStore::new());
            (store, None)
        }
    };

    let state = AppState::new(config.clone(), store, db);

    let sweeper = SessionSweeper::new(state.sessions.clone(), config.session_sweep_interval_seconds);
    tokio::spawn(async move { sweeper.start().await });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::HeaderName::from_static("x-request-id")])
        .max_age(Duration::from_secs(3600));

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        store = ?config.store_backend,
        policy = ?config.partial_failure_policy,
        "Registration API listening on {}",
        addr
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("SIGTERM received, initiating graceful shutdown");
        }
    }
}
