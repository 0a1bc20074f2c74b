use crate::{
    application::{registration_session::SessionRegistry, submit_registration::use_case::SubmitRegistrationUseCase},
    config::Config,
    domain::registration::repository::RegistrationStore,
};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Present only when registrations are kept in Postgres.
    pub db: Option<PgPool>,
    pub submit_registration: Arc<SubmitRegistrationUseCase>,
    pub sessions: Arc<SessionRegistry>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn RegistrationStore>, db: Option<PgPool>) -> Self {
        let submit_registration = Arc::new(SubmitRegistrationUseCase::new(
            store,
            config.partial_failure_policy,
        ));
        Self {
            db,
            submit_registration,
            sessions: Arc::new(SessionRegistry::with_idle_ttl(config.session_idle_ttl())),
            config,
        }
    }
}
