use crate::domain::registration::{
    entity::{NewParticipant, NewTeam, Participant, Team},
    errors::StoreError,
    repository::{PARTICIPANTS_TABLE, RegistrationStore, TEAMS_TABLE},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    Lookup,
    InsertParticipant,
    InsertTeam,
    DeleteParticipant,
}

/// Process-local registration store.
///
/// Behaves like the Postgres store, including the absence of uniqueness
/// constraints. Failures can be injected per operation; each injected error
/// is returned once by the next call of that operation.
#[derive(Default)]
pub struct InMemoryRegistrationStore {
    participants: RwLock<Vec<Participant>>,
    teams: RwLock<Vec<Team>>,
    faults: Mutex<HashMap<StoreOperation, StoreError>>,
    lookups: AtomicUsize,
}

impl InMemoryRegistrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_next(&self, operation: StoreOperation, error: StoreError) {
        self.faults.lock().await.insert(operation, error);
    }

    pub async fn participants(&self) -> Vec<Participant> {
        self.participants.read().await.clone()
    }

    pub async fn teams(&self) -> Vec<Team> {
        self.teams.read().await.clone()
    }

    /// Number of uniqueness lookups served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    async fn injected(&self, operation: StoreOperation) -> Result<(), StoreError> {
        match self.faults.lock().await.remove(&operation) {
            Some(err) => {
                debug!(?operation, "Returning injected store failure");
                Err(err)
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RegistrationStore for InMemoryRegistrationStore {
    async fn count_matching(&self, table: &str, column: &str, value: &str) -> Result<i64, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.injected(StoreOperation::Lookup).await?;

        let matches = match (table, column) {
            (PARTICIPANTS_TABLE, "mobile") => self
                .participants
                .read()
                .await
                .iter()
                .filter(|p| p.mobile == value)
                .count(),
            (PARTICIPANTS_TABLE, "email") => self
                .participants
                .read()
                .await
                .iter()
                .filter(|p| p.email == value)
                .count(),
            (TEAMS_TABLE, "name") => self
                .teams
                .read()
                .await
                .iter()
                .filter(|t| t.name == value)
                .count(),
            _ => {
                return Err(StoreError::new(format!("Lookup on {table}.{column} is not supported"))
                    .with_code("42703"));
            }
        };
        Ok(i64::try_from(matches).unwrap_or(i64::MAX))
    }

    async fn insert_participant(&self, participant: &NewParticipant) -> Result<Participant, StoreError> {
        self.injected(StoreOperation::InsertParticipant).await?;
        let stored = Participant::from_new(Uuid::now_v7(), chrono::Utc::now(), participant);
        self.participants.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn insert_team(&self, team: &NewTeam, user_id: Uuid) -> Result<Team, StoreError> {
        self.injected(StoreOperation::InsertTeam).await?;
        if !self.participants.read().await.iter().any(|p| p.id == user_id) {
            return Err(StoreError::new(
                "insert or update on table \"teams\" violates foreign key constraint \"teams_user_id_fkey\"",
            )
            .with_code("23503")
            .with_details(format!("Key (user_id)=({user_id}) is not present in table \"users\".")));
        }
        let stored = Team::from_new(Uuid::now_v7(), user_id, team);
        self.teams.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn delete_participant(&self, id: Uuid) -> Result<(), StoreError> {
        self.injected(StoreOperation::DeleteParticipant).await?;
        self.participants.write().await.retain(|p| p.id != id);
        self.teams.write().await.retain(|t| t.user_id != id);
        Ok(())
    }
}
