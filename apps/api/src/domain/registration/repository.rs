use super::entity::{NewParticipant, NewTeam, Participant, Team};
use super::errors::StoreError;
use async_trait::async_trait;
use uuid::Uuid;

pub const PARTICIPANTS_TABLE: &str = "users";
pub const TEAMS_TABLE: &str = "teams";

/// Remote store holding participants (`users`) and their teams (`teams`).
///
/// The store assigns identities. It enforces no uniqueness of its own; callers
/// check with [`RegistrationStore::count_matching`] before writing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Number of rows in `table` whose `column` equals `value`.
    async fn count_matching(&self, table: &str, column: &str, value: &str) -> Result<i64, StoreError>;
    async fn insert_participant(&self, participant: &NewParticipant) -> Result<Participant, StoreError>;
    async fn insert_team(&self, team: &NewTeam, user_id: Uuid) -> Result<Team, StoreError>;
    async fn delete_participant(&self, id: Uuid) -> Result<(), StoreError>;
}
