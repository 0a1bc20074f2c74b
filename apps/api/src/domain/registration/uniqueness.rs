use super::entity::ValidatedRegistration;
use super::errors::StoreError;
use super::repository::{PARTICIPANTS_TABLE, RegistrationStore, TEAMS_TABLE};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use ts_rs::TS;

/// Values that must not collide with any earlier registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum UniqueField {
    Mobile,
    Email,
    TeamName,
}

impl UniqueField {
    /// Order in which a submission checks the fields. When several collide,
    /// the first one in this order is the one reported.
    pub const CHECK_ORDER: [UniqueField; 3] = [UniqueField::Mobile, UniqueField::Email, UniqueField::TeamName];

    pub fn table(self) -> &'static str {
        match self {
            Self::Mobile | Self::Email => PARTICIPANTS_TABLE,
            Self::TeamName => TEAMS_TABLE,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Email => "email",
            Self::TeamName => "name",
        }
    }

    pub fn conflict_message(self) -> &'static str {
        match self {
            Self::Mobile => "This mobile number is already registered",
            Self::Email => "This email is already registered",
            Self::TeamName => "This team name is already registered",
        }
    }

    pub fn value_of(self, registration: &ValidatedRegistration) -> &str {
        match self {
            Self::Mobile => &registration.participant.mobile,
            Self::Email => &registration.participant.email,
            Self::TeamName => &registration.team.name,
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table(), self.column())
    }
}

/// Whether no row in `table` has `column == value`.
///
/// A failed lookup is returned as the error, never read as "taken" or "free".
pub async fn is_unique(
    store: &dyn RegistrationStore,
    table: &str,
    column: &str,
    value: &str,
) -> Result<bool, StoreError> {
    let matches = store.count_matching(table, column, value).await?;
    debug!(table, column, matches, "uniqueness lookup");
    Ok(matches == 0)
}
