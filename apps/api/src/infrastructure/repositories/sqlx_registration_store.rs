use crate::domain::registration::{
    entity::{NewParticipant, NewTeam, Participant, Team, TeammateEntry},
    errors::StoreError,
    repository::{PARTICIPANTS_TABLE, RegistrationStore, TEAMS_TABLE},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, postgres::PgDatabaseError, types::Json};
use uuid::Uuid;

/// Lookups the uniqueness checker may issue. Identifiers are never taken from
/// caller input.
const LOOKUP_COLUMNS: [(&str, &str); 3] = [
    (PARTICIPANTS_TABLE, "mobile"),
    (PARTICIPANTS_TABLE, "email"),
    (TEAMS_TABLE, "name"),
];

const PARTICIPANT_COLUMNS: &str = "id, created_at, name, age, gender, mobile, email, \
     educational_institution, current_year_of_study, field_of_study";

const TEAM_COLUMNS: &str =
    "id, user_id, name, strength, profession, company_name, company_cin, video_link, members";

pub struct SqlxRegistrationStore {
    pub pool: PgPool,
}

impl SqlxRegistrationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ParticipantRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    name: String,
    age: i32,
    gender: String,
    mobile: String,
    email: String,
    educational_institution: String,
    current_year_of_study: String,
    field_of_study: String,
}

impl TryFrom<ParticipantRow> for Participant {
    type Error = StoreError;

    fn try_from(row: ParticipantRow) -> Result<Self, Self::Error> {
        Ok(Participant {
            id: row.id,
            created_at: row.created_at,
            name: row.name,
            age: row.age,
            gender: row.gender.parse().map_err(decode_error)?,
            mobile: row.mobile,
            email: row.email,
            educational_institution: row.educational_institution,
            current_year_of_study: row.current_year_of_study.parse().map_err(decode_error)?,
            field_of_study: row.field_of_study,
        })
    }
}

#[derive(Debug, FromRow)]
struct TeamRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    strength: String,
    profession: String,
    company_name: Option<String>,
    company_cin: Option<String>,
    video_link: String,
    members: Json<Vec<TeammateEntry>>,
}

impl TryFrom<TeamRow> for Team {
    type Error = StoreError;

    fn try_from(row: TeamRow) -> Result<Self, Self::Error> {
        Ok(Team {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            strength: row.strength.parse().map_err(decode_error)?,
            profession: row.profession.parse().map_err(decode_error)?,
            company_name: row.company_name,
            company_cin: row.company_cin,
            video_link: row.video_link,
            members: row.members.0,
        })
    }
}

fn decode_error(err: impl std::fmt::Display) -> StoreError {
    StoreError::new("Stored registration could not be decoded").with_details(err.to_string())
}

/// Converts a driver error into the store's error shape, keeping the
/// Postgres SQLSTATE, detail and hint when the server sent them.
fn store_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let mut store_err = StoreError::new(db_err.message());
            if let Some(code) = db_err.code() {
                store_err = store_err.with_code(code);
            }
            match db_err.try_downcast_ref::<PgDatabaseError>() {
                Some(pg) => {
                    store_err = store_err.with_details(pg.detail().unwrap_or_default());
                    if let Some(hint) = pg.hint() {
                        store_err = store_err.with_hint(hint);
                    }
                }
                None => store_err = store_err.with_details(err.to_string()),
            }
            store_err
        }
        sqlx::Error::PoolTimedOut => StoreError::new("Connection pool exhausted").with_details(err.to_string()),
        sqlx::Error::PoolClosed => StoreError::new("Database connection unavailable").with_details(err.to_string()),
        _ => StoreError::new("Database error").with_details(err.to_string()),
    }
}

#[async_trait]
impl RegistrationStore for SqlxRegistrationStore {
    async fn count_matching(&self, table: &str, column: &str, value: &str) -> Result<i64, StoreError> {
        let (table, column) = LOOKUP_COLUMNS
            .into_iter()
            .find(|(t, c)| *t == table && *c == column)
            .ok_or_else(|| {
                StoreError::new(format!("Lookup on {table}.{column} is not supported"))
                    .with_code("42703")
            })?;

        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table} WHERE {column} = $1"))
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)
    }

    async fn insert_participant(&self, participant: &NewParticipant) -> Result<Participant, StoreError> {
        let row = sqlx::query_as::<_, ParticipantRow>(&format!(
            "INSERT INTO users (
                id, name, age, gender, mobile, email,
                educational_institution, current_year_of_study, field_of_study
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PARTICIPANT_COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(&participant.name)
        .bind(participant.age)
        .bind(participant.gender.as_str())
        .bind(&participant.mobile)
        .bind(&participant.email)
        .bind(&participant.educational_institution)
        .bind(participant.current_year_of_study.as_str())
        .bind(&participant.field_of_study)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        row.try_into()
    }

    async fn insert_team(&self, team: &NewTeam, user_id: Uuid) -> Result<Team, StoreError> {
        let row = sqlx::query_as::<_, TeamRow>(&format!(
            "INSERT INTO teams (
                id, user_id, name, strength, profession,
                company_name, company_cin, video_link, members
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {TEAM_COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(&team.name)
        .bind(team.strength.as_str())
        .bind(team.profession.as_str())
        .bind(&team.company_name)
        .bind(&team.company_cin)
        .bind(&team.video_link)
        .bind(Json(&team.members))
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        row.try_into()
    }

    async fn delete_participant(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(())
    }
}
