use super::value_objects::{Gender, Profession, TeamStrength, YearOfStudy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A teammate other than the submitting participant. All fields are free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TeammateEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

/// Validated participant, ready to be written to the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewParticipant {
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub mobile: String,
    pub email: String,
    pub educational_institution: String,
    pub current_year_of_study: YearOfStudy,
    pub field_of_study: String,
}

/// Persisted participant as returned by the store.
///
/// `id` is assigned by the store on insert and becomes the join key for the
/// participant's [`Team`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Participant {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub mobile: String,
    pub email: String,
    pub educational_institution: String,
    pub current_year_of_study: YearOfStudy,
    pub field_of_study: String,
}

impl Participant {
    pub fn from_new(id: Uuid, created_at: DateTime<Utc>, new: &NewParticipant) -> Self {
        Self {
            id,
            created_at,
            name: new.name.clone(),
            age: new.age,
            gender: new.gender,
            mobile: new.mobile.clone(),
            email: new.email.clone(),
            educational_institution: new.educational_institution.clone(),
            current_year_of_study: new.current_year_of_study,
            field_of_study: new.field_of_study.clone(),
        }
    }
}

/// Validated team, still missing the participant reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewTeam {
    pub name: String,
    pub strength: TeamStrength,
    pub profession: Profession,
    pub company_name: Option<String>,
    pub company_cin: Option<String>,
    pub video_link: String,
    pub members: Vec<TeammateEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Team {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub strength: TeamStrength,
    pub profession: Profession,
    pub company_name: Option<String>,
    pub company_cin: Option<String>,
    pub video_link: String,
    pub members: Vec<TeammateEntry>,
}

impl Team {
    pub fn from_new(id: Uuid, user_id: Uuid, new: &NewTeam) -> Self {
        Self {
            id,
            user_id,
            name: new.name.clone(),
            strength: new.strength,
            profession: new.profession,
            company_name: new.company_name.clone(),
            company_cin: new.company_cin.clone(),
            video_link: new.video_link.clone(),
            members: new.members.clone(),
        }
    }
}

/// Output of the schema layer: both halves of a registration, fully typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRegistration {
    pub participant: NewParticipant,
    pub team: NewTeam,
}
