use crate::domain::registration::{
    entity::{Participant, Team},
    errors::RegistrationError,
    uniqueness::UniqueField,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

/// Where one submission attempt currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(tag = "state", content = "field", rename_all = "snake_case")]
#[ts(export)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    CheckingUniqueness(UniqueField),
    PersistingParticipant,
    PersistingTeam,
    Succeeded,
    Failed,
}

/// What happens to an already-written participant when its team insert fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PartialFailurePolicy {
    /// Leave the participant row in place and report the team failure.
    #[default]
    Expose,
    /// Delete the participant row again before reporting the team failure.
    Compensate,
}

impl FromStr for PartialFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expose" => Ok(Self::Expose),
            "compensate" => Ok(Self::Compensate),
            other => Err(format!("unknown partial failure policy: {other}")),
        }
    }
}

/// The linked pair of records written by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegistrationReceipt {
    pub participant: Participant,
    pub team: Team,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// The single toast shown for a finished attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn success() -> Self {
        Self {
            title: "Success!".to_string(),
            description: "Your registration has been submitted successfully.".to_string(),
            variant: NotificationVariant::Default,
        }
    }

    /// `None` for validation failures, which are shown next to each field.
    pub fn for_error(err: &RegistrationError) -> Option<Self> {
        if err.field_errors().is_some() {
            return None;
        }
        Some(Self {
            title: "Error".to_string(),
            description: err.user_message(),
            variant: NotificationVariant::Destructive,
        })
    }
}
