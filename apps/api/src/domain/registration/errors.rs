use super::uniqueness::UniqueField;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

/// Fallback text when the store reports a failure without a message.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Failure reported by the registration store, shaped like a PostgREST error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[error("{message}")]
#[ts(export)]
pub struct StoreError {
    pub message: String,
    pub code: Option<String>,
    pub details: String,
    pub hint: Option<String>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            details: String::new(),
            hint: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Message suitable for a notification; never empty.
    pub fn user_message(&self) -> &str {
        if self.message.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE
        } else {
            &self.message
        }
    }
}

/// Validation messages keyed by dotted field path, e.g. `user.age`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_default().push(message.into());
    }

    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.0.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Every way a single submission attempt can end without a registration.
#[derive(Debug, Clone, Error)]
pub enum RegistrationError {
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("{}", .0.conflict_message())]
    Conflict(UniqueField),

    #[error("Uniqueness check for {field} failed: {source}")]
    UniquenessCheck {
        field: UniqueField,
        #[source]
        source: StoreError,
    },

    #[error("Failed to save participant: {0}")]
    ParticipantPersistence(#[source] StoreError),

    /// The participant row was already written when the team insert failed.
    /// `compensated` records whether that row was deleted again.
    #[error("Failed to save team for participant {participant_id}: {source}")]
    TeamPersistence {
        participant_id: Uuid,
        compensated: bool,
        #[source]
        source: StoreError,
    },

    #[error("A submission is already in progress")]
    SubmissionInProgress,
}

impl RegistrationError {
    /// Text for the single notification shown for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(_) => "Please correct the highlighted fields".to_string(),
            Self::Conflict(field) => field.conflict_message().to_string(),
            Self::UniquenessCheck { source, .. }
            | Self::ParticipantPersistence(source)
            | Self::TeamPersistence { source, .. } => source.user_message().to_string(),
            Self::SubmissionInProgress => self.to_string(),
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
