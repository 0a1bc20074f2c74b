//! HTTP error handling and response conversion.
//!
//! Application errors map to a status code and a JSON body of the form
//! `{ "error": "..." }`. Schema failures additionally carry
//! `"fields": { "<path>": ["message", ...] }`.

use crate::domain::registration::{
    errors::{FieldErrors, RegistrationError},
    members::MemberListError,
    value_objects::UnknownOption,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Application-level errors returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// Session or member not found (404).
    NotFound(String),

    /// Malformed request value (400).
    BadRequest(String),

    /// Value already registered, or the form is busy submitting (409).
    Conflict(String),

    /// Form values failed the schema (422).
    ValidationFailed(FieldErrors),

    /// The registration store failed or was unreachable (502).
    Store(String),

    /// Unclassified internal error (500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Conflict(msg) => write!(f, "Conflict: {}", msg),
            Self::ValidationFailed(fields) => {
                write!(f, "Validation failed: {}", fields.paths().collect::<Vec<_>>().join(", "))
            }
            Self::Store(msg) => write!(f, "Store error: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Store(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-safe message. Store messages are passed through since they are
    /// what the notification shows.
    fn user_message(&self) -> String {
        match self {
            Self::NotFound(_) => "Resource not found".into(),
            Self::BadRequest(msg) | Self::Conflict(msg) | Self::Store(msg) => msg.clone(),
            Self::ValidationFailed(_) => "Please correct the highlighted fields".into(),
            Self::Internal(_) => "Internal server error".into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.user_message();

        match status {
            StatusCode::INTERNAL_SERVER_ERROR | StatusCode::BAD_GATEWAY => {
                tracing::error!("error={}", self);
            }
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::CONFLICT => {
                tracing::warn!("error={}", self);
            }
            _ => {
                tracing::info!("error={}", self);
            }
        }

        let body = match self {
            Self::ValidationFailed(fields) => json!({ "error": message, "fields": fields }),
            _ => json!({ "error": message }),
        };
        (status, Json(body)).into_response()
    }
}

// === Domain Error Conversion ===

impl From<RegistrationError> for AppError {
    fn from(err: RegistrationError) -> Self {
        let message = err.user_message();
        match err {
            RegistrationError::Validation(fields) => AppError::ValidationFailed(fields),
            RegistrationError::Conflict(_) | RegistrationError::SubmissionInProgress => {
                AppError::Conflict(message)
            }
            RegistrationError::TeamPersistence {
                participant_id,
                compensated,
                ..
            } => {
                tracing::error!(%participant_id, compensated, "Registration left without a team");
                AppError::Store(message)
            }
            RegistrationError::UniquenessCheck { .. } | RegistrationError::ParticipantPersistence(_) => {
                AppError::Store(message)
            }
        }
    }
}

impl From<MemberListError> for AppError {
    fn from(err: MemberListError) -> Self {
        match err {
            MemberListError::UnknownMember(_) => AppError::NotFound(err.to_string()),
        }
    }
}

impl From<UnknownOption> for AppError {
    fn from(err: UnknownOption) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
