use crate::{
    application::{
        registration_session::{SessionView, SharedSession, acquire},
        submit_registration::dto::{Notification, RegistrationReceipt},
    },
    domain::registration::{
        entity::TeammateEntry,
        members::MemberSlot,
        schema::{ParticipantInput, TeamDetailsInput},
        value_objects::TeamStrength,
    },
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct TeamSizeRequest {
    pub strength: String,
}

#[derive(Debug, Serialize)]
pub struct MemberUpdateResponse {
    pub member: MemberSlot,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub receipt: RegistrationReceipt,
    pub notification: Notification,
}

async fn find_session(state: &AppState, id: Uuid) -> Result<SharedSession, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Registration session {}", id)))
}

pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionView>) {
    let session = state.sessions.create().await;
    let view = session.lock().await.view();
    (StatusCode::CREATED, Json(view))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id).await?;
    let guard = acquire(&session)?;
    Ok(Json(guard.view()))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let session = find_session(&state, id).await?;
    // A session is never dropped out from under a running submission.
    let _guard = acquire(&session)?;
    state.sessions.remove(id).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_participant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ParticipantInput>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id).await?;
    let mut guard = acquire(&session)?;
    guard.update_participant(input);
    Ok(Json(guard.view()))
}

pub async fn update_team_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(details): Json<TeamDetailsInput>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id).await?;
    let mut guard = acquire(&session)?;
    guard.update_team_details(details);
    Ok(Json(guard.view()))
}

pub async fn change_team_size(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TeamSizeRequest>,
) -> Result<Json<SessionView>, AppError> {
    let strength: TeamStrength = req.strength.trim().parse()?;
    let session = find_session(&state, id).await?;
    let mut guard = acquire(&session)?;
    guard.change_team_size(strength);
    tracing::debug!(session_id = %id, %strength, members = guard.form().team.members.len(), "Team size changed");
    Ok(Json(guard.view()))
}

pub async fn update_member(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(Uuid, Uuid)>,
    Json(entry): Json<TeammateEntry>,
) -> Result<Json<MemberUpdateResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let mut guard = acquire(&session)?;
    let member = guard.update_member(member_id, entry)?.clone();
    Ok(Json(MemberUpdateResponse {
        member,
        session: guard.view(),
    }))
}

/// Runs one submission attempt for the session.
///
/// The attempt runs on its own task and owns the session lock until it
/// finishes, so a dropped connection neither cancels it halfway nor frees the
/// form for a second attempt early.
pub async fn submit_registration(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SubmissionResponse>), AppError> {
    let session = find_session(&state, id).await?;
    let mut guard = acquire(&session)?;
    let use_case = state.submit_registration.clone();

    let (result, notification) = tokio::spawn(async move {
        let result = guard.submit(&use_case).await;
        (result, guard.notification().cloned())
    })
    .await
    .map_err(|e| AppError::Internal(format!("Submission task failed: {}", e)))?;

    let receipt = result?;
    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            receipt,
            notification: notification.unwrap_or_else(Notification::success),
        }),
    ))
}
