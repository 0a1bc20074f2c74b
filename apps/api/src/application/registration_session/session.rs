use crate::application::submit_registration::{
    dto::{Notification, RegistrationReceipt, SubmissionState},
    use_case::SubmitRegistrationUseCase,
};
use crate::domain::registration::{
    entity::TeammateEntry,
    errors::{FieldErrors, RegistrationError},
    members::{MemberListError, MemberSlot},
    schema::{ParticipantInput, RegistrationForm, TeamDetailsInput},
    value_objects::TeamStrength,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// State of one registration form.
///
/// Section updates only touch their own values; the submission-level fields
/// (state, field errors, notification) are written by [`RegistrationSession::submit`] alone.
#[derive(Debug, Clone)]
pub struct RegistrationSession {
    id: Uuid,
    form: RegistrationForm,
    state: SubmissionState,
    field_errors: FieldErrors,
    notification: Option<Notification>,
}

/// Serializable snapshot handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionView {
    pub id: Uuid,
    pub form: RegistrationForm,
    pub state: SubmissionState,
    pub field_errors: FieldErrors,
    pub notification: Option<Notification>,
}

impl Default for RegistrationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            form: RegistrationForm::default(),
            state: SubmissionState::Idle,
            field_errors: FieldErrors::new(),
            notification: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn update_participant(&mut self, input: ParticipantInput) {
        self.form.user = input;
    }

    pub fn update_team_details(&mut self, details: TeamDetailsInput) {
        self.form.team.apply_details(details);
    }

    /// Selects a team size and resizes the teammate entries to match.
    pub fn change_team_size(&mut self, strength: TeamStrength) {
        self.form.team.strength = Some(strength.as_str().to_string());
        self.form.team.members.on_team_size_change(strength);
    }

    pub fn update_member(&mut self, id: Uuid, entry: TeammateEntry) -> Result<&MemberSlot, MemberListError> {
        self.form.team.members.update(id, entry)
    }

    /// Runs one attempt with the current form values.
    ///
    /// Success resets the form to its defaults. Any failure keeps the values
    /// so they can be corrected and submitted again.
    pub async fn submit(
        &mut self,
        use_case: &SubmitRegistrationUseCase,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        self.notification = None;
        let state = &mut self.state;
        let result = use_case.execute(&self.form, |next| *state = next).await;

        match &result {
            Ok(_) => {
                self.form = RegistrationForm::default();
                self.field_errors.clear();
                self.notification = Some(Notification::success());
            }
            Err(RegistrationError::Validation(fields)) => {
                self.field_errors = fields.clone();
            }
            Err(err) => {
                self.field_errors.clear();
                self.notification = Notification::for_error(err);
            }
        }
        result
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            form: self.form.clone(),
            state: self.state,
            field_errors: self.field_errors.clone(),
            notification: self.notification.clone(),
        }
    }
}
