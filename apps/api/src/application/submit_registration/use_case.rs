use super::dto::{PartialFailurePolicy, RegistrationReceipt, SubmissionState};
use crate::domain::registration::{
    entity::ValidatedRegistration,
    errors::{RegistrationError, StoreError},
    repository::RegistrationStore,
    schema::RegistrationForm,
    uniqueness::{UniqueField, is_unique},
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Runs one registration attempt from validation to the two inserts.
///
/// The attempt moves through
/// `Validating -> CheckingUniqueness(mobile, email, team name) -> PersistingParticipant -> PersistingTeam`
/// and ends in `Succeeded` or `Failed`. Every step awaits the previous one;
/// the first failure ends the attempt and nothing is retried.
///
/// The participant and team are written by two separate store calls. If the
/// team insert fails the participant row already exists; what happens to it is
/// decided by the configured [`PartialFailurePolicy`].
pub struct SubmitRegistrationUseCase {
    store: Arc<dyn RegistrationStore>,
    policy: PartialFailurePolicy,
}

impl SubmitRegistrationUseCase {
    pub fn new(store: Arc<dyn RegistrationStore>, policy: PartialFailurePolicy) -> Self {
        info!(?policy, "Initializing SubmitRegistrationUseCase");
        Self { store, policy }
    }

    /// Submits `form`, reporting each state change to `on_transition`.
    ///
    /// # Errors
    /// - [`RegistrationError::Validation`] before any store call
    /// - [`RegistrationError::Conflict`] for the first taken value, in check order
    /// - [`RegistrationError::UniquenessCheck`] when a lookup itself fails
    /// - [`RegistrationError::ParticipantPersistence`] / [`RegistrationError::TeamPersistence`]
    ///   when an insert fails
    #[instrument(skip(self, form, on_transition), fields(team_strength = ?form.team.strength))]
    pub async fn execute<F>(
        &self,
        form: &RegistrationForm,
        mut on_transition: F,
    ) -> Result<RegistrationReceipt, RegistrationError>
    where
        F: FnMut(SubmissionState) + Send,
    {
        let result = self.run(form, &mut on_transition).await;
        match &result {
            Ok(receipt) => {
                info!(
                    participant_id = %receipt.participant.id,
                    team_id = %receipt.team.id,
                    "Registration stored"
                );
                on_transition(SubmissionState::Succeeded);
            }
            Err(err) => {
                warn!(error = %err, "Registration attempt failed");
                on_transition(SubmissionState::Failed);
            }
        }
        result
    }

    async fn run<F>(
        &self,
        form: &RegistrationForm,
        on_transition: &mut F,
    ) -> Result<RegistrationReceipt, RegistrationError>
    where
        F: FnMut(SubmissionState) + Send,
    {
        on_transition(SubmissionState::Validating);
        let registration = form.validate_all().map_err(|fields| {
            debug!(failing_fields = fields.len(), "Form rejected by schema");
            RegistrationError::Validation(fields)
        })?;

        self.check_uniqueness(&registration, on_transition).await?;

        on_transition(SubmissionState::PersistingParticipant);
        let participant = self
            .store
            .insert_participant(&registration.participant)
            .await
            .map_err(|e| {
                error!("Participant insert failed: {}", e);
                RegistrationError::ParticipantPersistence(e)
            })?;
        debug!(participant_id = %participant.id, "Participant stored");

        on_transition(SubmissionState::PersistingTeam);
        let team = match self.store.insert_team(&registration.team, participant.id).await {
            Ok(team) => team,
            Err(source) => return Err(self.team_insert_failed(participant.id, source).await),
        };

        Ok(RegistrationReceipt { participant, team })
    }

    /// Checks mobile, then email, then team name, stopping at the first value
    /// that is taken or whose lookup fails.
    async fn check_uniqueness<F>(
        &self,
        registration: &ValidatedRegistration,
        on_transition: &mut F,
    ) -> Result<(), RegistrationError>
    where
        F: FnMut(SubmissionState) + Send,
    {
        for field in UniqueField::CHECK_ORDER {
            on_transition(SubmissionState::CheckingUniqueness(field));
            let free = is_unique(
                self.store.as_ref(),
                field.table(),
                field.column(),
                field.value_of(registration),
            )
            .await
            .map_err(|source| {
                error!("Uniqueness lookup for {} failed: {}", field, source);
                RegistrationError::UniquenessCheck { field, source }
            })?;

            if !free {
                warn!(%field, "Value already registered");
                return Err(RegistrationError::Conflict(field));
            }
        }
        Ok(())
    }

    async fn team_insert_failed(&self, participant_id: Uuid, source: StoreError) -> RegistrationError {
        error!(%participant_id, "Team insert failed: {}", source);
        let compensated = match self.policy {
            PartialFailurePolicy::Expose => {
                warn!(%participant_id, "Participant left without a team");
                false
            }
            PartialFailurePolicy::Compensate => match self.store.delete_participant(participant_id).await {
                Ok(()) => {
                    info!(%participant_id, "Removed participant after team insert failure");
                    true
                }
                Err(e) => {
                    error!(%participant_id, "Could not remove participant after team insert failure: {}", e);
                    false
                }
            },
        };
        RegistrationError::TeamPersistence {
            participant_id,
            compensated,
            source,
        }
    }
}
