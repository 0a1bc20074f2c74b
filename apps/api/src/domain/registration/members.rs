//! Teammate entries whose count follows the selected team strength.

use super::entity::TeammateEntry;
use super::value_objects::TeamStrength;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemberListError {
    #[error("No teammate entry with id {0}")]
    UnknownMember(Uuid),
}

/// One teammate entry plus an identity that survives insertions and removals,
/// so a renderer can key on it instead of the position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MemberSlot {
    pub id: Uuid,
    #[serde(flatten)]
    pub entry: TeammateEntry,
}

impl MemberSlot {
    pub fn empty() -> Self {
        Self {
            id: Uuid::now_v7(),
            entry: TeammateEntry::default(),
        }
    }
}

/// Grows or shrinks `slots` to exactly `target` entries.
///
/// New entries are empty and appended at the end. Removal starts from the
/// highest index. Lower-index entries keep their id and content either way.
pub fn resize_members(mut slots: Vec<MemberSlot>, target: usize) -> Vec<MemberSlot> {
    if target < slots.len() {
        slots.truncate(target);
    } else {
        let missing = target - slots.len();
        slots.extend(std::iter::repeat_with(MemberSlot::empty).take(missing));
    }
    slots
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MemberList(Vec<MemberSlot>);

impl MemberList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn slots(&self) -> &[MemberSlot] {
        &self.0
    }

    /// Resizes the list to `strength - 1` entries. Calling it again with the
    /// same strength changes nothing.
    pub fn on_team_size_change(&mut self, strength: TeamStrength) {
        let target = strength.teammate_slots();
        if target == self.0.len() {
            return;
        }
        let current = std::mem::take(&mut self.0);
        self.0 = resize_members(current, target);
    }

    pub fn update(&mut self, id: Uuid, entry: TeammateEntry) -> Result<&MemberSlot, MemberListError> {
        let slot = self
            .0
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(MemberListError::UnknownMember(id))?;
        slot.entry = entry;
        Ok(slot)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// The entries in order, without their ids.
    pub fn entries(&self) -> Vec<TeammateEntry> {
        self.0.iter().map(|s| s.entry.clone()).collect()
    }
}
