use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::note::NoteId;

pub type StackId = Uuid;

/// Minimum membership; smaller stacks are dissolved.
pub const MIN_STACK_SIZE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackType {
    /// Every member is independently actionable.
    Group,
    /// Only the top member is active; the rest are blocked.
    Sequential,
}

impl StackType {
    pub fn as_str(self) -> &'static str {
        match self {
            StackType::Group => "group",
            StackType::Sequential => "seq",
        }
    }
}

/// An ordered group of notes. The last id in `note_ids` is the top card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stack {
    pub id: StackId,
    pub note_ids: Vec<NoteId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: StackType,
}

impl Stack {
    pub fn new(id: StackId, note_ids: Vec<NoteId>, kind: StackType, title: Option<String>) -> Self {
        Self {
            id,
            note_ids,
            title: title.filter(|t| !t.trim().is_empty()),
            kind,
        }
    }

    pub fn top(&self) -> Option<NoteId> {
        self.note_ids.last().copied()
    }

    pub fn contains(&self, note_id: NoteId) -> bool {
        self.note_ids.contains(&note_id)
    }

    pub fn position(&self, note_id: NoteId) -> Option<usize> {
        self.note_ids.iter().position(|id| *id == note_id)
    }

    pub fn len(&self) -> usize {
        self.note_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.note_ids.is_empty()
    }

    pub fn is_undersized(&self) -> bool {
        self.note_ids.len() < MIN_STACK_SIZE
    }

    /// True when `note_id` is a non-top member of a sequential stack.
    pub fn blocks(&self, note_id: NoteId) -> bool {
        self.kind == StackType::Sequential && self.contains(note_id) && self.top() != Some(note_id)
    }

    /// Remove `note_id`; returns whether it was present.
    pub fn remove(&mut self, note_id: NoteId) -> bool {
        let before = self.note_ids.len();
        self.note_ids.retain(|id| *id != note_id);
        self.note_ids.len() != before
    }

    /// Swap `note_id` with its neighbour towards the top (`towards_top`)
    /// or towards the bottom. Returns false at either end.
    pub fn shift(&mut self, note_id: NoteId, towards_top: bool) -> bool {
        let Some(idx) = self.position(note_id) else {
            return false;
        };
        let target = if towards_top {
            idx + 1
        } else if idx > 0 {
            idx - 1
        } else {
            return false;
        };
        if target >= self.note_ids.len() {
            return false;
        }
        self.note_ids.swap(idx, target);
        true
    }
}
