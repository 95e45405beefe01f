//! Bounded undo log of invertible actions.
//!
//! Only create, delete, complete and stack creation are recorded. Records
//! are applied (inverted) by `NoteBoard`; this module only stores them.
//! There is no redo: a popped record is gone.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::note::{Note, NoteId};
use crate::stack::{Stack, StackId};

/// What a record undoes. Snapshots are owned copies, detached from the
/// live note they describe.
#[derive(Debug, Clone, PartialEq)]
pub enum UndoAction {
    CreateNote { note_id: NoteId },
    DeleteNote { note: Note },
    CompleteNote { note_id: NoteId, note: Note },
    /// Undo removes the stack and every listed note.
    CreateStack { stack_id: StackId, note_ids: Vec<NoteId> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct UndoRecord {
    pub action: UndoAction,
    pub timestamp: DateTime<Utc>,
    /// Fixed at record time; later edits to the note do not change it.
    pub description: String,
}

fn quoted(content: &str) -> String {
    const MAX_CHARS: usize = 40;
    if content.chars().count() <= MAX_CHARS {
        format!("\"{}\"", content)
    } else {
        let cut: String = content.chars().take(MAX_CHARS).collect();
        format!("\"{}...\"", cut)
    }
}

impl UndoRecord {
    pub fn create_note(note: &Note, at: DateTime<Utc>) -> Self {
        Self {
            action: UndoAction::CreateNote { note_id: note.id },
            timestamp: at,
            description: format!("Create {}", quoted(&note.content)),
        }
    }

    pub fn delete_note(note: Note, at: DateTime<Utc>) -> Self {
        let description = format!("Delete {}", quoted(&note.content));
        Self {
            action: UndoAction::DeleteNote { note },
            timestamp: at,
            description,
        }
    }

    pub fn complete_note(note: Note, at: DateTime<Utc>) -> Self {
        let description = format!("Complete {}", quoted(&note.content));
        Self {
            action: UndoAction::CompleteNote {
                note_id: note.id,
                note,
            },
            timestamp: at,
            description,
        }
    }

    pub fn create_stack(stack: &Stack, at: DateTime<Utc>) -> Self {
        let description = match &stack.title {
            Some(title) => format!(
                "Create {} stack {} ({} notes)",
                stack.kind.as_str(),
                quoted(title),
                stack.len()
            ),
            None => format!("Create {} stack of {} notes", stack.kind.as_str(), stack.len()),
        };
        Self {
            action: UndoAction::CreateStack {
                stack_id: stack.id,
                note_ids: stack.note_ids.clone(),
            },
            timestamp: at,
            description,
        }
    }
}

/// LIFO list of records; the oldest is evicted once `capacity` is exceeded.
#[derive(Debug, Clone)]
pub struct UndoLog {
    records: VecDeque<UndoRecord>,
    capacity: usize,
}

impl UndoLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, record: UndoRecord) {
        self.records.push_back(record);
        while self.records.len() > self.capacity {
            if let Some(evicted) = self.records.pop_front() {
                tracing::debug!(description = %evicted.description, "Evicted oldest undo record");
            }
        }
    }

    pub fn pop(&mut self) -> Option<UndoRecord> {
        self.records.pop_back()
    }

    /// Remove every record from `index` to the newest, returned newest first
    /// (the order they must be inverted in). Out-of-range yields nothing.
    pub fn drain_from(&mut self, index: usize) -> Vec<UndoRecord> {
        if index >= self.records.len() {
            return Vec::new();
        }
        let mut drained: Vec<UndoRecord> = self.records.drain(index..).collect();
        drained.reverse();
        drained
    }

    /// Records oldest first; index matches [`UndoLog::drain_from`].
    pub fn records(&self) -> impl Iterator<Item = &UndoRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&UndoRecord> {
        self.records.back()
    }

    pub fn can_undo(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.records.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::new(notestack_core::config::DEFAULT_UNDO_CAPACITY)
    }
}
