//! The note repository every view reads and writes.
//!
//! `NoteBoard` exclusively owns the note and stack collections and the undo
//! log. All mutation goes through its methods, so the stack invariants hold
//! after every call and each undo record is pushed in the same call as the
//! mutation it describes.

use chrono::{Local, NaiveDate, Weekday};
use notestack_core::{Clock, NotestackError, NotestackResult};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::backup::BackupSnapshot;
use crate::counter::CompletionCounter;
use crate::directive::{self, Directives};
use crate::filter::{group_by_day, passes, ActiveFilters, DayColumn};
use crate::note::{Note, NoteId, NoteOverrides};
use crate::stack::{Stack, StackId, StackType, MIN_STACK_SIZE};
use crate::undo::{UndoAction, UndoLog, UndoRecord};

pub struct NoteBoard {
    /// Most recent first.
    notes: Vec<Note>,
    stacks: Vec<Stack>,
    undo: UndoLog,
    counter: CompletionCounter,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for NoteBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoteBoard")
            .field("notes", &self.notes.len())
            .field("stacks", &self.stacks.len())
            .field("undo_depth", &self.undo.depth())
            .field("counter", &self.counter)
            .finish()
    }
}

impl NoteBoard {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_undo_capacity(clock, notestack_core::config::DEFAULT_UNDO_CAPACITY)
    }

    pub fn with_undo_capacity(clock: Arc<dyn Clock>, capacity: usize) -> Self {
        Self {
            notes: Vec::new(),
            stacks: Vec::new(),
            undo: UndoLog::new(capacity),
            counter: CompletionCounter::default(),
            clock,
        }
    }

    /// Rebuild from persisted collections. Inconsistent stack membership is
    /// repaired rather than rejected, since the data is already on disk.
    pub fn from_parts(
        notes: Vec<Note>,
        stacks: Vec<Stack>,
        counter: CompletionCounter,
        clock: Arc<dyn Clock>,
        undo_capacity: usize,
    ) -> Self {
        let mut board = Self {
            notes,
            stacks,
            undo: UndoLog::new(undo_capacity),
            counter,
            clock,
        };
        board.repair();
        board
    }

    fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&Local).date_naive()
    }

    // Queries

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn stack(&self, id: StackId) -> Option<&Stack> {
        self.stacks.iter().find(|s| s.id == id)
    }

    pub fn stack_of(&self, note_id: NoteId) -> Option<&Stack> {
        self.note(note_id)
            .and_then(|n| n.stack_id)
            .and_then(|stack_id| self.stack(stack_id))
    }

    pub fn undo_log(&self) -> &UndoLog {
        &self.undo
    }

    pub fn completion_counter(&self) -> &CompletionCounter {
        &self.counter
    }

    pub fn completed_today(&self) -> u32 {
        self.counter.count_on(self.today())
    }

    /// Sum of time estimates over focused notes.
    pub fn focused_minutes(&self) -> u32 {
        self.notes
            .iter()
            .filter(|n| n.focused)
            .filter_map(|n| n.time_minutes)
            .sum()
    }

    pub fn visible_notes(&self, active: &ActiveFilters) -> Vec<&Note> {
        self.notes
            .iter()
            .filter(|n| passes(n, &self.stacks, active))
            .collect()
    }

    pub fn day_columns(&self, active: &ActiveFilters) -> Vec<DayColumn<'_>> {
        group_by_day(&self.notes, &self.stacks, active)
    }

    // Note lifecycle

    /// Create a note from board input, parsing trailing tags.
    pub fn create_note(&mut self, raw_text: &str, overrides: NoteOverrides) -> NotestackResult<Note> {
        self.create_note_with(directive::parse(raw_text), overrides)
    }

    /// Create a note from already-extracted directives (plan documents).
    pub fn create_note_with(
        &mut self,
        directives: Directives,
        overrides: NoteOverrides,
    ) -> NotestackResult<Note> {
        let note = self.insert_new_note(directives, overrides)?;
        self.undo
            .push(UndoRecord::create_note(&note, self.clock.now()));
        tracing::info!(note_id = %note.id, content = %note.content, "Created note");
        Ok(note)
    }

    /// The one constructor path: validate, stamp, insert at the front.
    fn insert_new_note(
        &mut self,
        directives: Directives,
        overrides: NoteOverrides,
    ) -> NotestackResult<Note> {
        if !directives.has_content() {
            return Err(NotestackError::Validation(
                "note content is empty".to_string(),
            ));
        }
        let mut note = Note::new(Uuid::new_v4(), directives, self.clock.now());
        note.apply_overrides(overrides);
        self.notes.insert(0, note.clone());
        Ok(note)
    }

    pub fn delete_note(&mut self, id: NoteId) -> Option<Note> {
        let Some(snapshot) = self.take_note(id) else {
            tracing::debug!(note_id = %id, "Delete ignored: note not found");
            return None;
        };
        self.undo
            .push(UndoRecord::delete_note(snapshot.clone(), self.clock.now()));
        tracing::info!(note_id = %id, "Deleted note");
        Some(snapshot)
    }

    pub fn complete_note(&mut self, id: NoteId) -> Option<Note> {
        let Some(snapshot) = self.take_note(id) else {
            tracing::debug!(note_id = %id, "Complete ignored: note not found");
            return None;
        };
        let today = self.today();
        self.counter.increment(today);
        self.undo
            .push(UndoRecord::complete_note(snapshot.clone(), self.clock.now()));
        tracing::info!(note_id = %id, completed_today = self.counter.count, "Completed note");
        Some(snapshot)
    }

    /// Re-parse edited text into the note's fields. Not undo-tracked.
    pub fn edit_note(&mut self, id: NoteId, raw_text: &str) -> NotestackResult<bool> {
        let directives = directive::parse(raw_text);
        if !directives.has_content() {
            return Err(NotestackError::Validation(
                "note content is empty".to_string(),
            ));
        }
        match self.notes.iter_mut().find(|n| n.id == id) {
            Some(note) => {
                note.replace_directives(directives);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Flip focus; returns the new value. Never undo-tracked.
    pub fn toggle_focus(&mut self, id: NoteId) -> Option<bool> {
        let note = self.notes.iter_mut().find(|n| n.id == id)?;
        note.focused = !note.focused;
        tracing::debug!(note_id = %id, focused = note.focused, "Toggled focus");
        Some(note.focused)
    }

    pub fn set_assigned_day(&mut self, id: NoteId, day: Option<Weekday>) -> bool {
        match self.notes.iter_mut().find(|n| n.id == id) {
            Some(note) => {
                note.assigned_day = day;
                true
            }
            None => false,
        }
    }

    // Stacks

    /// Group existing, unstacked notes. The last id becomes the top card.
    pub fn create_stack(
        &mut self,
        note_ids: &[NoteId],
        kind: StackType,
        title: Option<String>,
    ) -> NotestackResult<StackId> {
        if note_ids.len() < MIN_STACK_SIZE {
            return Err(NotestackError::Validation(format!(
                "a stack needs at least {} notes, got {}",
                MIN_STACK_SIZE,
                note_ids.len()
            )));
        }
        let distinct: HashSet<_> = note_ids.iter().collect();
        if distinct.len() != note_ids.len() {
            return Err(NotestackError::Validation(
                "stack members must be distinct".to_string(),
            ));
        }
        for id in note_ids {
            match self.note(*id) {
                None => {
                    return Err(NotestackError::Validation(format!(
                        "note {} does not exist",
                        id
                    )))
                }
                Some(note) if note.stack_id.is_some() => {
                    return Err(NotestackError::Validation(format!(
                        "note {} already belongs to a stack",
                        id
                    )))
                }
                Some(_) => {}
            }
        }

        let stack = Stack::new(Uuid::new_v4(), note_ids.to_vec(), kind, title);
        Ok(self.insert_stack(stack))
    }

    /// Create every note and their stack as one undoable step. Notes are
    /// created in reverse so the first draft ends up as the top card.
    pub fn create_stack_with_notes(
        &mut self,
        drafts: Vec<Directives>,
        kind: StackType,
        title: Option<String>,
    ) -> NotestackResult<StackId> {
        let drafts: Vec<Directives> = drafts.into_iter().filter(Directives::has_content).collect();
        if drafts.len() < MIN_STACK_SIZE {
            return Err(NotestackError::Validation(format!(
                "a stack needs at least {} non-empty notes, got {}",
                MIN_STACK_SIZE,
                drafts.len()
            )));
        }

        let mut note_ids = Vec::with_capacity(drafts.len());
        for draft in drafts.into_iter().rev() {
            let note = self.insert_new_note(draft, NoteOverrides::none())?;
            note_ids.push(note.id);
        }
        let stack = Stack::new(Uuid::new_v4(), note_ids, kind, title);
        Ok(self.insert_stack(stack))
    }

    fn insert_stack(&mut self, stack: Stack) -> StackId {
        let stack_id = stack.id;
        for note in self.notes.iter_mut().filter(|n| stack.contains(n.id)) {
            note.stack_id = Some(stack_id);
        }
        self.undo
            .push(UndoRecord::create_stack(&stack, self.clock.now()));
        tracing::info!(stack_id = %stack_id, members = stack.len(), kind = stack.kind.as_str(), "Created stack");
        self.stacks.push(stack);
        stack_id
    }

    /// Append a note as the new top card. No-op if already a member.
    pub fn add_to_stack(&mut self, stack_id: StackId, note_id: NoteId) -> bool {
        let Some(current) = self.note(note_id).map(|n| n.stack_id) else {
            return false;
        };
        match self.stack(stack_id) {
            None => return false,
            Some(stack) if stack.contains(note_id) => return false,
            Some(_) => {}
        }
        if let Some(previous) = current {
            self.detach(note_id, previous);
        }
        if let Some(stack) = self.stacks.iter_mut().find(|s| s.id == stack_id) {
            stack.note_ids.push(note_id);
        }
        if let Some(note) = self.notes.iter_mut().find(|n| n.id == note_id) {
            note.stack_id = Some(stack_id);
        }
        true
    }

    /// Drop `dragged` onto `target`: joins the target's stack, or forms a new
    /// group stack with `dragged` on top.
    pub fn merge_notes(&mut self, dragged: NoteId, target: NoteId) -> NotestackResult<StackId> {
        if dragged == target {
            return Err(NotestackError::Validation(
                "cannot merge a note with itself".to_string(),
            ));
        }
        let (Some(dragged_note), Some(target_note)) = (self.note(dragged), self.note(target)) else {
            return Err(NotestackError::NotFound("note to merge".to_string()));
        };
        let dragged_stack = dragged_note.stack_id;

        if let Some(stack_id) = target_note.stack_id {
            self.add_to_stack(stack_id, dragged);
            return Ok(stack_id);
        }
        if let Some(previous) = dragged_stack {
            self.detach(dragged, previous);
        }
        self.create_stack(&[target, dragged], StackType::Group, None)
    }

    /// Remove a note from its stack, keeping the note. Not undo-tracked.
    pub fn unstack_note(&mut self, id: NoteId) -> bool {
        match self.note(id).and_then(|n| n.stack_id) {
            Some(stack_id) => {
                self.detach(id, stack_id);
                true
            }
            None => false,
        }
    }

    /// Move a member one place towards the top card. Not undo-tracked.
    pub fn move_up(&mut self, id: NoteId) -> bool {
        self.shift_in_stack(id, true)
    }

    /// Move a member one place away from the top card. Not undo-tracked.
    pub fn move_down(&mut self, id: NoteId) -> bool {
        self.shift_in_stack(id, false)
    }

    fn shift_in_stack(&mut self, id: NoteId, towards_top: bool) -> bool {
        let Some(stack_id) = self.note(id).and_then(|n| n.stack_id) else {
            return false;
        };
        self.stacks
            .iter_mut()
            .find(|s| s.id == stack_id)
            .is_some_and(|stack| stack.shift(id, towards_top))
    }

    /// Remove a note from the active set, detaching it from its stack.
    /// The returned snapshot still carries the old `stack_id`.
    fn take_note(&mut self, id: NoteId) -> Option<Note> {
        let idx = self.notes.iter().position(|n| n.id == id)?;
        let note = self.notes.remove(idx);
        if let Some(stack_id) = note.stack_id {
            self.detach(id, stack_id);
        }
        Some(note)
    }

    /// Remove `note_id` from `stack_id`, dissolving the stack if it drops
    /// below the minimum size.
    fn detach(&mut self, note_id: NoteId, stack_id: StackId) {
        if let Some(note) = self.notes.iter_mut().find(|n| n.id == note_id) {
            note.stack_id = None;
        }
        let Some(idx) = self.stacks.iter().position(|s| s.id == stack_id) else {
            return;
        };
        self.stacks[idx].remove(note_id);
        if self.stacks[idx].is_undersized() {
            self.dissolve(idx);
        }
    }

    fn dissolve(&mut self, idx: usize) {
        let stack = self.stacks.remove(idx);
        for note in self.notes.iter_mut().filter(|n| n.stack_id == Some(stack.id)) {
            note.stack_id = None;
        }
        tracing::debug!(stack_id = %stack.id, "Dissolved stack");
    }

    /// Put a snapshot back at the front. Rejoins its stack if that stack
    /// still exists; otherwise it comes back standalone.
    fn reinsert(&mut self, mut note: Note) -> bool {
        if self.note(note.id).is_some() {
            return false;
        }
        note.completed = false;
        if let Some(stack_id) = note.stack_id {
            match self.stacks.iter_mut().find(|s| s.id == stack_id) {
                Some(stack) => {
                    if !stack.contains(note.id) {
                        stack.note_ids.push(note.id);
                    }
                }
                None => note.stack_id = None,
            }
        }
        self.notes.insert(0, note);
        true
    }

    // Undo

    /// Invert the most recent record.
    pub fn undo(&mut self) -> Option<UndoRecord> {
        let record = self.undo.pop()?;
        self.invert(&record.action);
        tracing::info!(description = %record.description, "Undid action");
        Some(record)
    }

    /// Invert every record from `index` (oldest first numbering) through the
    /// newest, in one call. Returns the inverted records, newest first.
    pub fn undo_to(&mut self, index: usize) -> Vec<UndoRecord> {
        let records = self.undo.drain_from(index);
        for record in &records {
            self.invert(&record.action);
        }
        if !records.is_empty() {
            tracing::info!(count = records.len(), "Undid actions");
        }
        records
    }

    fn invert(&mut self, action: &UndoAction) {
        match action {
            UndoAction::CreateNote { note_id } => {
                if self.take_note(*note_id).is_none() {
                    tracing::debug!(note_id = %note_id, "Undo create: note already gone");
                }
            }
            UndoAction::DeleteNote { note } => {
                self.reinsert(note.clone());
            }
            UndoAction::CompleteNote { note, .. } => {
                if self.reinsert(note.clone()) {
                    let today = self.today();
                    self.counter.decrement(today);
                }
            }
            UndoAction::CreateStack { stack_id, note_ids } => {
                if let Some(idx) = self.stacks.iter().position(|s| s.id == *stack_id) {
                    self.dissolve(idx);
                }
                for id in note_ids {
                    self.take_note(*id);
                }
            }
        }
    }

    // Backup

    pub fn export_backup(&self) -> BackupSnapshot {
        BackupSnapshot {
            notes: self.notes.clone(),
            stacks: self.stacks.clone(),
            timestamp: self.clock.now(),
        }
    }

    /// Replace all state with `snapshot`. All-or-nothing; bypasses and
    /// clears the undo log.
    pub fn import_backup(&mut self, snapshot: BackupSnapshot) -> NotestackResult<()> {
        let violations = find_violations(&snapshot.notes, &snapshot.stacks);
        if let Some(first) = violations.first() {
            return Err(NotestackError::Validation(format!(
                "backup rejected: {} ({} problems)",
                first,
                violations.len()
            )));
        }
        self.notes = snapshot.notes;
        self.stacks = snapshot.stacks;
        self.undo.clear();
        tracing::info!(notes = self.notes.len(), stacks = self.stacks.len(), "Imported backup");
        Ok(())
    }

    // Invariants

    pub fn check_invariants(&self) -> NotestackResult<()> {
        match find_violations(&self.notes, &self.stacks).into_iter().next() {
            Some(violation) => Err(NotestackError::Validation(violation)),
            None => Ok(()),
        }
    }

    fn repair(&mut self) {
        let note_stack: std::collections::HashMap<NoteId, Option<StackId>> =
            self.notes.iter().map(|n| (n.id, n.stack_id)).collect();
        for stack in &mut self.stacks {
            let stack_id = stack.id;
            let before = stack.len();
            let mut seen = HashSet::new();
            stack.note_ids.retain(|id| {
                note_stack.get(id) == Some(&Some(stack_id)) && seen.insert(*id)
            });
            if stack.len() != before {
                tracing::warn!(stack_id = %stack_id, dropped = before - stack.len(), "Dropped stale stack members");
            }
        }
        while let Some(idx) = self.stacks.iter().position(Stack::is_undersized) {
            tracing::warn!(stack_id = %self.stacks[idx].id, "Dissolving undersized stack");
            self.dissolve(idx);
        }
        let stacks = &self.stacks;
        for note in &mut self.notes {
            if let Some(stack_id) = note.stack_id {
                if !stacks.iter().any(|s| s.id == stack_id && s.contains(note.id)) {
                    tracing::warn!(note_id = %note.id, "Cleared dangling stack reference");
                    note.stack_id = None;
                }
            }
        }
    }
}

fn find_violations(notes: &[Note], stacks: &[Stack]) -> Vec<String> {
    let mut violations = Vec::new();

    let mut note_ids = HashSet::new();
    for note in notes {
        if !note_ids.insert(note.id) {
            violations.push(format!("duplicate note id {}", note.id));
        }
        if note.content.trim().is_empty() {
            violations.push(format!("note {} has empty content", note.id));
        }
    }

    let mut stack_ids = HashSet::new();
    for stack in stacks {
        if !stack_ids.insert(stack.id) {
            violations.push(format!("duplicate stack id {}", stack.id));
        }
        if stack.is_undersized() {
            violations.push(format!("stack {} has fewer than {} notes", stack.id, MIN_STACK_SIZE));
        }
        for id in &stack.note_ids {
            match notes.iter().find(|n| n.id == *id) {
                Some(note) if note.stack_id == Some(stack.id) => {}
                Some(_) => violations.push(format!("note {} does not point back to stack {}", id, stack.id)),
                None => violations.push(format!("stack {} references missing note {}", stack.id, id)),
            }
        }
    }

    for note in notes {
        if let Some(stack_id) = note.stack_id {
            if !stacks.iter().any(|s| s.id == stack_id && s.contains(note.id)) {
                violations.push(format!("note {} points at stack {} which does not contain it", note.id, stack_id));
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::Category;
    use crate::filter::FilterToken;
    use chrono::{Duration, TimeZone, Utc};
    use notestack_core::ManualClock;

    fn board() -> (NoteBoard, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap());
        (NoteBoard::new(Arc::new(clock.clone())), clock)
    }

    fn add(board: &mut NoteBoard, text: &str) -> NoteId {
        board.create_note(text, NoteOverrides::none()).unwrap().id
    }

    #[test]
    fn test_create_note_parses_and_inserts_first() {
        let (mut board, _) = board();
        add(&mut board, "first");
        let note = board.create_note("Buy milk 15m --p", NoteOverrides::none()).unwrap();

        assert_eq!(note.content, "Buy milk");
        assert_eq!(note.category, Some(Category::P));
        assert_eq!(note.time_minutes, Some(15));
        assert_eq!(board.notes()[0].id, note.id);
        assert_eq!(board.undo_log().depth(), 2);
    }

    #[test]
    fn test_create_note_rejects_empty_content() {
        let (mut board, _) = board();
        let err = board.create_note("  15m !! --k ", NoteOverrides::none()).unwrap_err();
        assert!(err.is_validation());
        assert!(board.notes().is_empty());
        assert!(!board.undo_log().can_undo());
    }

    #[test]
    fn test_ids_unique_within_same_instant() {
        let (mut board, _) = board();
        let ids: HashSet<_> = (0..50).map(|i| add(&mut board, &format!("n{i}"))).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_delete_dissolves_two_member_stack() {
        let (mut board, _) = board();
        let a = add(&mut board, "a");
        let b = add(&mut board, "b");
        let stack_id = board.create_stack(&[a, b], StackType::Group, None).unwrap();

        let removed = board.delete_note(a).unwrap();
        assert_eq!(removed.stack_id, Some(stack_id));
        assert!(board.stack(stack_id).is_none());
        assert_eq!(board.note(b).unwrap().stack_id, None);
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let (mut board, _) = board();
        add(&mut board, "a");
        assert!(board.delete_note(Uuid::new_v4()).is_none());
        assert!(board.complete_note(Uuid::new_v4()).is_none());
        assert_eq!(board.undo_log().depth(), 1);
    }

    #[test]
    fn test_complete_counts_and_undo_decrements() {
        let (mut board, clock) = board();
        let a = add(&mut board, "a");
        let b = add(&mut board, "b");

        board.complete_note(a).unwrap();
        board.complete_note(b).unwrap();
        assert_eq!(board.completed_today(), 2);

        board.undo().unwrap();
        assert_eq!(board.completed_today(), 1);
        assert!(board.note(b).is_some());
        assert!(!board.note(b).unwrap().completed);

        clock.advance(Duration::days(1));
        assert_eq!(board.completed_today(), 0);
    }

    #[test]
    fn test_create_stack_validation() {
        let (mut board, _) = board();
        let a = add(&mut board, "a");
        let b = add(&mut board, "b");
        let c = add(&mut board, "c");

        assert!(board.create_stack(&[a], StackType::Group, None).unwrap_err().is_validation());
        assert!(board.create_stack(&[a, a], StackType::Group, None).unwrap_err().is_validation());
        assert!(board
            .create_stack(&[a, Uuid::new_v4()], StackType::Group, None)
            .unwrap_err()
            .is_validation());

        board.create_stack(&[a, b], StackType::Group, None).unwrap();
        assert!(board.create_stack(&[b, c], StackType::Group, None).unwrap_err().is_validation());
        assert_eq!(board.stacks().len(), 1);
    }

    #[test]
    fn test_undo_stack_creation_removes_members() {
        let (mut board, _) = board();
        let keep = add(&mut board, "keep");
        let a = add(&mut board, "a");
        let b = add(&mut board, "b");
        board.create_stack(&[a, b], StackType::Sequential, None).unwrap();

        board.undo().unwrap();
        assert!(board.stacks().is_empty());
        assert!(board.note(a).is_none());
        assert!(board.note(b).is_none());
        assert!(board.note(keep).is_some());
    }

    #[test]
    fn test_stack_with_notes_first_draft_on_top() {
        let (mut board, _) = board();
        let drafts = vec![
            directive::parse_inline("wake up"),
            directive::parse_inline("stretch 10m"),
            directive::parse_inline("run 30m !!"),
        ];
        let stack_id = board
            .create_stack_with_notes(drafts, StackType::Sequential, Some("Morning".into()))
            .unwrap();

        let stack = board.stack(stack_id).unwrap().clone();
        assert_eq!(stack.len(), 3);
        assert_eq!(board.note(stack.top().unwrap()).unwrap().content, "wake up");
        assert_eq!(board.notes()[0].content, "wake up");
        // One record for the whole batch.
        assert_eq!(board.undo_log().depth(), 1);

        let visible: Vec<_> = board
            .visible_notes(&ActiveFilters::new())
            .into_iter()
            .map(|n| n.content.clone())
            .collect();
        assert_eq!(visible, vec!["wake up"]);

        board.undo().unwrap();
        assert!(board.notes().is_empty());
        assert!(board.stacks().is_empty());
    }

    #[test]
    fn test_stack_with_notes_needs_two_real_drafts() {
        let (mut board, _) = board();
        let drafts = vec![directive::parse_inline("only"), directive::parse_inline("15m !")];
        let err = board
            .create_stack_with_notes(drafts, StackType::Group, None)
            .unwrap_err();
        assert!(err.is_validation());
        assert!(board.notes().is_empty());
    }

    #[test]
    fn test_add_to_stack_moves_between_stacks() {
        let (mut board, _) = board();
        let ids: Vec<_> = (0..4).map(|i| add(&mut board, &format!("n{i}"))).collect();
        let first = board.create_stack(&[ids[0], ids[1]], StackType::Group, None).unwrap();
        let second = board.create_stack(&[ids[2], ids[3]], StackType::Group, None).unwrap();

        assert!(board.add_to_stack(second, ids[0]));
        assert!(!board.add_to_stack(second, ids[0]));
        assert!(board.stack(first).is_none());
        assert_eq!(board.note(ids[1]).unwrap().stack_id, None);
        assert_eq!(board.stack(second).unwrap().top(), Some(ids[0]));
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_merge_notes() {
        let (mut board, _) = board();
        let a = add(&mut board, "a");
        let b = add(&mut board, "b");
        let c = add(&mut board, "c");

        let stack_id = board.merge_notes(a, b).unwrap();
        assert_eq!(board.stack(stack_id).unwrap().note_ids, vec![b, a]);

        assert_eq!(board.merge_notes(c, a).unwrap(), stack_id);
        assert_eq!(board.stack(stack_id).unwrap().top(), Some(c));
        assert!(board.merge_notes(c, c).unwrap_err().is_validation());
    }

    #[test]
    fn test_unstack_and_reorder_are_not_undo_tracked() {
        let (mut board, _) = board();
        let ids: Vec<_> = (0..3).map(|i| add(&mut board, &format!("n{i}"))).collect();
        let stack_id = board.create_stack(&ids, StackType::Sequential, None).unwrap();
        let depth = board.undo_log().depth();

        assert!(board.move_up(ids[0]));
        assert_eq!(board.stack(stack_id).unwrap().note_ids, vec![ids[1], ids[0], ids[2]]);
        assert!(board.move_down(ids[2]));
        assert_eq!(board.stack(stack_id).unwrap().top(), Some(ids[0]));
        assert!(board.unstack_note(ids[1]));
        assert!(!board.unstack_note(ids[1]));

        assert_eq!(board.undo_log().depth(), depth);
        assert_eq!(board.stack(stack_id).unwrap().len(), 2);
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_undo_delete_rejoins_surviving_stack() {
        let (mut board, _) = board();
        let ids: Vec<_> = (0..3).map(|i| add(&mut board, &format!("n{i}"))).collect();
        let stack_id = board.create_stack(&ids, StackType::Group, None).unwrap();

        board.delete_note(ids[0]).unwrap();
        assert_eq!(board.stack(stack_id).unwrap().len(), 2);
        board.undo().unwrap();

        assert_eq!(board.note(ids[0]).unwrap().stack_id, Some(stack_id));
        assert!(board.stack(stack_id).unwrap().contains(ids[0]));
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_undo_delete_after_dissolve_comes_back_standalone() {
        let (mut board, _) = board();
        let a = add(&mut board, "a");
        let b = add(&mut board, "b");
        board.create_stack(&[a, b], StackType::Group, None).unwrap();

        board.delete_note(a).unwrap();
        board.undo().unwrap();
        assert_eq!(board.note(a).unwrap().stack_id, None);
        assert!(board.stacks().is_empty());
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_undo_to_index_is_all_at_once() {
        let (mut board, _) = board();
        for i in 0..5 {
            add(&mut board, &format!("n{i}"));
        }
        let undone = board.undo_to(0);
        assert_eq!(undone.len(), 5);
        assert!(board.notes().is_empty());
        assert!(!board.undo_log().can_undo());
    }

    #[test]
    fn test_undo_to_partial() {
        let (mut board, _) = board();
        let ids: Vec<_> = (0..4).map(|i| add(&mut board, &format!("n{i}"))).collect();
        let undone = board.undo_to(2);
        assert_eq!(undone.len(), 2);
        assert_eq!(board.notes().len(), 2);
        assert!(board.note(ids[0]).is_some());
        assert!(board.note(ids[1]).is_some());
        assert_eq!(board.undo_log().depth(), 2);
        assert!(board.undo_to(7).is_empty());
    }

    #[test]
    fn test_focus_is_not_undo_tracked() {
        let (mut board, _) = board();
        let a = add(&mut board, "a 10m");
        let b = add(&mut board, "b 20m");
        let depth = board.undo_log().depth();

        assert_eq!(board.toggle_focus(a), Some(true));
        assert_eq!(board.toggle_focus(b), Some(true));
        assert_eq!(board.focused_minutes(), 30);
        assert_eq!(board.toggle_focus(a), Some(false));
        assert_eq!(board.focused_minutes(), 20);
        assert_eq!(board.toggle_focus(Uuid::new_v4()), None);
        assert_eq!(board.undo_log().depth(), depth);
    }

    #[test]
    fn test_edit_note_reparses() {
        let (mut board, _) = board();
        let id = add(&mut board, "Buy milk 15m --p");
        let text = board.note(id).unwrap().to_tagged_text();
        assert_eq!(text, "Buy milk 15m --p");

        assert!(board.edit_note(id, "Buy oat milk 20m !!").unwrap());
        let note = board.note(id).unwrap();
        assert_eq!(note.content, "Buy oat milk");
        assert_eq!(note.category, None);
        assert_eq!(note.time_minutes, Some(20));

        assert!(board.edit_note(id, "--k").unwrap_err().is_validation());
        assert!(!board.edit_note(Uuid::new_v4(), "x").unwrap());
    }

    #[test]
    fn test_visible_notes_and_day_columns() {
        let (mut board, _) = board();
        let a = add(&mut board, "a --k");
        add(&mut board, "b --h");
        board.set_assigned_day(a, Some(Weekday::Tue));

        let active: ActiveFilters = [FilterToken::Day(Some(Weekday::Tue))].into_iter().collect();
        let visible = board.visible_notes(&active);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, a);

        let columns = board.day_columns(&active);
        assert_eq!(columns[0].notes.len(), 1);
        assert_eq!(columns[2].notes[0].id, a);
    }

    #[test]
    fn test_import_is_all_or_nothing() {
        let (mut board, _) = board();
        let a = add(&mut board, "a");
        let b = add(&mut board, "b");
        board.create_stack(&[a, b], StackType::Group, None).unwrap();
        let backup = board.export_backup();

        let (mut other, _) = super::tests::board();
        add(&mut other, "existing");

        let mut broken = backup.clone();
        broken.stacks[0].note_ids.pop();
        assert!(other.import_backup(broken).unwrap_err().is_validation());
        assert_eq!(other.notes().len(), 1);
        assert!(other.undo_log().can_undo());

        other.import_backup(backup).unwrap();
        assert_eq!(other.notes().len(), 2);
        assert_eq!(other.stacks().len(), 1);
        assert!(!other.undo_log().can_undo());
        other.check_invariants().unwrap();
    }

    #[test]
    fn test_from_parts_repairs_membership() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::default());
        let now = clock.now();
        let mut a = Note::new(Uuid::new_v4(), directive::parse("a"), now);
        let b = Note::new(Uuid::new_v4(), directive::parse("b"), now);
        let stack = Stack::new(Uuid::new_v4(), vec![a.id, b.id], StackType::Group, None);
        // Only `a` points back, so `b` is stale and the stack is too small.
        a.stack_id = Some(stack.id);

        let board = NoteBoard::from_parts(vec![a, b], vec![stack], CompletionCounter::default(), clock, 10);
        assert!(board.stacks().is_empty());
        assert!(board.notes().iter().all(|n| n.stack_id.is_none()));
        board.check_invariants().unwrap();
    }
}
