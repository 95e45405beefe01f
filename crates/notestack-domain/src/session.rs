//! The single mutator the view layer talks to.
//!
//! Every mutating call applies the change in memory, lets the work timer
//! react to a changed focused-minutes sum, then writes all persisted keys.
//! A failed write is returned to the caller but never rolls the in-memory
//! change back.

use chrono::Weekday;
use notestack_core::{AppConfig, Clock, KeyValueStore, NotestackError, NotestackResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::backup::BackupSnapshot;
use crate::board::NoteBoard;
use crate::counter::CompletionCounter;
use crate::filter::{ActiveFilters, DayColumn, FilterToken};
use crate::note::{Note, NoteId, NoteOverrides};
use crate::plan::{PlanDocument, PlanParser, PlanScan};
use crate::stack::{Stack, StackId, StackType};
use crate::timer::{TimerEvent, TimerState, WorkTimer};
use crate::undo::UndoRecord;

pub const NOTES_KEY: &str = "notes";
pub const STACKS_KEY: &str = "stacks";
pub const COUNTER_KEY: &str = "completedCounter";

pub struct Session<S: KeyValueStore> {
    board: NoteBoard,
    timer: WorkTimer,
    /// Focused minutes the timer is currently planned against.
    timed_minutes: u32,
    filters: ActiveFilters,
    plan: PlanParser,
    store: S,
    events: Vec<TimerEvent>,
}

fn load_key<T: DeserializeOwned + Default>(store: &impl KeyValueStore, key: &str) -> NotestackResult<T> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw).map_err(|e| {
            NotestackError::Serialization(format!("failed to parse '{}': {}", key, e))
        }),
        None => Ok(T::default()),
    }
}

fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> NotestackResult<String> {
    serde_json::to_string(value)
        .map_err(|e| NotestackError::Serialization(format!("failed to encode '{}': {}", key, e)))
}

impl<S: KeyValueStore> Session<S> {
    /// Load all persisted keys once; missing keys mean an empty board.
    pub fn open(store: S, clock: Arc<dyn Clock>, config: &AppConfig) -> NotestackResult<Self> {
        let notes: Vec<Note> = load_key(&store, NOTES_KEY)?;
        let stacks: Vec<Stack> = load_key(&store, STACKS_KEY)?;
        let counter: CompletionCounter = load_key(&store, COUNTER_KEY)?;
        tracing::info!(notes = notes.len(), stacks = stacks.len(), "Opened session");

        let board = NoteBoard::from_parts(
            notes,
            stacks,
            counter,
            clock.clone(),
            config.effective_undo_capacity(),
        );
        Ok(Self {
            board,
            timer: WorkTimer::new(clock),
            timed_minutes: 0,
            filters: ActiveFilters::new(),
            plan: PlanParser::new(),
            store,
            events: Vec::new(),
        })
    }

    pub fn board(&self) -> &NoteBoard {
        &self.board
    }

    pub fn timer(&self) -> &WorkTimer {
        &self.timer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn filters(&self) -> &ActiveFilters {
        &self.filters
    }

    /// Returns whether the token is now active.
    pub fn toggle_filter(&mut self, token: FilterToken) -> bool {
        self.filters.toggle(token)
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn visible_notes(&self) -> Vec<&Note> {
        self.board.visible_notes(&self.filters)
    }

    pub fn day_columns(&self) -> Vec<DayColumn<'_>> {
        self.board.day_columns(&self.filters)
    }

    pub fn undo_history(&self) -> Vec<&UndoRecord> {
        self.board.undo_log().records().collect()
    }

    /// Drain finish-early events produced by recalculations.
    pub fn take_timer_events(&mut self) -> Vec<TimerEvent> {
        std::mem::take(&mut self.events)
    }

    // Note and stack mutators

    pub fn create_note(&mut self, raw_text: &str, overrides: NoteOverrides) -> NotestackResult<Note> {
        let note = self.board.create_note(raw_text, overrides)?;
        self.commit()?;
        Ok(note)
    }

    pub fn delete_note(&mut self, id: NoteId) -> NotestackResult<Option<Note>> {
        let removed = self.board.delete_note(id);
        if removed.is_some() {
            self.commit()?;
        }
        Ok(removed)
    }

    pub fn complete_note(&mut self, id: NoteId) -> NotestackResult<Option<Note>> {
        let removed = self.board.complete_note(id);
        if removed.is_some() {
            self.commit()?;
        }
        Ok(removed)
    }

    pub fn edit_note(&mut self, id: NoteId, raw_text: &str) -> NotestackResult<bool> {
        let changed = self.board.edit_note(id, raw_text)?;
        if changed {
            self.commit()?;
        }
        Ok(changed)
    }

    pub fn toggle_focus(&mut self, id: NoteId) -> NotestackResult<Option<bool>> {
        let focused = self.board.toggle_focus(id);
        if focused.is_some() {
            self.commit()?;
        }
        Ok(focused)
    }

    pub fn set_assigned_day(&mut self, id: NoteId, day: Option<Weekday>) -> NotestackResult<bool> {
        let changed = self.board.set_assigned_day(id, day);
        self.persist_if(changed)
    }

    pub fn create_stack(
        &mut self,
        note_ids: &[NoteId],
        kind: StackType,
        title: Option<String>,
    ) -> NotestackResult<StackId> {
        let stack_id = self.board.create_stack(note_ids, kind, title)?;
        self.commit()?;
        Ok(stack_id)
    }

    pub fn add_to_stack(&mut self, stack_id: StackId, note_id: NoteId) -> NotestackResult<bool> {
        let changed = self.board.add_to_stack(stack_id, note_id);
        self.persist_if(changed)
    }

    pub fn merge_notes(&mut self, dragged: NoteId, target: NoteId) -> NotestackResult<StackId> {
        let stack_id = self.board.merge_notes(dragged, target)?;
        self.commit()?;
        Ok(stack_id)
    }

    pub fn unstack_note(&mut self, id: NoteId) -> NotestackResult<bool> {
        let changed = self.board.unstack_note(id);
        self.persist_if(changed)
    }

    pub fn move_up(&mut self, id: NoteId) -> NotestackResult<bool> {
        let changed = self.board.move_up(id);
        self.persist_if(changed)
    }

    pub fn move_down(&mut self, id: NoteId) -> NotestackResult<bool> {
        let changed = self.board.move_down(id);
        self.persist_if(changed)
    }

    pub fn undo(&mut self) -> NotestackResult<Option<UndoRecord>> {
        let record = self.board.undo();
        if record.is_some() {
            self.commit()?;
        }
        Ok(record)
    }

    /// Invert every record from `index` onward, then persist once.
    pub fn undo_to(&mut self, index: usize) -> NotestackResult<Vec<UndoRecord>> {
        let records = self.board.undo_to(index);
        if !records.is_empty() {
            self.commit()?;
        }
        Ok(records)
    }

    /// Run the plan parser over `text`; returns the text with markers.
    pub fn scan_plan(&mut self, text: &str) -> NotestackResult<(String, PlanScan)> {
        let (patched, scan) = self.plan.process(text, &mut self.board);
        if !scan.is_empty() {
            self.commit()?;
        }
        Ok((patched, scan))
    }

    /// Run the plan parser over `doc`, writing markers into it.
    pub fn scan_plan_document(&mut self, doc: &mut PlanDocument) -> NotestackResult<PlanScan> {
        let scan = self.plan.scan_document(doc, &mut self.board);
        if !scan.is_empty() {
            self.commit()?;
        }
        Ok(scan)
    }

    pub fn export_backup(&self) -> BackupSnapshot {
        self.board.export_backup()
    }

    pub fn import_backup(&mut self, snapshot: BackupSnapshot) -> NotestackResult<()> {
        self.board.import_backup(snapshot)?;
        self.commit()
    }

    // Timer

    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    pub fn start_timer(&mut self) -> NotestackResult<()> {
        let minutes = self.board.focused_minutes();
        self.timer.start(minutes)?;
        self.timed_minutes = minutes;
        Ok(())
    }

    pub fn pause_timer(&mut self) -> bool {
        self.timer.pause()
    }

    pub fn resume_timer(&mut self) -> bool {
        self.timer.resume()
    }

    pub fn stop_timer(&mut self) -> bool {
        self.timed_minutes = 0;
        self.timer.stop()
    }

    pub fn tick_timer(&mut self) -> Option<TimerEvent> {
        let event = self.timer.tick()?;
        self.timed_minutes = 0;
        Some(event)
    }

    // Internals

    fn persist_if(&mut self, changed: bool) -> NotestackResult<bool> {
        if changed {
            self.commit()?;
        }
        Ok(changed)
    }

    fn commit(&mut self) -> NotestackResult<()> {
        self.sync_timer();
        self.persist()
    }

    /// Recalculate from scratch when focused minutes were removed under a
    /// live timer. Newly focused minutes are tracked but leave the
    /// countdown alone.
    fn sync_timer(&mut self) {
        if !self.timer.is_active() {
            return;
        }
        let minutes = self.board.focused_minutes();
        let shrank = minutes < self.timed_minutes;
        self.timed_minutes = minutes;
        if !shrank {
            return;
        }
        if let Some(event) = self.timer.recalculate(minutes) {
            self.events.push(event);
        }
    }

    /// Write every key; the first failure is returned after all attempts.
    pub fn persist(&mut self) -> NotestackResult<()> {
        let writes = [
            (NOTES_KEY, encode(NOTES_KEY, self.board.notes())?),
            (STACKS_KEY, encode(STACKS_KEY, self.board.stacks())?),
            (COUNTER_KEY, encode(COUNTER_KEY, self.board.completion_counter())?),
        ];

        let mut first_error = None;
        for (key, value) in writes {
            if let Err(err) = self.store.set(key, &value) {
                tracing::warn!(key, error = %err, "Persist failed");
                first_error.get_or_insert(err);
            } else {
                tracing::debug!(key, bytes = value.len(), "Persisted");
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
