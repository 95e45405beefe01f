use std::collections::HashSet;

use super::document::{Marker, Patch, PlanDocument, Projection};
use super::scanner::{self, StackBlock, TaskMatch};
use crate::board::NoteBoard;
use crate::directive::{self, Directives};
use crate::note::{NoteId, NoteOverrides};
use crate::stack::{StackId, StackType};

/// What one pass created, plus the patches that mark it as done.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanScan {
    pub patches: Vec<Patch>,
    pub notes: Vec<NoteId>,
    pub stacks: Vec<StackId>,
}

impl PlanScan {
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }
}

/// Turns `( ... )` tasks and `seq:`/`group:` blocks in a plan into notes.
///
/// Every processed region is replaced by a [`Marker`] node. A task whose
/// marker is already in the document, or a block whose stack marker (same
/// kind and title) is, gets skipped, so scanning the same document any
/// number of times creates each note once.
#[derive(Debug, Clone, Default)]
pub struct PlanParser;

impl PlanParser {
    pub fn new() -> Self {
        Self
    }

    /// Stack blocks first, then single tasks outside those blocks.
    pub fn scan(&self, projection: &Projection, board: &mut NoteBoard) -> PlanScan {
        let mut scan = PlanScan::default();
        let blocks = scanner::find_stack_blocks(projection);
        let skip: Vec<_> = blocks.iter().map(|b| b.range.clone()).collect();

        let mut seen_stacks = HashSet::new();
        for block in &blocks {
            self.materialize_stack(projection, block, &mut seen_stacks, board, &mut scan);
        }

        let mut seen_tasks = HashSet::new();
        for task in scanner::find_tasks(projection, &skip) {
            self.materialize_task(projection, &task, &mut seen_tasks, board, &mut scan);
        }

        if !scan.is_empty() {
            tracing::info!(
                notes = scan.notes.len(),
                stacks = scan.stacks.len(),
                "Plan scan created entries"
            );
        }
        scan
    }

    /// Scan `doc` and write the resulting markers into it.
    pub fn scan_document(&self, doc: &mut PlanDocument, board: &mut NoteBoard) -> PlanScan {
        doc.split_soft_breaks();
        let projection = doc.project();
        let scan = self.scan(&projection, board);
        let applied = doc.apply_patches(&projection, &scan.patches);
        if applied != scan.patches.len() {
            tracing::warn!(
                applied,
                expected = scan.patches.len(),
                "Some plan markers could not be written"
            );
        }
        scan
    }

    /// Plain-text entry point: scan and return the text with markers.
    pub fn process(&self, text: &str, board: &mut NoteBoard) -> (String, PlanScan) {
        let mut doc = PlanDocument::from_plain_text(text);
        let scan = self.scan_document(&mut doc, board);
        (doc.plain_text(), scan)
    }

    fn materialize_stack(
        &self,
        projection: &Projection,
        block: &StackBlock<'_>,
        seen: &mut HashSet<(StackType, String)>,
        board: &mut NoteBoard,
        scan: &mut PlanScan,
    ) {
        let marked = projection.has_marker(|m| {
            matches!(m, Marker::Stack { stack_type, title, .. }
                if *stack_type == block.kind && title == block.title)
        });
        if marked || !seen.insert((block.kind, block.title.to_string())) {
            tracing::debug!(title = block.title, "Stack block already materialized");
            return;
        }

        let drafts: Vec<Directives> = block
            .bullets
            .iter()
            .map(|b| directive::parse_inline(b))
            .filter(Directives::has_content)
            .collect();

        let created = match drafts.len() {
            0 => return,
            1 => {
                let Some(draft) = drafts.into_iter().next() else {
                    return;
                };
                match board.create_note_with(draft, NoteOverrides::none()) {
                    Ok(note) => {
                        scan.notes.push(note.id);
                        1
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Plan stack note rejected");
                        return;
                    }
                }
            }
            n => {
                let title = Some(block.title.to_string());
                match board.create_stack_with_notes(drafts, block.kind, title) {
                    Ok(stack_id) => {
                        if let Some(stack) = board.stack(stack_id) {
                            scan.notes.extend(stack.note_ids.iter().rev().copied());
                        }
                        scan.stacks.push(stack_id);
                        n
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Plan stack rejected");
                        return;
                    }
                }
            }
        };

        scan.patches.push(Patch {
            range: block.range.clone(),
            marker: Marker::Stack {
                stack_type: block.kind,
                title: block.title.to_string(),
                count: created,
            },
        });
    }

    fn materialize_task(
        &self,
        projection: &Projection,
        task: &TaskMatch<'_>,
        seen: &mut HashSet<Marker>,
        board: &mut NoteBoard,
        scan: &mut PlanScan,
    ) {
        let directives = directive::parse_inline(task.inner);
        if !directives.has_content() {
            return;
        }
        let marker = Marker::task(task.inner);
        if projection.has_marker(|m| *m == marker) || seen.contains(&marker) {
            tracing::debug!(%marker, "Task already materialized");
            return;
        }

        match board.create_note_with(directives, NoteOverrides::none()) {
            Ok(note) => {
                scan.notes.push(note.id);
                scan.patches.push(Patch {
                    range: task.range.clone(),
                    marker: marker.clone(),
                });
                seen.insert(marker);
            }
            Err(err) => tracing::warn!(error = %err, "Plan task rejected"),
        }
    }
}
