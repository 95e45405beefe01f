use crate::note::Note;
use crate::stack::Stack;

use super::active::ActiveFilters;
use super::token::{FilterGroup, FilterToken};

/// Anything that can accept or reject a note.
pub trait NoteFilter {
    fn matches(&self, note: &Note) -> bool;
}

impl NoteFilter for FilterToken {
    fn matches(&self, note: &Note) -> bool {
        FilterToken::matches(self, note)
    }
}

/// Which view is asking. The weekly kanban lays notes out by day, so the
/// day group is not a filter there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterScope {
    Board,
    Kanban,
}

impl FilterScope {
    fn includes(self, group: FilterGroup) -> bool {
        !(self == FilterScope::Kanban && group == FilterGroup::Day)
    }
}

/// True when the note sits below the top of a sequential stack.
pub fn is_blocked(note: &Note, stacks: &[Stack]) -> bool {
    note.stack_id
        .and_then(|stack_id| stacks.iter().find(|s| s.id == stack_id))
        .is_some_and(|stack| stack.blocks(note.id))
}

/// The full predicate a view applies: blocking first, then OR within each
/// group and AND across groups.
pub struct FilterSet<'a> {
    active: &'a ActiveFilters,
    stacks: &'a [Stack],
    scope: FilterScope,
}

impl<'a> FilterSet<'a> {
    pub fn new(active: &'a ActiveFilters, stacks: &'a [Stack], scope: FilterScope) -> Self {
        Self {
            active,
            stacks,
            scope,
        }
    }

    fn group_matches(&self, note: &Note, group: FilterGroup) -> bool {
        let mut tokens = self.active.in_group(group).peekable();
        if tokens.peek().is_none() {
            return true;
        }
        tokens.any(|token| token.matches(note))
    }
}

impl NoteFilter for FilterSet<'_> {
    fn matches(&self, note: &Note) -> bool {
        if is_blocked(note, self.stacks) {
            return false;
        }
        if self.active.is_empty() {
            return true;
        }
        FilterGroup::ALL
            .into_iter()
            .filter(|group| self.scope.includes(*group))
            .all(|group| self.group_matches(note, group))
    }
}

pub fn passes(note: &Note, stacks: &[Stack], active: &ActiveFilters) -> bool {
    FilterSet::new(active, stacks, FilterScope::Board).matches(note)
}

pub fn passes_kanban(note: &Note, stacks: &[Stack], active: &ActiveFilters) -> bool {
    FilterSet::new(active, stacks, FilterScope::Kanban).matches(note)
}
