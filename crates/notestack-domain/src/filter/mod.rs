//! Multi-criterion note filtering.
//!
//! Filter tokens belong to one of five groups. Tokens in the same group are
//! OR-combined, groups are AND-combined, and an empty active set lets every
//! note through. Non-top members of sequential stacks never pass.

pub mod active;
pub mod day_columns;
pub mod note_filter;
pub mod token;

pub use active::ActiveFilters;
pub use day_columns::{group_by_day, DayColumn};
pub use note_filter::{is_blocked, passes, passes_kanban, FilterScope, FilterSet, NoteFilter};
pub use token::{FilterGroup, FilterToken, ParseFilterTokenError, TimeBucket};
