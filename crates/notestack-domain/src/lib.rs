pub mod backup;
pub mod board;
pub mod counter;
pub mod directive;
pub mod driver;
pub mod filter;
pub mod note;
pub mod plan;
pub mod schedule;
pub mod session;
pub mod stack;
pub mod timer;
pub mod undo;

pub use backup::BackupSnapshot;
pub use board::NoteBoard;
pub use counter::CompletionCounter;
pub use directive::{Category, CategoryTag, Directives, Priority, UClass};
pub use driver::{DriverEvent, SessionDriver};
pub use filter::{ActiveFilters, DayColumn, FilterGroup, FilterToken, TimeBucket};
pub use note::{Note, NoteId, NoteOverrides, Override};
pub use plan::{Marker, PlanDocument, PlanParser, PlanScan};
pub use schedule::{Debouncer, Ticker};
pub use session::Session;
pub use stack::{Stack, StackId, StackType};
pub use timer::{Pace, SessionSummary, TimerEvent, TimerState, WorkTimer};
pub use undo::{UndoAction, UndoLog, UndoRecord};
