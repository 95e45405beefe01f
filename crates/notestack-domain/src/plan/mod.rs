//! Plan documents: free-form text in which `( ... )` tasks and
//! `seq:`/`group:` blocks become notes and stacks.

pub mod document;
mod parser;
pub mod scanner;

pub use document::{
    Block, LineSource, ListItem, Marker, Patch, PlanDocument, Projection, Span, MARKER_CLOSE,
    MARKER_OPEN,
};
pub use parser::{PlanParser, PlanScan};
