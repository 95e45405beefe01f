use chrono::Weekday;

use crate::note::Note;
use crate::stack::Stack;

use super::active::ActiveFilters;
use super::note_filter::passes_kanban;

/// Column order of the weekly view: unassigned first, then Monday..Sunday.
pub const DAY_ORDER: [Option<Weekday>; 8] = [
    None,
    Some(Weekday::Mon),
    Some(Weekday::Tue),
    Some(Weekday::Wed),
    Some(Weekday::Thu),
    Some(Weekday::Fri),
    Some(Weekday::Sat),
    Some(Weekday::Sun),
];

#[derive(Debug, Clone, PartialEq)]
pub struct DayColumn<'a> {
    pub day: Option<Weekday>,
    pub notes: Vec<&'a Note>,
}

/// Lay out visible notes by assigned day, keeping board order within a day.
pub fn group_by_day<'a>(
    notes: &'a [Note],
    stacks: &[Stack],
    active: &ActiveFilters,
) -> Vec<DayColumn<'a>> {
    DAY_ORDER
        .iter()
        .map(|&day| DayColumn {
            day,
            notes: notes
                .iter()
                .filter(|n| n.assigned_day == day && passes_kanban(n, stacks, active))
                .collect(),
        })
        .collect()
}
