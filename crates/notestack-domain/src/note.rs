use chrono::{DateTime, Utc, Weekday};
use notestack_core::NotestackError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::directive::{self, Category, CategoryTag, Directives, Priority, UClass};
use crate::stack::StackId;

pub type NoteId = Uuid;

/// A single task or reminder.
///
/// Serialized as a flat camelCase record (`category` and `uClass` are
/// separate fields on disk); loading rejects a `uClass` without the `u`
/// category and vice versa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "NoteRecord", try_from = "NoteRecord")]
pub struct Note {
    pub id: NoteId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
    pub stack_id: Option<StackId>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub time_minutes: Option<u32>,
    pub focused: bool,
    pub assigned_day: Option<Weekday>,
}

impl Note {
    pub fn new(id: NoteId, directives: Directives, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            content: directives.content,
            created_at,
            completed: false,
            stack_id: None,
            category: directives.category,
            priority: directives.priority,
            time_minutes: directives.time_minutes,
            focused: false,
            assigned_day: None,
        }
    }

    pub fn apply_overrides(&mut self, overrides: NoteOverrides) {
        overrides.category.apply(&mut self.category);
        overrides.priority.apply(&mut self.priority);
        overrides.time_minutes.apply(&mut self.time_minutes);
        overrides.assigned_day.apply(&mut self.assigned_day);
        if let Some(focused) = overrides.focused {
            self.focused = focused;
        }
    }

    /// Replace content and tag-derived fields; leaves identity, stack
    /// membership, focus and day untouched.
    pub fn replace_directives(&mut self, directives: Directives) {
        self.content = directives.content;
        self.category = directives.category;
        self.priority = directives.priority;
        self.time_minutes = directives.time_minutes;
    }

    pub fn category_tag(&self) -> Option<CategoryTag> {
        self.category.map(Category::tag)
    }

    pub fn u_class(&self) -> Option<UClass> {
        self.category.and_then(Category::u_class)
    }

    /// Text for edit mode; parsing it yields this note's fields back.
    pub fn to_tagged_text(&self) -> String {
        directive::format_tagged(&self.content, self.category, self.priority, self.time_minutes)
    }
}

/// One modal field versus the value parsed from the note's tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Override<T> {
    /// Keep the parsed value.
    Parsed,
    Set(T),
    Clear,
}

impl<T> Default for Override<T> {
    fn default() -> Self {
        Override::Parsed
    }
}

impl<T> Override<T> {
    fn apply(self, field: &mut Option<T>) {
        match self {
            Override::Parsed => {}
            Override::Set(value) => *field = Some(value),
            Override::Clear => *field = None,
        }
    }
}

/// Attribute overrides supplied by modal creation. Set values win over
/// whatever the text's tags said.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteOverrides {
    pub category: Override<Category>,
    pub priority: Override<Priority>,
    pub time_minutes: Override<u32>,
    pub assigned_day: Override<Weekday>,
    pub focused: Option<bool>,
}

impl NoteOverrides {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn focused() -> Self {
        Self {
            focused: Some(true),
            ..Self::default()
        }
    }

    pub fn on_day(day: Weekday) -> Self {
        Self {
            assigned_day: Override::Set(day),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteRecord {
    id: NoteId,
    content: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    stack_id: Option<StackId>,
    #[serde(default)]
    category: Option<CategoryTag>,
    #[serde(default)]
    u_class: Option<UClass>,
    #[serde(default)]
    priority: Option<Priority>,
    #[serde(default)]
    time_minutes: Option<u32>,
    #[serde(default)]
    focused: bool,
    #[serde(default)]
    assigned_day: Option<Weekday>,
}

impl From<Note> for NoteRecord {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            content: note.content,
            created_at: note.created_at,
            completed: note.completed,
            stack_id: note.stack_id,
            category: note.category.map(Category::tag),
            u_class: note.category.and_then(Category::u_class),
            priority: note.priority,
            time_minutes: note.time_minutes,
            focused: note.focused,
            assigned_day: note.assigned_day,
        }
    }
}

impl TryFrom<NoteRecord> for Note {
    type Error = NotestackError;

    fn try_from(record: NoteRecord) -> Result<Self, Self::Error> {
        let category = match (record.category, record.u_class) {
            (None, None) => None,
            (Some(tag), class) => Some(Category::from_parts(tag, class).ok_or_else(|| {
                NotestackError::Serialization(format!(
                    "note {}: category '{}' does not match uClass {:?}",
                    record.id,
                    tag.as_str(),
                    class.map(UClass::as_str)
                ))
            })?),
            (None, Some(class)) => {
                return Err(NotestackError::Serialization(format!(
                    "note {}: uClass '{}' set without category 'u'",
                    record.id, class
                )))
            }
        };

        Ok(Self {
            id: record.id,
            content: record.content,
            created_at: record.created_at,
            completed: record.completed,
            stack_id: record.stack_id,
            category,
            priority: record.priority,
            time_minutes: record.time_minutes,
            focused: record.focused,
            assigned_day: record.assigned_day,
        })
    }
}
