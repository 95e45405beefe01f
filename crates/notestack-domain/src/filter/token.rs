use chrono::Weekday;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::directive::{CategoryTag, Priority, UClass};
use crate::note::Note;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterGroup {
    Category,
    Class,
    Time,
    Priority,
    Day,
}

impl FilterGroup {
    pub const ALL: [FilterGroup; 5] = [
        FilterGroup::Category,
        FilterGroup::Class,
        FilterGroup::Time,
        FilterGroup::Priority,
        FilterGroup::Day,
    ];
}

/// Fixed time-estimate ranges. A note without an estimate (or with a zero
/// estimate) falls in none of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeBucket {
    /// (0, 15]
    UpTo15,
    /// [16, 30]
    UpTo30,
    /// [31, 60]
    UpTo60,
    /// (60, ∞)
    Over60,
}

impl TimeBucket {
    pub fn contains(self, minutes: u32) -> bool {
        match self {
            TimeBucket::UpTo15 => (1..=15).contains(&minutes),
            TimeBucket::UpTo30 => (16..=30).contains(&minutes),
            TimeBucket::UpTo60 => (31..=60).contains(&minutes),
            TimeBucket::Over60 => minutes > 60,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            TimeBucket::UpTo15 => "15",
            TimeBucket::UpTo30 => "30",
            TimeBucket::UpTo60 => "60",
            TimeBucket::Over60 => "60+",
        }
    }
}

/// A single selectable filter value. `None` payloads select notes where
/// the attribute is unset ("no category", "no priority", "unassigned").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterToken {
    Category(Option<CategoryTag>),
    Class(UClass),
    Time(TimeBucket),
    Priority(Option<Priority>),
    Day(Option<Weekday>),
}

impl FilterToken {
    pub fn group(&self) -> FilterGroup {
        match self {
            FilterToken::Category(_) => FilterGroup::Category,
            FilterToken::Class(_) => FilterGroup::Class,
            FilterToken::Time(_) => FilterGroup::Time,
            FilterToken::Priority(_) => FilterGroup::Priority,
            FilterToken::Day(_) => FilterGroup::Day,
        }
    }

    pub fn matches(&self, note: &Note) -> bool {
        match *self {
            FilterToken::Category(tag) => note.category_tag() == tag,
            FilterToken::Class(class) => note.u_class() == Some(class),
            FilterToken::Time(bucket) => note.time_minutes.is_some_and(|m| bucket.contains(m)),
            FilterToken::Priority(priority) => note.priority == priority,
            FilterToken::Day(day) => note.assigned_day == day,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseFilterTokenError {
    #[error("filter token '{0}' is missing a 'group:value' separator")]
    MissingSeparator(String),
    #[error("unknown filter group '{0}'")]
    UnknownGroup(String),
    #[error("invalid value '{value}' for filter group '{group}'")]
    InvalidValue { group: String, value: String },
}

impl fmt::Display for FilterToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterToken::Category(tag) => {
                write!(f, "category:{}", tag.map_or("none", CategoryTag::as_str))
            }
            FilterToken::Class(class) => write!(f, "class:{}", class),
            FilterToken::Time(bucket) => write!(f, "time:{}", bucket.as_str()),
            FilterToken::Priority(priority) => {
                write!(f, "priority:{}", priority.map_or("none", Priority::as_str))
            }
            FilterToken::Day(day) => match day {
                Some(day) => write!(f, "day:{}", day.to_string().to_lowercase()),
                None => write!(f, "day:unassigned"),
            },
        }
    }
}

impl FromStr for FilterToken {
    type Err = ParseFilterTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (group, value) = s
            .split_once(':')
            .ok_or_else(|| ParseFilterTokenError::MissingSeparator(s.to_string()))?;
        let value = value.trim().to_ascii_lowercase();
        let invalid = || ParseFilterTokenError::InvalidValue {
            group: group.to_string(),
            value: value.clone(),
        };

        let token = match group.trim() {
            "category" => match value.as_str() {
                "none" => FilterToken::Category(None),
                other => FilterToken::Category(Some(other.parse().map_err(|_| invalid())?)),
            },
            "class" => FilterToken::Class(value.parse().map_err(|_| invalid())?),
            "time" => FilterToken::Time(match value.as_str() {
                "15" => TimeBucket::UpTo15,
                "30" => TimeBucket::UpTo30,
                "60" => TimeBucket::UpTo60,
                "60+" => TimeBucket::Over60,
                _ => return Err(invalid()),
            }),
            "priority" => match value.as_str() {
                "none" => FilterToken::Priority(None),
                other => FilterToken::Priority(Some(other.parse().map_err(|_| invalid())?)),
            },
            "day" => match value.as_str() {
                "unassigned" => FilterToken::Day(None),
                other => FilterToken::Day(Some(other.parse().map_err(|_| invalid())?)),
            },
            other => return Err(ParseFilterTokenError::UnknownGroup(other.to_string())),
        };
        Ok(token)
    }
}
