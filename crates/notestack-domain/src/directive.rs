//! Directive tags embedded in free-form note text.
//!
//! Three tag kinds are recognized, each a whitespace-separated token:
//! - category: `--k`, `--h`, `--p` or `--u<class>` (e.g. `--u2a`)
//! - priority: a run of one to three `!`
//! - time estimate: `<minutes>m` (e.g. `25m`)
//!
//! [`parse`] only looks at trailing tokens (board and modal input),
//! [`parse_inline`] accepts tags anywhere (plan document directives).
//! Neither ever fails: an unrecognized token is simply content.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sub-classification carried by the `u` category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UClass {
    #[serde(rename = "2a")]
    TwoA,
    #[serde(rename = "2b")]
    TwoB,
    #[serde(rename = "2c")]
    TwoC,
    #[serde(rename = "3a")]
    ThreeA,
    #[serde(rename = "3b")]
    ThreeB,
    #[serde(rename = "5")]
    Five,
}

impl UClass {
    pub const ALL: [UClass; 6] = [
        UClass::TwoA,
        UClass::TwoB,
        UClass::TwoC,
        UClass::ThreeA,
        UClass::ThreeB,
        UClass::Five,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UClass::TwoA => "2a",
            UClass::TwoB => "2b",
            UClass::TwoC => "2c",
            UClass::ThreeA => "3a",
            UClass::ThreeB => "3b",
            UClass::Five => "5",
        }
    }
}

impl fmt::Display for UClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UClass {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        UClass::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or(())
    }
}

/// Bare category tag, without the `u` sub-class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryTag {
    K,
    H,
    P,
    U,
}

impl CategoryTag {
    pub const ALL: [CategoryTag; 4] = [CategoryTag::K, CategoryTag::H, CategoryTag::P, CategoryTag::U];

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryTag::K => "k",
            CategoryTag::H => "h",
            CategoryTag::P => "p",
            CategoryTag::U => "u",
        }
    }
}

impl FromStr for CategoryTag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "k" => Ok(CategoryTag::K),
            "h" => Ok(CategoryTag::H),
            "p" => Ok(CategoryTag::P),
            "u" => Ok(CategoryTag::U),
            _ => Err(()),
        }
    }
}

/// A note's category. The `u` category always carries its class, so a
/// class without `u` (or `u` without a class) cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    K,
    H,
    P,
    U(UClass),
}

impl Category {
    pub fn tag(self) -> CategoryTag {
        match self {
            Category::K => CategoryTag::K,
            Category::H => CategoryTag::H,
            Category::P => CategoryTag::P,
            Category::U(_) => CategoryTag::U,
        }
    }

    pub fn u_class(self) -> Option<UClass> {
        match self {
            Category::U(class) => Some(class),
            _ => None,
        }
    }

    /// Rebuild from the flat `category`/`uClass` pair. Returns `None` when
    /// the pair violates the class-iff-`u` rule.
    pub fn from_parts(tag: CategoryTag, class: Option<UClass>) -> Option<Self> {
        match (tag, class) {
            (CategoryTag::K, None) => Some(Category::K),
            (CategoryTag::H, None) => Some(Category::H),
            (CategoryTag::P, None) => Some(Category::P),
            (CategoryTag::U, Some(class)) => Some(Category::U(class)),
            _ => None,
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        let name = token.strip_prefix("--")?;
        if let Some(class) = name.strip_prefix('u').or_else(|| name.strip_prefix('U')) {
            return class.parse().ok().map(Category::U);
        }
        match name.parse::<CategoryTag>().ok()? {
            CategoryTag::K => Some(Category::K),
            CategoryTag::H => Some(Category::H),
            CategoryTag::P => Some(Category::P),
            CategoryTag::U => None,
        }
    }

    pub fn to_tag_text(self) -> String {
        match self {
            Category::U(class) => format!("--u{}", class),
            other => format!("--{}", other.tag().as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn level(self) -> usize {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn from_level(level: usize) -> Option<Self> {
        match level {
            1 => Some(Priority::Low),
            2 => Some(Priority::Medium),
            3 => Some(Priority::High),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        if token.chars().all(|c| c == '!') {
            Self::from_level(token.len())
        } else {
            None
        }
    }

    pub fn to_tag_text(self) -> String {
        "!".repeat(self.level())
    }
}

impl FromStr for Priority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(()),
        }
    }
}

fn time_from_token(token: &str) -> Option<u32> {
    let digits = token.strip_suffix('m')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Structured attributes extracted from a piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    pub content: String,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub time_minutes: Option<u32>,
}

impl Directives {
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }
}

/// Split off the last whitespace-separated token: `(rest, token)`.
fn split_last_token(text: &str) -> Option<(&str, &str)> {
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        return None;
    }
    let token_start = trimmed
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(idx, c)| idx + c.len_utf8())
        .unwrap_or(0);
    Some((trimmed[..token_start].trim_end(), &trimmed[token_start..]))
}

/// Strip trailing tags in precedence order: category, then priority, then time.
pub fn parse(raw: &str) -> Directives {
    let mut rest = raw.trim();
    let mut parsed = Directives::default();

    if let Some((before, token)) = split_last_token(rest) {
        if let Some(category) = Category::from_token(token) {
            parsed.category = Some(category);
            rest = before;
        }
    }

    if let Some((before, token)) = split_last_token(rest) {
        if let Some(priority) = Priority::from_token(token) {
            parsed.priority = Some(priority);
            rest = before;
        }
    }

    if let Some((before, token)) = split_last_token(rest) {
        if let Some(minutes) = time_from_token(token) {
            parsed.time_minutes = Some(minutes);
            rest = before;
        }
    }

    parsed.content = rest.trim().to_string();
    parsed
}

/// Extract tags from any position. The first token of each kind wins;
/// later duplicates stay in the content.
pub fn parse_inline(raw: &str) -> Directives {
    let mut parsed = Directives::default();
    let mut kept: Vec<&str> = Vec::new();

    for token in raw.split_whitespace() {
        if parsed.category.is_none() {
            if let Some(category) = Category::from_token(token) {
                parsed.category = Some(category);
                continue;
            }
        }
        if parsed.priority.is_none() {
            if let Some(priority) = Priority::from_token(token) {
                parsed.priority = Some(priority);
                continue;
            }
        }
        if parsed.time_minutes.is_none() {
            if let Some(minutes) = time_from_token(token) {
                parsed.time_minutes = Some(minutes);
                continue;
            }
        }
        kept.push(token);
    }

    parsed.content = kept.join(" ");
    parsed
}

/// Format structured fields back into tagged text: content, time,
/// priority, category. [`parse`] reads this back to the same fields.
pub fn format_tagged(
    content: &str,
    category: Option<Category>,
    priority: Option<Priority>,
    time_minutes: Option<u32>,
) -> String {
    let mut parts = vec![content.trim().to_string()];
    if let Some(minutes) = time_minutes {
        parts.push(format!("{}m", minutes));
    }
    if let Some(priority) = priority {
        parts.push(priority.to_tag_text());
    }
    if let Some(category) = category {
        parts.push(category.to_tag_text());
    }
    parts.retain(|p| !p.is_empty());
    parts.join(" ")
}
