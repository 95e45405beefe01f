use std::collections::HashSet;

use super::token::{FilterGroup, FilterToken};

/// The set of filter tokens currently selected in a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilters {
    tokens: HashSet<FilterToken>,
}

impl ActiveFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: FilterToken) -> bool {
        self.tokens.insert(token)
    }

    pub fn remove(&mut self, token: &FilterToken) -> bool {
        self.tokens.remove(token)
    }

    /// Flip a token on or off; returns whether it is now active.
    pub fn toggle(&mut self, token: FilterToken) -> bool {
        if self.tokens.remove(&token) {
            false
        } else {
            self.tokens.insert(token);
            true
        }
    }

    pub fn contains(&self, token: &FilterToken) -> bool {
        self.tokens.contains(token)
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterToken> {
        self.tokens.iter()
    }

    pub fn in_group(&self, group: FilterGroup) -> impl Iterator<Item = &FilterToken> {
        self.tokens.iter().filter(move |t| t.group() == group)
    }

    pub fn has_group(&self, group: FilterGroup) -> bool {
        self.in_group(group).next().is_some()
    }

    pub fn union(&self, other: &ActiveFilters) -> ActiveFilters {
        self.tokens.union(&other.tokens).copied().collect()
    }
}

impl FromIterator<FilterToken> for ActiveFilters {
    fn from_iter<I: IntoIterator<Item = FilterToken>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl Extend<FilterToken> for ActiveFilters {
    fn extend<I: IntoIterator<Item = FilterToken>>(&mut self, iter: I) {
        self.tokens.extend(iter);
    }
}
