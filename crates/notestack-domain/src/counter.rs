use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of notes completed on `reset_date`. Reading or bumping it on a
/// different date starts the count over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionCounter {
    pub count: u32,
    #[serde(default)]
    pub reset_date: Option<NaiveDate>,
}

impl CompletionCounter {
    fn roll_over(&mut self, today: NaiveDate) {
        if self.reset_date != Some(today) {
            self.count = 0;
            self.reset_date = Some(today);
        }
    }

    pub fn increment(&mut self, today: NaiveDate) {
        self.roll_over(today);
        self.count += 1;
    }

    /// Floored at zero.
    pub fn decrement(&mut self, today: NaiveDate) {
        self.roll_over(today);
        self.count = self.count.saturating_sub(1);
    }

    pub fn count_on(&self, today: NaiveDate) -> u32 {
        if self.reset_date == Some(today) {
            self.count
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_counts_within_a_day() {
        let mut counter = CompletionCounter::default();
        counter.increment(day(3));
        counter.increment(day(3));
        assert_eq!(counter.count_on(day(3)), 2);
    }

    #[test]
    fn test_resets_on_new_day() {
        let mut counter = CompletionCounter::default();
        counter.increment(day(3));
        assert_eq!(counter.count_on(day(4)), 0);
        counter.increment(day(4));
        assert_eq!(counter.count, 1);
        assert_eq!(counter.reset_date, Some(day(4)));
    }

    #[test]
    fn test_decrement_floors_at_zero() {
        let mut counter = CompletionCounter::default();
        counter.decrement(day(3));
        assert_eq!(counter.count_on(day(3)), 0);
        counter.increment(day(3));
        counter.decrement(day(3));
        counter.decrement(day(3));
        assert_eq!(counter.count_on(day(3)), 0);
    }
}
