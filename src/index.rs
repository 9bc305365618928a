use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::CompletionLogEntry;

/// Which calendar days an entity was marked completed.
///
/// Several rows on the same day are OR-ed together: if any of them is
/// completed the day counts, regardless of row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionIndex {
    days: BTreeMap<NaiveDate, bool>,
}

impl CompletionIndex {
    /// index for one entity
    pub fn build(entries: &[CompletionLogEntry], entity_id: i64) -> Self {
        let mut index = Self::default();
        for entry in entries.iter().filter(|e| e.entity_id == entity_id) {
            index.insert(entry.date, entry.completed);
        }
        index
    }

    /// indexes for every entity seen in `entries`
    pub fn group(entries: &[CompletionLogEntry]) -> BTreeMap<i64, CompletionIndex> {
        let mut out: BTreeMap<i64, CompletionIndex> = BTreeMap::new();
        for entry in entries {
            out.entry(entry.entity_id)
                .or_default()
                .insert(entry.date, entry.completed);
        }
        out
    }

    fn insert(&mut self, day: NaiveDate, completed: bool) {
        let slot = self.days.entry(day).or_insert(false);
        *slot |= completed;
    }

    pub fn is_completed(&self, day: NaiveDate) -> bool {
        self.days.get(&day).copied().unwrap_or(false)
    }

    /// completed days, ascending
    pub fn completed_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days
            .iter()
            .filter(|(_, completed)| **completed)
            .map(|(day, _)| *day)
    }

    /// completed days in `start..=end`
    pub fn completed_between(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        if start > end {
            return 0;
        }
        self.days
            .range(start..=end)
            .filter(|(_, completed)| **completed)
            .count() as u32
    }

    /// number of logged days (completed or not)
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
