use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::index::CompletionIndex;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streaks {
    pub current: u32,
    pub longest: u32,
}

/// Consecutive completed days ending at `today`. 0 if today isn't completed.
pub fn current_streak(index: &CompletionIndex, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;
    while index.is_completed(day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

/// Longest run of consecutive completed days anywhere in the log.
pub fn longest_streak(index: &CompletionIndex) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut last: Option<NaiveDate> = None;

    for day in index.completed_days() {
        run = match last {
            None => 1,
            Some(prev) => match (day - prev).num_days() {
                1 => run + 1, // consecutive
                _ => 1,       // gap, reset
            },
        };
        longest = longest.max(run);
        last = Some(day);
    }
    longest
}

pub fn streaks(index: &CompletionIndex, today: NaiveDate) -> Streaks {
    Streaks {
        current: current_streak(index, today),
        longest: longest_streak(index),
    }
}
