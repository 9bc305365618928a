//! 67-day habit formation.
//!
//! Two independent views of the same entity: the stage its current streak has
//! reached, and how many days of each sub-range of the 67-day window were
//! actually completed. The two are never reconciled; an inconsistent entity
//! may show a low stage next to a well-filled window, or the reverse.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::day::days_back;
use crate::error::{Result, TrackerError};
use crate::index::CompletionIndex;
use crate::models::{BONUS_DAYS, FORMATION_WINDOW_DAYS, STAGE_ONE_DAYS, STAGE_THREE_DAYS, STAGE_TWO_DAYS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FormationStage {
    Starting,
    Initial,
    Strengthening,
    Automaticity,
    Mastered,
}

impl FormationStage {
    pub fn for_streak(streak: u32) -> Self {
        match streak {
            0..7 => FormationStage::Starting,
            7..21 => FormationStage::Initial,
            21..45 => FormationStage::Strengthening,
            45..67 => FormationStage::Automaticity,
            _ => FormationStage::Mastered,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormationStage::Starting => "Starting",
            FormationStage::Initial => "Initial",
            FormationStage::Strengthening => "Strengthening",
            FormationStage::Automaticity => "Automaticity",
            FormationStage::Mastered => "Mastered",
        }
    }

    /// first streak length that reaches this stage
    pub fn threshold(&self) -> u32 {
        match self {
            FormationStage::Starting => 0,
            FormationStage::Initial => 7,
            FormationStage::Strengthening => 21,
            FormationStage::Automaticity => 45,
            FormationStage::Mastered => 67,
        }
    }

    pub fn next(&self) -> Option<Self> {
        match self {
            FormationStage::Starting => Some(FormationStage::Initial),
            FormationStage::Initial => Some(FormationStage::Strengthening),
            FormationStage::Strengthening => Some(FormationStage::Automaticity),
            FormationStage::Automaticity => Some(FormationStage::Mastered),
            FormationStage::Mastered => None,
        }
    }
}

/// Stage for a signed streak value; negatives are rejected.
pub fn stage_for_streak(streak: i64) -> Result<FormationStage> {
    let streak = u32::try_from(streak)
        .map_err(|_| TrackerError::invalid(format!("streak must be a non-negative integer, got {}", streak)))?;
    Ok(FormationStage::for_streak(streak))
}

/// Days left until the next stage, `None` once mastered.
pub fn days_to_next_stage(streak: u32) -> Option<u32> {
    FormationStage::for_streak(streak)
        .next()
        .map(|next| next.threshold() - streak)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentProgress {
    pub completed: u32,
    pub total: u32,
    pub percent: u32,
}

impl SegmentProgress {
    pub fn new(completed: u32, total: u32) -> Self {
        Self {
            completed,
            total,
            percent: percent_of(completed, total),
        }
    }
}

/// Rounded percentage, 0 for an empty denominator.
pub(crate) fn percent_of(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (f64::from(part) / f64::from(whole) * 100.0).round() as u32
}

/// Completion counts over the 67 days ending today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormationWindow {
    /// days 1-18
    pub stage_one: SegmentProgress,
    /// days 19-45
    pub stage_two: SegmentProgress,
    /// days 46-66
    pub stage_three: SegmentProgress,
    /// day 67, i.e. today
    pub bonus: SegmentProgress,
}

impl FormationWindow {
    pub fn compute(index: &CompletionIndex, today: NaiveDate) -> Self {
        let mut first_day = 1;
        let mut segment = |len: u32| {
            let last_day = first_day + len - 1;
            // relative day k sits (67 - k) days before today; days before NaiveDate::MIN hold nothing
            let start = days_back(today, FORMATION_WINDOW_DAYS - first_day).unwrap_or(NaiveDate::MIN);
            let end = days_back(today, FORMATION_WINDOW_DAYS - last_day);
            first_day = last_day + 1;
            let completed = end.map_or(0, |end| index.completed_between(start, end));
            SegmentProgress::new(completed, len)
        };

        let stage_one = segment(STAGE_ONE_DAYS);
        let stage_two = segment(STAGE_TWO_DAYS);
        let stage_three = segment(STAGE_THREE_DAYS);
        let bonus = segment(BONUS_DAYS);

        Self {
            stage_one,
            stage_two,
            stage_three,
            bonus,
        }
    }

    pub fn segments(&self) -> [SegmentProgress; 4] {
        [self.stage_one, self.stage_two, self.stage_three, self.bonus]
    }

    /// completed days across the whole window
    pub fn total(&self) -> SegmentProgress {
        let completed = self.segments().iter().map(|s| s.completed).sum();
        let total = self.segments().iter().map(|s| s.total).sum();
        SegmentProgress::new(completed, total)
    }

    pub fn percent(&self) -> u32 {
        self.total().percent
    }
}
