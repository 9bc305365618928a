//! Aggregate health score and letter grade.
//!
//! overall = consistency × 0.35 + momentum × 0.25 + balance × 0.20 + engagement × 0.20

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::day::days_back;
use crate::index::CompletionIndex;
use crate::models::{CONSISTENCY_WINDOW_DAYS, Category, MOMENTUM_TARGET_STREAK, TrackableEntity};
use crate::streak::current_streak;

const W_CONSISTENCY: f64 = 0.35;
const W_MOMENTUM: f64 = 0.25;
const W_BALANCE: f64 = 0.20;
const W_ENGAGEMENT: f64 = 0.20;

const NO_DATA_MESSAGE: &str = "No data yet. Add a habit, rule or goal to get your first grade.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    C,
    #[serde(rename = "C-")]
    CMinus,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Grade::APlus,
            85.. => Grade::A,
            80.. => Grade::AMinus,
            75.. => Grade::BPlus,
            70.. => Grade::B,
            65.. => Grade::BMinus,
            60.. => Grade::CPlus,
            55.. => Grade::C,
            50.. => Grade::CMinus,
            40.. => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Grade::APlus | Grade::A | Grade::AMinus => "Outstanding consistency. Keep the chain going.",
            Grade::BPlus | Grade::B | Grade::BMinus => "Solid week. A few more check-ins will push you higher.",
            Grade::CPlus | Grade::C | Grade::CMinus => "Momentum is building. Focus on showing up daily.",
            Grade::D => "Some progress. Pick one habit and protect it this week.",
            Grade::F => "Fresh start. Complete something today to get moving.",
        }
    }
}

/// What the scorer needs to know about one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub category: Category,
    pub current_streak: u32,
    pub completed_today: bool,
    /// completed days among today and the 6 days before
    pub completed_last_week: u32,
}

impl EntitySnapshot {
    pub fn from_index(entity: &TrackableEntity, index: &CompletionIndex, today: NaiveDate) -> Self {
        Self::with_current_streak(entity, index, current_streak(index, today), today)
    }

    /// Same as [`from_index`](Self::from_index) for callers that already know the streak.
    pub fn with_current_streak(
        entity: &TrackableEntity,
        index: &CompletionIndex,
        current_streak: u32,
        today: NaiveDate,
    ) -> Self {
        // days before NaiveDate::MIN hold nothing
        let week_start = days_back(today, CONSISTENCY_WINDOW_DAYS - 1).unwrap_or(NaiveDate::MIN);
        Self {
            category: entity.category,
            current_streak,
            completed_today: index.is_completed(today),
            completed_last_week: index.completed_between(week_start, today),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStatus {
    Scored,
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub consistency: f64,
    pub momentum: f64,
    pub balance: f64,
    pub engagement: f64,
    pub overall: u32,
    pub grade: Grade,
    pub status: ScoreStatus,
    pub message: String,
}

impl HealthReport {
    fn no_data() -> Self {
        Self {
            consistency: 0.0,
            momentum: 0.0,
            balance: 0.0,
            engagement: 0.0,
            overall: 0,
            grade: Grade::F,
            status: ScoreStatus::NoData,
            message: NO_DATA_MESSAGE.to_string(),
        }
    }

    pub fn has_data(&self) -> bool {
        self.status == ScoreStatus::Scored
    }
}

pub fn score(snapshots: &[EntitySnapshot]) -> HealthReport {
    if snapshots.is_empty() {
        return HealthReport::no_data();
    }

    let consistency = consistency(snapshots);
    let momentum = momentum(snapshots);
    let balance = balance(snapshots);
    let engagement = engagement(snapshots);

    let raw = consistency * W_CONSISTENCY
        + momentum * W_MOMENTUM
        + balance * W_BALANCE
        + engagement * W_ENGAGEMENT;
    let overall = raw.round().clamp(0.0, 100.0) as u32;
    let grade = Grade::from_score(overall);

    HealthReport {
        consistency,
        momentum,
        balance,
        engagement,
        overall,
        grade,
        status: ScoreStatus::Scored,
        message: grade.message().to_string(),
    }
}

fn ratio_percent(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        return 0.0;
    }
    (part / whole * 100.0).clamp(0.0, 100.0)
}

fn consistency(snapshots: &[EntitySnapshot]) -> f64 {
    let logged: u32 = snapshots
        .iter()
        .map(|s| s.completed_last_week.min(CONSISTENCY_WINDOW_DAYS))
        .sum();
    let possible = snapshots.len() as f64 * f64::from(CONSISTENCY_WINDOW_DAYS);
    ratio_percent(f64::from(logged), possible)
}

fn momentum(snapshots: &[EntitySnapshot]) -> f64 {
    let total: f64 = snapshots.iter().map(|s| f64::from(s.current_streak)).sum();
    let avg = total / snapshots.len() as f64;
    ratio_percent(avg, f64::from(MOMENTUM_TARGET_STREAK))
}

fn balance(snapshots: &[EntitySnapshot]) -> f64 {
    let present: BTreeSet<Category> = snapshots.iter().map(|s| s.category).collect();
    ratio_percent(present.len() as f64, Category::ALL.len() as f64)
}

fn engagement(snapshots: &[EntitySnapshot]) -> f64 {
    let done = snapshots.iter().filter(|s| s.completed_today).count();
    ratio_percent(done as f64, snapshots.len() as f64)
}
