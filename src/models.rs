use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Habit,
    Rule,
    Goal,
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Habit => "Habit",
            EntityKind::Rule => "Rule",
            EntityKind::Goal => "Goal",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Habit => "habit",
            EntityKind::Rule => "rule",
            EntityKind::Goal => "goal",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "habit" => Some(EntityKind::Habit),
            "rule" => Some(EntityKind::Rule),
            "goal" => Some(EntityKind::Goal),
            _ => None,
        }
    }
}

/// Grouping bucket. Only the Balance score looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Body,
    Mind,
    Spirit,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Body, Category::Mind, Category::Spirit];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Body => "Body",
            Category::Mind => "Mind",
            Category::Spirit => "Spirit",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Body => "body",
            Category::Mind => "mind",
            Category::Spirit => "spirit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "body" => Some(Category::Body),
            "mind" => Some(Category::Mind),
            "spirit" => Some(Category::Spirit),
            _ => None,
        }
    }
}

/// Anything that accrues a streak: a habit, a rule, or a goal's micro-step series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackableEntity {
    pub id: i64,
    pub name: String,
    pub kind: EntityKind,
    pub category: Category,
    pub created_at: NaiveDate,
}

/// One day's completion status for an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionLogEntry {
    pub entity_id: i64,
    pub date: NaiveDate,
    pub completed: bool,
}

impl CompletionLogEntry {
    pub fn new(entity_id: i64, date: NaiveDate, completed: bool) -> Self {
        Self {
            entity_id,
            date,
            completed,
        }
    }
}

// 67-day formation window, oldest day first
pub const FORMATION_WINDOW_DAYS: u32 = 67;
pub const STAGE_ONE_DAYS: u32 = 18;
pub const STAGE_TWO_DAYS: u32 = 27;
pub const STAGE_THREE_DAYS: u32 = 21;
pub const BONUS_DAYS: u32 = 1;

pub const CONSISTENCY_WINDOW_DAYS: u32 = 7;
pub const MOMENTUM_TARGET_STREAK: u32 = 21;
