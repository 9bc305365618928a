//! Streak, formation-stage and health-grade engine for the You First tracker.
//!
//! Raw completion rows flow through [`day`] → [`index`] → [`streak`] /
//! [`formation`] → [`score`]. [`dashboard`] runs the whole pipeline for a set
//! of entities. Everything above [`db`] is pure and takes `today` explicitly.

pub mod config;
pub mod dashboard;
pub mod day;
pub mod db;
pub mod error;
pub mod formation;
pub mod index;
pub mod models;
pub mod score;
pub mod streak;

pub use dashboard::{Dashboard, EntityStats};
pub use error::{Result, TrackerError};
pub use formation::{FormationStage, FormationWindow, SegmentProgress};
pub use index::CompletionIndex;
pub use models::{Category, CompletionLogEntry, EntityKind, TrackableEntity};
pub use score::{EntitySnapshot, Grade, HealthReport, ScoreStatus};
pub use streak::Streaks;
