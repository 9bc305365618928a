use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::formation::{FormationStage, FormationWindow, days_to_next_stage};
use crate::index::CompletionIndex;
use crate::models::{Category, CompletionLogEntry, EntityKind, TrackableEntity};
use crate::score::{EntitySnapshot, HealthReport, score};
use crate::streak::streaks;

/// Derived values for one entity, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStats {
    pub id: i64,
    pub name: String,
    pub kind: EntityKind,
    pub category: Category,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub stage: FormationStage,
    pub days_to_next_stage: Option<u32>,
    pub completed_today: bool,
    pub window: FormationWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub today: NaiveDate,
    pub entities: Vec<EntityStats>,
    pub health: HealthReport,
}

impl Dashboard {
    pub fn build(entities: &[TrackableEntity], entries: &[CompletionLogEntry], today: NaiveDate) -> Self {
        let indexes = CompletionIndex::group(entries);
        let empty = CompletionIndex::default();

        let mut stats = Vec::with_capacity(entities.len());
        let mut snapshots = Vec::with_capacity(entities.len());

        for entity in entities {
            let index = indexes.get(&entity.id).unwrap_or(&empty);
            let s = streaks(index, today);
            trace!(entity = entity.id, logged = index.len(), current = s.current, longest = s.longest, "streaks");

            stats.push(EntityStats {
                id: entity.id,
                name: entity.name.clone(),
                kind: entity.kind,
                category: entity.category,
                current_streak: s.current,
                longest_streak: s.longest,
                stage: FormationStage::for_streak(s.current),
                days_to_next_stage: days_to_next_stage(s.current),
                completed_today: index.is_completed(today),
                window: FormationWindow::compute(index, today),
            });
            snapshots.push(EntitySnapshot::with_current_streak(entity, index, s.current, today));
        }

        Self {
            today,
            entities: stats,
            health: score(&snapshots),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::days_back;
    use crate::score::{Grade, ScoreStatus};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 19).unwrap()
    }

    fn entity(id: i64, category: Category) -> TrackableEntity {
        TrackableEntity {
            id,
            name: format!("entity {}", id),
            kind: EntityKind::Habit,
            category,
            created_at: days_back(today(), 60).unwrap(),
        }
    }

    #[test]
    fn test_empty_dashboard() {
        let dash = Dashboard::build(&[], &[], today());
        assert!(dash.entities.is_empty());
        assert_eq!(dash.health.status, ScoreStatus::NoData);
        assert_eq!(dash.health.grade, Grade::F);
    }

    #[test]
    fn test_entity_without_logs() {
        let dash = Dashboard::build(&[entity(1, Category::Body)], &[], today());
        let e = &dash.entities[0];
        assert_eq!(e.current_streak, 0);
        assert_eq!(e.longest_streak, 0);
        assert_eq!(e.stage, FormationStage::Starting);
        assert_eq!(e.days_to_next_stage, Some(7));
        assert!(!e.completed_today);
        assert_eq!(dash.health.status, ScoreStatus::Scored);
    }

    #[test]
    fn test_three_entities_perfect() {
        let entities = [
            entity(1, Category::Body),
            entity(2, Category::Mind),
            entity(3, Category::Spirit),
        ];
        let entries: Vec<_> = entities
            .iter()
            .flat_map(|e| (0..21).map(move |n| CompletionLogEntry::new(e.id, days_back(today(), n).unwrap(), true)))
            .collect();

        let dash = Dashboard::build(&entities, &entries, today());
        for e in &dash.entities {
            assert_eq!(e.current_streak, 21);
            assert_eq!(e.stage, FormationStage::Strengthening);
            assert!(e.completed_today);
            assert_eq!(e.window.stage_three.completed, 20);
        }
        assert_eq!(dash.health.overall, 100);
        assert_eq!(dash.health.grade, Grade::APlus);
    }

    #[test]
    fn test_logs_for_unknown_entity_ignored() {
        let entries = vec![
            CompletionLogEntry::new(1, today(), true),
            CompletionLogEntry::new(99, today(), true),
        ];
        let dash = Dashboard::build(&[entity(1, Category::Mind)], &entries, today());
        assert_eq!(dash.entities.len(), 1);
        assert_eq!(dash.entities[0].current_streak, 1);
        assert_eq!(dash.health.engagement, 100.0);
    }

    #[test]
    fn test_min_date_does_not_panic() {
        let today = NaiveDate::MIN.checked_add_days(chrono::Days::new(4)).unwrap();
        let e = TrackableEntity {
            created_at: today,
            ..entity(1, Category::Body)
        };
        let entries = vec![CompletionLogEntry::new(1, today, true)];
        let dash = Dashboard::build(&[e], &entries, today);
        assert_eq!(dash.entities[0].current_streak, 1);
        assert_eq!(dash.entities[0].window.bonus.completed, 1);
        assert_eq!(dash.health.engagement, 100.0);
    }

    #[test]
    fn test_snapshot_matches_streak_stats() {
        let entries: Vec<_> = (0..5)
            .map(|n| CompletionLogEntry::new(1, days_back(today(), n).unwrap(), true))
            .collect();
        let dash = Dashboard::build(&[entity(1, Category::Mind)], &entries, today());
        // momentum is derived from the same current streak shown per entity
        assert_eq!(dash.entities[0].current_streak, 5);
        assert!((dash.health.momentum - 5.0 / 21.0 * 100.0).abs() < 1e-9);
        assert_eq!(dash.health.consistency, 5.0 / 7.0 * 100.0);
    }

    #[test]
    fn test_serializes_to_json() {
        let entries = vec![CompletionLogEntry::new(1, today(), true)];
        let dash = Dashboard::build(&[entity(1, Category::Body)], &entries, today());
        let json = serde_json::to_value(&dash).unwrap();
        assert_eq!(json["today"], "2026-02-19");
        assert_eq!(json["entities"][0]["stage"], "Starting");
        assert_eq!(json["entities"][0]["category"], "body");
        assert_eq!(json["health"]["status"], "scored");
    }
}
