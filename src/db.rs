use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::day::format_day_key;
use crate::error::{Result, TrackerError};
use crate::models::{Category, CompletionLogEntry, EntityKind, TrackableEntity};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS entities (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        kind TEXT NOT NULL,
        category TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS completion_logs (
        id INTEGER PRIMARY KEY,
        entity_id INTEGER NOT NULL REFERENCES entities(id),
        day TEXT NOT NULL,
        completed BOOLEAN NOT NULL DEFAULT 0
    );

    CREATE INDEX IF NOT EXISTS idx_completion_logs_entity_day
        ON completion_logs (entity_id, day);
";

/// default db file path
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("you-first-tracker")
        .join("tracker.db")
}

/// open db file + init tables
pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    debug!(path = %path.display(), "opening database");
    let conn = Connection::open(path)?;
    init_db(&conn)?;
    Ok(conn)
}

/// create tables if missing
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}

fn parse_day(s: &str, col: usize) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(e)))
}

fn conversion_error(col: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, Type::Text, msg.into())
}

/// insert entity, returns it with its new id
pub fn add_entity(
    conn: &Connection,
    name: &str,
    kind: EntityKind,
    category: Category,
    created_at: NaiveDate,
) -> Result<TrackableEntity> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TrackerError::invalid("entity name must not be empty"));
    }
    conn.execute(
        "INSERT INTO entities (name, kind, category, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![name, kind.as_str(), category.as_str(), format_day_key(created_at)],
    )?;
    let id = conn.last_insert_rowid();
    debug!(id, name, kind = kind.as_str(), "entity added");
    Ok(TrackableEntity {
        id,
        name: name.to_string(),
        kind,
        category,
        created_at,
    })
}

/// all entities, oldest first
pub fn list_entities(conn: &Connection) -> rusqlite::Result<Vec<TrackableEntity>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, kind, category, created_at FROM entities ORDER BY created_at, id",
    )?;

    let rows = stmt.query_map([], |row| {
        let kind: String = row.get(2)?;
        let category: String = row.get(3)?;
        let created_at: String = row.get(4)?;
        Ok(TrackableEntity {
            id: row.get(0)?,
            name: row.get(1)?,
            kind: EntityKind::parse(&kind)
                .ok_or_else(|| conversion_error(2, format!("unknown kind {:?}", kind)))?,
            category: Category::parse(&category)
                .ok_or_else(|| conversion_error(3, format!("unknown category {:?}", category)))?,
            created_at: parse_day(&created_at, 4)?,
        })
    })?;

    rows.collect()
}

fn entity_exists(conn: &Connection, entity_id: i64) -> rusqlite::Result<bool> {
    conn.query_row("SELECT 1 FROM entities WHERE id = ?1", params![entity_id], |_| Ok(()))
        .optional()
        .map(|found| found.is_some())
}

/// log rows for the given entities, unordered
pub fn load_logs(conn: &Connection, entity_ids: &[i64]) -> rusqlite::Result<Vec<CompletionLogEntry>> {
    let mut stmt = conn.prepare("SELECT entity_id, day, completed FROM completion_logs WHERE entity_id = ?1")?;

    let mut results = Vec::new();
    for id in entity_ids {
        let rows = stmt.query_map(params![id], |row| {
            let day: String = row.get(1)?;
            Ok(CompletionLogEntry {
                entity_id: row.get(0)?,
                date: parse_day(&day, 1)?,
                completed: row.get(2)?,
            })
        })?;
        for row in rows {
            results.push(row?);
        }
    }
    Ok(results)
}

/// Completed state of a day, `None` if never logged. Duplicate rows are OR-ed.
fn day_status(conn: &Connection, entity_id: i64, day: &str) -> rusqlite::Result<Option<bool>> {
    conn.query_row(
        "SELECT COUNT(*), COALESCE(MAX(completed), 0) FROM completion_logs WHERE entity_id = ?1 AND day = ?2",
        params![entity_id, day],
        |row| {
            let count: u32 = row.get(0)?;
            let any_completed: bool = row.get(1)?;
            Ok((count > 0).then_some(any_completed))
        },
    )
}

/// Set a day's state. Existing rows for the day are updated in place.
pub fn set_completion(conn: &Connection, entity_id: i64, day: NaiveDate, completed: bool) -> Result<()> {
    if !entity_exists(conn, entity_id)? {
        return Err(TrackerError::EntityNotFound(entity_id));
    }
    let key = format_day_key(day);
    let updated = conn.execute(
        "UPDATE completion_logs SET completed = ?3 WHERE entity_id = ?1 AND day = ?2",
        params![entity_id, key, completed],
    )?;
    if updated == 0 {
        conn.execute(
            "INSERT INTO completion_logs (entity_id, day, completed) VALUES (?1, ?2, ?3)",
            params![entity_id, key, completed],
        )?;
    }
    debug!(entity_id, day = %key, completed, "completion set");
    Ok(())
}

/// Flip a day's state, returns the new state. Unlogged days become completed.
pub fn toggle_completion(conn: &Connection, entity_id: i64, day: NaiveDate) -> Result<bool> {
    if !entity_exists(conn, entity_id)? {
        return Err(TrackerError::EntityNotFound(entity_id));
    }
    let key = format_day_key(day);
    let next = match day_status(conn, entity_id, &key)? {
        Some(completed) => !completed,
        None => true,
    };
    set_completion(conn, entity_id, day, next)?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        conn
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, day).unwrap()
    }

    #[test]
    fn test_add_and_list() {
        let conn = in_memory_db();
        let a = add_entity(&conn, "Meditate", EntityKind::Habit, Category::Spirit, d(2)).unwrap();
        let b = add_entity(&conn, "No sugar", EntityKind::Rule, Category::Body, d(1)).unwrap();

        let all = list_entities(&conn).unwrap();
        assert_eq!(all, vec![b, a]);
    }

    #[test]
    fn test_empty_name_rejected() {
        let conn = in_memory_db();
        let err = add_entity(&conn, "  ", EntityKind::Goal, Category::Mind, d(1)).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidInput(_)));
    }

    #[test]
    fn test_toggle_flips() {
        let conn = in_memory_db();
        let e = add_entity(&conn, "Run", EntityKind::Habit, Category::Body, d(1)).unwrap();

        assert!(toggle_completion(&conn, e.id, d(19)).unwrap());
        assert!(!toggle_completion(&conn, e.id, d(19)).unwrap());
        assert!(toggle_completion(&conn, e.id, d(19)).unwrap());

        // toggling never appends a second row
        let logs = load_logs(&conn, &[e.id]).unwrap();
        assert_eq!(logs, vec![CompletionLogEntry::new(e.id, d(19), true)]);
    }

    #[test]
    fn test_toggle_unknown_entity() {
        let conn = in_memory_db();
        let err = toggle_completion(&conn, 42, d(19)).unwrap_err();
        assert!(matches!(err, TrackerError::EntityNotFound(42)));
    }

    #[test]
    fn test_toggle_with_duplicate_rows() {
        let conn = in_memory_db();
        let e = add_entity(&conn, "Read", EntityKind::Habit, Category::Mind, d(1)).unwrap();
        conn.execute_batch(&format!(
            "INSERT INTO completion_logs (entity_id, day, completed) VALUES ({0}, '2026-02-10', 0);
             INSERT INTO completion_logs (entity_id, day, completed) VALUES ({0}, '2026-02-10', 1);",
            e.id
        ))
        .unwrap();

        // any completed row wins, so the day reads as done and toggles off
        assert!(!toggle_completion(&conn, e.id, d(10)).unwrap());
        let logs = load_logs(&conn, &[e.id]).unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs.iter().all(|l| !l.completed));
    }

    #[test]
    fn test_load_logs_filters_entities() {
        let conn = in_memory_db();
        let a = add_entity(&conn, "A", EntityKind::Habit, Category::Body, d(1)).unwrap();
        let b = add_entity(&conn, "B", EntityKind::Goal, Category::Mind, d(1)).unwrap();
        set_completion(&conn, a.id, d(3), true).unwrap();
        set_completion(&conn, b.id, d(3), true).unwrap();
        set_completion(&conn, b.id, d(4), false).unwrap();

        assert_eq!(load_logs(&conn, &[a.id]).unwrap().len(), 1);
        assert_eq!(load_logs(&conn, &[b.id]).unwrap().len(), 2);
        assert_eq!(load_logs(&conn, &[a.id, b.id]).unwrap().len(), 3);
        assert!(load_logs(&conn, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_open_db_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tracker.db");
        let conn = open_db(&path).unwrap();
        add_entity(&conn, "Journal", EntityKind::Habit, Category::Spirit, d(1)).unwrap();
        drop(conn);

        let conn = open_db(&path).unwrap();
        assert_eq!(list_entities(&conn).unwrap().len(), 1);
    }
}
