use async_trait::async_trait;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tracing::debug;

use super::errors::RepositoryError;
use super::query::{SelectQuery, UpdateQuery};
use crate::database::Database;
use crate::models::{timestamp_now, BPRecordChanges, BPRecordRow, NewBPRecord, RecordQuery, StatisticsRow, TimeBounds};

const RECORD_COLUMNS: &str =
    "id, systolic, diastolic, pulse, measured_at, note, image_path, created_at, updated_at";

const STATISTICS_COLUMNS: &str = "
    COUNT(*),
    COALESCE(AVG(systolic), 0.0),
    COALESCE(AVG(diastolic), 0.0),
    COALESCE(AVG(pulse), 0.0),
    COALESCE(MAX(systolic), 0),
    COALESCE(MIN(systolic), 0),
    COALESCE(MAX(diastolic), 0),
    COALESCE(MIN(diastolic), 0),
    COALESCE(MAX(pulse), 0),
    COALESCE(MIN(pulse), 0),
    COALESCE(SUM(CASE WHEN systolic < 120 AND diastolic < 80 THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN systolic >= 120 AND systolic < 130 AND diastolic < 80 THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN systolic >= 130 OR diastolic >= 80 THEN 1 ELSE 0 END), 0)";

/// Store contract for blood pressure records
#[async_trait]
pub trait RecordRepositoryTrait: Send + Sync {
    /// Insert a record and return its id
    async fn create(&self, input: NewBPRecord) -> Result<i64, RepositoryError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<BPRecordRow>, RepositoryError>;

    /// Records inside the query bounds, newest `measured_at` first
    async fn list(&self, query: &RecordQuery) -> Result<Vec<BPRecordRow>, RepositoryError>;

    /// Most recent record by `measured_at`
    async fn latest(&self) -> Result<Option<BPRecordRow>, RepositoryError>;

    /// Apply supplied fields and refresh `updated_at`. Returns false when the id is unknown.
    async fn update(&self, id: i64, changes: BPRecordChanges) -> Result<bool, RepositoryError>;

    /// Returns false when the id is unknown
    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;

    /// Count, averages, extremes and AHA band counts inside the bounds
    async fn statistics(&self, bounds: &TimeBounds) -> Result<StatisticsRow, RepositoryError>;
}

/// Record store over the injected SQLite handle
#[derive(Debug, Clone)]
pub struct SqliteRecordRepository {
    db: Database,
}

impl SqliteRecordRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<BPRecordRow> {
    Ok(BPRecordRow {
        id: row.get(0)?,
        systolic: row.get(1)?,
        diastolic: row.get(2)?,
        pulse: row.get(3)?,
        measured_at: row.get(4)?,
        note: row.get(5)?,
        image_path: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

#[async_trait]
impl RecordRepositoryTrait for SqliteRecordRepository {
    async fn create(&self, input: NewBPRecord) -> Result<i64, RepositoryError> {
        let conn = self.db.connection()?;
        let now = timestamp_now();

        conn.execute(
            "INSERT INTO bp_records
             (systolic, diastolic, pulse, measured_at, note, image_path, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                input.systolic,
                input.diastolic,
                input.pulse,
                input.measured_at,
                input.note,
                input.image_path,
                now,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Stored blood pressure record: id={}", id);
        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<BPRecordRow>, RepositoryError> {
        debug!("Getting blood pressure record by ID: id={}", id);
        let conn = self.db.connection()?;
        let (sql, values) = SelectQuery::new("bp_records", RECORD_COLUMNS)
            .filter("id = ?", id)
            .build();

        let record = conn
            .query_row(&sql, params_from_iter(values.iter()), record_from_row)
            .optional()?;
        Ok(record)
    }

    async fn list(&self, query: &RecordQuery) -> Result<Vec<BPRecordRow>, RepositoryError> {
        let conn = self.db.connection()?;
        let (sql, values) = SelectQuery::new("bp_records", RECORD_COLUMNS)
            .within("measured_at", &query.bounds)
            .order_by("measured_at DESC, id DESC")
            .limit(query.limit)
            .offset(query.offset)
            .build();
        debug!("Listing blood pressure records: {}", sql);

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), record_from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    async fn latest(&self) -> Result<Option<BPRecordRow>, RepositoryError> {
        let query = RecordQuery {
            limit: Some(1),
            ..RecordQuery::default()
        };
        Ok(self.list(&query).await?.into_iter().next())
    }

    async fn update(&self, id: i64, changes: BPRecordChanges) -> Result<bool, RepositoryError> {
        let conn = self.db.connection()?;
        let (sql, values) = UpdateQuery::new("bp_records")
            .set_if("systolic", changes.systolic)
            .set_if("diastolic", changes.diastolic)
            .set_if("pulse", changes.pulse)
            .set_if("measured_at", changes.measured_at)
            .set_nullable("note", changes.note)
            .set_nullable("image_path", changes.image_path)
            .set("updated_at", timestamp_now())
            .build_for_id(id);
        debug!("Updating blood pressure record: {}", sql);

        let affected = conn.execute(&sql, params_from_iter(values.iter()))?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let conn = self.db.connection()?;
        let affected = conn.execute("DELETE FROM bp_records WHERE id = ?1", params![id])?;
        debug!("Deleted blood pressure record: id={}, affected={}", id, affected);
        Ok(affected > 0)
    }

    async fn statistics(&self, bounds: &TimeBounds) -> Result<StatisticsRow, RepositoryError> {
        let conn = self.db.connection()?;
        let (sql, values) = SelectQuery::new("bp_records", STATISTICS_COLUMNS)
            .within("measured_at", bounds)
            .build();

        let stats = conn.query_row(&sql, params_from_iter(values.iter()), |row| {
            Ok(StatisticsRow {
                total: row.get(0)?,
                avg_systolic: row.get(1)?,
                avg_diastolic: row.get(2)?,
                avg_pulse: row.get(3)?,
                max_systolic: row.get(4)?,
                min_systolic: row.get(5)?,
                max_diastolic: row.get(6)?,
                min_diastolic: row.get(7)?,
                max_pulse: row.get(8)?,
                min_pulse: row.get(9)?,
                normal_count: row.get(10)?,
                elevated_count: row.get(11)?,
                hypertension_count: row.get(12)?,
            })
        })?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn reading(systolic: i32, diastolic: i32, measured_at: &str) -> NewBPRecord {
        NewBPRecord {
            systolic,
            diastolic,
            pulse: 72,
            measured_at: measured_at.to_string(),
            note: None,
            image_path: None,
        }
    }

    fn repository() -> SqliteRecordRepository {
        SqliteRecordRepository::new(Database::open_in_memory().unwrap())
    }

    #[tokio::test]
    async fn test_create_and_get_by_id() {
        let repo = repository();
        let id = repo.create(reading(120, 80, "2024-03-10T08:00:00.000Z")).await.unwrap();

        let record = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!((record.systolic, record.diastolic, record.pulse), (120, 80, 72));
        assert_eq!(record.measured_at, "2024-03-10T08:00:00.000Z");
        assert_eq!(record.created_at, record.updated_at);
        assert!(repo.get_by_id(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_newest_first_with_pagination() {
        let repo = repository();
        for day in 1..=5 {
            repo.create(reading(110 + day, 70, &format!("2024-03-0{day}T08:00:00.000Z")))
                .await
                .unwrap();
        }

        let all = repo.list(&RecordQuery::default()).await.unwrap();
        let days: Vec<_> = all.iter().map(|r| &r.measured_at[..10]).collect();
        assert_eq!(days, ["2024-03-05", "2024-03-04", "2024-03-03", "2024-03-02", "2024-03-01"]);

        let page = repo
            .list(&RecordQuery {
                limit: Some(2),
                offset: Some(1),
                ..RecordQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].measured_at, "2024-03-04T08:00:00.000Z");

        let latest = repo.latest().await.unwrap().unwrap();
        assert_eq!(latest.measured_at, "2024-03-05T08:00:00.000Z");
    }

    #[tokio::test]
    async fn test_list_bounds_are_inclusive() {
        let repo = repository();
        repo.create(reading(120, 80, "2024-03-02T23:59:59.999Z")).await.unwrap();
        repo.create(reading(120, 80, "2024-03-03T00:00:00.000Z")).await.unwrap();
        repo.create(reading(120, 80, "2024-03-10T23:59:59.999Z")).await.unwrap();
        repo.create(reading(120, 80, "2024-03-11T00:00:00.000Z")).await.unwrap();

        let query = RecordQuery {
            bounds: TimeBounds::between("2024-03-03T00:00:00.000Z", "2024-03-10T23:59:59.999Z"),
            ..RecordQuery::default()
        };
        let records = repo.list(&query).await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_update_changes_only_supplied_fields() {
        let repo = repository();
        let id = repo.create(reading(130, 85, "2024-03-10T08:00:00.000Z")).await.unwrap();
        let before = repo.get_by_id(id).await.unwrap().unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;
        let changes = BPRecordChanges {
            note: Some(Some("x".to_string())),
            ..BPRecordChanges::default()
        };
        assert!(repo.update(id, changes).await.unwrap());

        let after = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(after.note.as_deref(), Some("x"));
        assert!(after.updated_at > before.updated_at);
        assert_eq!(
            BPRecordRow {
                note: None,
                updated_at: before.updated_at.clone(),
                ..after
            },
            before
        );
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id() {
        let repo = repository();
        assert!(!repo.update(99, BPRecordChanges::default()).await.unwrap());
        assert!(!repo.delete(99).await.unwrap());

        let id = repo.create(reading(120, 80, "2024-03-10T08:00:00.000Z")).await.unwrap();
        assert!(repo.delete(id).await.unwrap());
        assert!(repo.get_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_statistics_matches_band_cutoffs() {
        let repo = repository();
        repo.create(reading(120, 80, "2024-03-09T08:00:00.000Z")).await.unwrap();
        repo.create(reading(140, 95, "2024-03-10T08:00:00.000Z")).await.unwrap();

        let stats = repo.statistics(&TimeBounds::default()).await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.avg_systolic, 130.0);
        assert_eq!(stats.max_systolic, 140);
        assert_eq!(stats.min_diastolic, 80);
        assert_eq!(stats.normal_count, 0);
        assert_eq!(stats.elevated_count, 0);
        assert_eq!(stats.hypertension_count, 2);
    }

    #[tokio::test]
    async fn test_statistics_on_empty_range() {
        let repo = repository();
        repo.create(reading(120, 80, "2024-03-09T08:00:00.000Z")).await.unwrap();

        let bounds = TimeBounds::between("2025-01-01T00:00:00.000Z", "2025-01-31T23:59:59.999Z");
        let stats = repo.statistics(&bounds).await.unwrap();
        assert_eq!(stats, StatisticsRow::default());
    }
}
