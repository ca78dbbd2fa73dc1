use async_trait::async_trait;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tracing::debug;

use super::errors::RepositoryError;
use super::query::{SelectQuery, UpdateQuery};
use crate::database::Database;
use crate::models::{timestamp_now, NewReminder, ReminderChanges, ReminderKind, ReminderRow};

/// Store contract shared by both reminder kinds
#[async_trait]
pub trait ReminderRepositoryTrait: Send + Sync {
    async fn create(&self, kind: ReminderKind, input: NewReminder) -> Result<i64, RepositoryError>;

    async fn get_by_id(&self, kind: ReminderKind, id: i64) -> Result<Option<ReminderRow>, RepositoryError>;

    /// All reminders of a kind ordered by time of day
    async fn list(&self, kind: ReminderKind) -> Result<Vec<ReminderRow>, RepositoryError>;

    async fn list_enabled(&self, kind: ReminderKind) -> Result<Vec<ReminderRow>, RepositoryError>;

    async fn update(&self, kind: ReminderKind, id: i64, changes: ReminderChanges) -> Result<bool, RepositoryError>;

    async fn delete(&self, kind: ReminderKind, id: i64) -> Result<bool, RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct SqliteReminderRepository {
    db: Database,
}

impl SqliteReminderRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn columns(kind: ReminderKind) -> String {
        let dosage = if kind.has_dosage() { "dosage" } else { "NULL" };
        format!(
            "id, {}, {}, time, days_of_week, is_enabled, notification_id, created_at, updated_at",
            kind.label_column(),
            dosage
        )
    }

    fn select(kind: ReminderKind, enabled_only: bool) -> (String, Vec<rusqlite::types::Value>) {
        let mut query = SelectQuery::new(kind.table(), Self::columns(kind));
        if enabled_only {
            query = query.filter_raw("is_enabled = 1");
        }
        query.order_by("time ASC, id ASC").build()
    }

    fn query_rows(&self, kind: ReminderKind, enabled_only: bool) -> Result<Vec<ReminderRow>, RepositoryError> {
        let conn = self.db.connection()?;
        let (sql, values) = Self::select(kind, enabled_only);

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| reminder_from_row(kind, row))?;

        let mut reminders = Vec::new();
        for row in rows {
            reminders.push(row?);
        }
        Ok(reminders)
    }
}

fn reminder_from_row(kind: ReminderKind, row: &Row<'_>) -> rusqlite::Result<ReminderRow> {
    Ok(ReminderRow {
        id: row.get(0)?,
        kind,
        label: row.get(1)?,
        dosage: row.get(2)?,
        time: row.get(3)?,
        days_of_week: row.get(4)?,
        is_enabled: row.get(5)?,
        notification_id: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

#[async_trait]
impl ReminderRepositoryTrait for SqliteReminderRepository {
    async fn create(&self, kind: ReminderKind, input: NewReminder) -> Result<i64, RepositoryError> {
        let conn = self.db.connection()?;
        let now = timestamp_now();

        match kind {
            ReminderKind::Medication => conn.execute(
                "INSERT INTO medication_reminders
                 (medication_name, dosage, time, days_of_week, is_enabled, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                params![input.label, input.dosage, input.time, input.days_of_week, input.is_enabled, now],
            )?,
            ReminderKind::Measurement => conn.execute(
                "INSERT INTO measurement_reminders
                 (name, time, days_of_week, is_enabled, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![input.label, input.time, input.days_of_week, input.is_enabled, now],
            )?,
        };

        let id = conn.last_insert_rowid();
        debug!("Stored {} reminder: id={}", kind, id);
        Ok(id)
    }

    async fn get_by_id(&self, kind: ReminderKind, id: i64) -> Result<Option<ReminderRow>, RepositoryError> {
        let conn = self.db.connection()?;
        let (sql, values) = SelectQuery::new(kind.table(), Self::columns(kind))
            .filter("id = ?", id)
            .build();

        let reminder = conn
            .query_row(&sql, params_from_iter(values.iter()), |row| reminder_from_row(kind, row))
            .optional()?;
        Ok(reminder)
    }

    async fn list(&self, kind: ReminderKind) -> Result<Vec<ReminderRow>, RepositoryError> {
        self.query_rows(kind, false)
    }

    async fn list_enabled(&self, kind: ReminderKind) -> Result<Vec<ReminderRow>, RepositoryError> {
        self.query_rows(kind, true)
    }

    async fn update(&self, kind: ReminderKind, id: i64, changes: ReminderChanges) -> Result<bool, RepositoryError> {
        let conn = self.db.connection()?;
        let mut query = UpdateQuery::new(kind.table())
            .set_if(kind.label_column(), changes.label)
            .set_if("time", changes.time)
            .set_if("days_of_week", changes.days_of_week)
            .set_if("is_enabled", changes.is_enabled)
            .set_nullable("notification_id", changes.notification_id);
        if kind.has_dosage() {
            query = query.set_nullable("dosage", changes.dosage);
        }
        let (sql, values) = query.set("updated_at", timestamp_now()).build_for_id(id);
        debug!("Updating {} reminder: {}", kind, sql);

        let affected = conn.execute(&sql, params_from_iter(values.iter()))?;
        Ok(affected > 0)
    }

    async fn delete(&self, kind: ReminderKind, id: i64) -> Result<bool, RepositoryError> {
        let conn = self.db.connection()?;
        let sql = format!("DELETE FROM {} WHERE id = ?1", kind.table());
        let affected = conn.execute(&sql, params![id])?;
        Ok(affected > 0)
    }
}
