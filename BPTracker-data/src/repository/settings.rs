use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use super::errors::RepositoryError;
use super::query::UpdateQuery;
use crate::database::Database;
use crate::models::{timestamp_now, ProfileChanges, ProfileRow, SettingsChanges, SettingsRow};

/// Both singletons live at id 1
const SINGLETON_ID: i64 = 1;

/// Store contract for the profile and settings singletons
#[async_trait]
pub trait SettingsRepositoryTrait: Send + Sync {
    /// Profile row, created with defaults when missing
    async fn profile(&self) -> Result<ProfileRow, RepositoryError>;

    async fn update_profile(&self, changes: ProfileChanges) -> Result<ProfileRow, RepositoryError>;

    /// Settings row, created with defaults when missing
    async fn settings(&self) -> Result<SettingsRow, RepositoryError>;

    async fn update_settings(&self, changes: SettingsChanges) -> Result<SettingsRow, RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct SqliteSettingsRepository {
    db: Database,
}

impl SqliteSettingsRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn read_profile(conn: &Connection) -> Result<Option<ProfileRow>, RepositoryError> {
    let row = conn
        .query_row(
            "SELECT name, age, gender, medical_conditions, created_at, updated_at
             FROM user_profile WHERE id = ?1",
            [SINGLETON_ID],
            |row| {
                Ok(ProfileRow {
                    name: row.get(0)?,
                    age: row.get(1)?,
                    gender: row.get(2)?,
                    medical_conditions: row.get(3)?,
                    created_at: row.get(4)?,
                    updated_at: row.get(5)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

fn read_settings(conn: &Connection) -> Result<Option<SettingsRow>, RepositoryError> {
    let row = conn
        .query_row(
            "SELECT pressure_unit, notifications_enabled, abnormal_alert_enabled,
                    bp_threshold_high_systolic, bp_threshold_high_diastolic,
                    bp_threshold_low_systolic, bp_threshold_low_diastolic,
                    dark_mode, cloud_sync_enabled, created_at, updated_at
             FROM app_settings WHERE id = ?1",
            [SINGLETON_ID],
            |row| {
                Ok(SettingsRow {
                    pressure_unit: row.get(0)?,
                    notifications_enabled: row.get(1)?,
                    abnormal_alert_enabled: row.get(2)?,
                    bp_threshold_high_systolic: row.get(3)?,
                    bp_threshold_high_diastolic: row.get(4)?,
                    bp_threshold_low_systolic: row.get(5)?,
                    bp_threshold_low_diastolic: row.get(6)?,
                    dark_mode: row.get(7)?,
                    cloud_sync_enabled: row.get(8)?,
                    created_at: row.get(9)?,
                    updated_at: row.get(10)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

fn ensure_profile(conn: &Connection) -> Result<ProfileRow, RepositoryError> {
    if let Some(profile) = read_profile(conn)? {
        return Ok(profile);
    }
    info!("Profile row missing, creating default");
    conn.execute("INSERT OR IGNORE INTO user_profile (id, name) VALUES (?1, '')", [SINGLETON_ID])?;
    read_profile(conn)?.ok_or_else(|| RepositoryError::NotFound("user_profile".to_string()))
}

fn ensure_settings(conn: &Connection) -> Result<SettingsRow, RepositoryError> {
    if let Some(settings) = read_settings(conn)? {
        return Ok(settings);
    }
    info!("Settings row missing, creating default");
    conn.execute("INSERT OR IGNORE INTO app_settings (id) VALUES (?1)", [SINGLETON_ID])?;
    read_settings(conn)?.ok_or_else(|| RepositoryError::NotFound("app_settings".to_string()))
}

#[async_trait]
impl SettingsRepositoryTrait for SqliteSettingsRepository {
    async fn profile(&self) -> Result<ProfileRow, RepositoryError> {
        let conn = self.db.connection()?;
        ensure_profile(&conn)
    }

    async fn update_profile(&self, changes: ProfileChanges) -> Result<ProfileRow, RepositoryError> {
        let conn = self.db.connection()?;
        ensure_profile(&conn)?;

        let (sql, values) = UpdateQuery::new("user_profile")
            .set_if("name", changes.name)
            .set_nullable("age", changes.age)
            .set_nullable("gender", changes.gender)
            .set_nullable("medical_conditions", changes.medical_conditions)
            .set("updated_at", timestamp_now())
            .build_for_id(SINGLETON_ID);
        debug!("Updating profile: {}", sql);
        conn.execute(&sql, rusqlite::params_from_iter(values.iter()))?;

        ensure_profile(&conn)
    }

    async fn settings(&self) -> Result<SettingsRow, RepositoryError> {
        let conn = self.db.connection()?;
        ensure_settings(&conn)
    }

    async fn update_settings(&self, changes: SettingsChanges) -> Result<SettingsRow, RepositoryError> {
        let conn = self.db.connection()?;
        ensure_settings(&conn)?;

        let (sql, values) = UpdateQuery::new("app_settings")
            .set_if("pressure_unit", changes.pressure_unit)
            .set_if("notifications_enabled", changes.notifications_enabled)
            .set_if("abnormal_alert_enabled", changes.abnormal_alert_enabled)
            .set_if("bp_threshold_high_systolic", changes.bp_threshold_high_systolic)
            .set_if("bp_threshold_high_diastolic", changes.bp_threshold_high_diastolic)
            .set_if("bp_threshold_low_systolic", changes.bp_threshold_low_systolic)
            .set_if("bp_threshold_low_diastolic", changes.bp_threshold_low_diastolic)
            .set_if("dark_mode", changes.dark_mode)
            .set_if("cloud_sync_enabled", changes.cloud_sync_enabled)
            .set("updated_at", timestamp_now())
            .build_for_id(SINGLETON_ID);
        debug!("Updating settings: {}", sql);
        conn.execute(&sql, rusqlite::params_from_iter(values.iter()))?;

        ensure_settings(&conn)
    }
}
