// Forward-only schema migrations with a version ledger

mod sqlite;

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{error, info};

use super::DatabaseError;
use crate::models::format_timestamp;

/// One schema step. Statements run in order; the version is recorded only when all succeed.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub statements: &'static [&'static str],
}

const INITIAL_SCHEMA: Migration = Migration {
    version: 1,
    name: "initial_schema",
    statements: sqlite::INITIAL_STATEMENTS,
};

/// Every migration the application knows about, oldest first
pub const MIGRATIONS: &[Migration] = &[INITIAL_SCHEMA];

/// Highest recorded version, 0 when the ledger does not exist yet
pub fn current_version(conn: &Connection) -> i64 {
    let ledger_exists = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'migrations'",
            [],
            |row| row.get::<_, i64>(0),
        )
        .unwrap_or(0)
        > 0;

    if !ledger_exists {
        return 0;
    }

    conn.query_row("SELECT MAX(version) FROM migrations", [], |row| {
        row.get::<_, Option<i64>>(0)
    })
    .ok()
    .flatten()
    .unwrap_or(0)
}

/// Run the default migration list
pub fn run_migrations(conn: &Connection) -> Result<i64, DatabaseError> {
    run_pending(conn, MIGRATIONS)
}

/// Run every migration newer than the current version and return the resulting version.
///
/// A migration whose statements fail part-way is not recorded, so it is retried on the
/// next start. Statements that already succeeded inside it are not rolled back.
pub fn run_pending(conn: &Connection, migrations: &[Migration]) -> Result<i64, DatabaseError> {
    let start = current_version(conn);
    info!("Current database version: {}", start);

    let mut version = start;
    for migration in migrations.iter().filter(|m| m.version > start) {
        info!("Running migration {}: {}", migration.version, migration.name);

        for statement in migration.statements {
            conn.execute_batch(statement).map_err(|e| {
                error!("Migration {} failed: {}", migration.version, e);
                DatabaseError::MigrationError {
                    version: migration.version,
                    name: migration.name.to_string(),
                    reason: e.to_string(),
                }
            })?;
        }

        conn.execute(
            "INSERT INTO migrations (version, name, executed_at) VALUES (?1, ?2, ?3)",
            params![migration.version, migration.name, format_timestamp(&Utc::now())],
        )
        .map_err(|e| DatabaseError::MigrationError {
            version: migration.version,
            name: migration.name.to_string(),
            reason: format!("could not record migration: {}", e),
        })?;

        version = migration.version;
        info!("Migration {} completed", migration.version);
    }

    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_count(conn: &Connection) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_fresh_database_reports_version_zero() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(current_version(&conn), 0);
    }

    #[test]
    fn test_initial_schema_creates_tables_and_defaults() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_migrations(&conn).unwrap(), 1);
        assert_eq!(table_count(&conn), 6);

        let settings: i64 = conn
            .query_row("SELECT COUNT(*) FROM app_settings WHERE id = 1", [], |row| row.get(0))
            .unwrap();
        let profiles: i64 = conn
            .query_row("SELECT COUNT(*) FROM user_profile WHERE id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!((settings, profiles), (1, 1));

        let name: String = conn
            .query_row("SELECT name FROM migrations WHERE version = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(name, "initial_schema");
    }

    #[test]
    fn test_migrations_are_applied_once() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(run_migrations(&conn).unwrap(), 1);

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_failed_migration_is_not_recorded_and_not_rolled_back() {
        const BROKEN: &[Migration] = &[
            INITIAL_SCHEMA,
            Migration {
                version: 2,
                name: "add_blood_type_column",
                statements: &[
                    "ALTER TABLE user_profile ADD COLUMN blood_type TEXT;",
                    "ALTER TABLE no_such_table ADD COLUMN oops TEXT;",
                ],
            },
        ];

        let conn = Connection::open_in_memory().unwrap();
        let err = run_pending(&conn, BROKEN).unwrap_err();
        assert!(matches!(err, DatabaseError::MigrationError { version: 2, .. }));

        // Version 2 was not recorded, so it will be retried on the next start
        assert_eq!(current_version(&conn), 1);

        // ...but its first statement already took effect
        let has_column = conn.prepare("SELECT blood_type FROM user_profile").is_ok();
        assert!(has_column);
    }

    #[test]
    fn test_later_migration_runs_on_existing_database() {
        const NEXT: &[Migration] = &[
            INITIAL_SCHEMA,
            Migration {
                version: 2,
                name: "add_blood_type_column",
                statements: &["ALTER TABLE user_profile ADD COLUMN blood_type TEXT;"],
            },
        ];

        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(run_pending(&conn, NEXT).unwrap(), 2);
        assert_eq!(current_version(&conn), 2);
    }
}
