//! Database connection module for the BP Tracker core
//!
//! The application opens one [`Database`] handle at start-up and passes clones of
//! it into every repository. There is no process-wide pool: dropping the last
//! clone (or calling [`Database::close`]) disposes of the connection.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use tracing::{debug, info};

use super::migrations::{self, Migration, MIGRATIONS};
use super::DatabaseError;

/// File name used when no explicit path is configured
pub const DATABASE_NAME: &str = "bp_tracker.db";

/// Pooled SQLite connection handed out by [`Database::connection`]
pub type SqliteConnection = PooledConnection<SqliteConnectionManager>;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    pub sqlite_path: Option<String>,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: Some(format!("./data/{}", DATABASE_NAME)),
            max_connections: 1,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        let defaults = Self::default();

        let sqlite_path = env::var("DB_SQLITE_PATH").ok().or(defaults.sqlite_path);

        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse::<u32>().map_err(|_| {
                DatabaseError::ConfigError(format!("DB_MAX_CONNECTIONS must be a positive integer, got {raw:?}"))
            })?,
            Err(_) => defaults.max_connections,
        };
        if max_connections == 0 {
            return Err(DatabaseError::ConfigError("DB_MAX_CONNECTIONS must be at least 1".to_string()));
        }

        let timeout_seconds = env::var("DB_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.timeout_seconds);

        info!(
            "Database configuration: path={:?}, max_connections={}, timeout={}s",
            sqlite_path, max_connections, timeout_seconds
        );

        Ok(DatabaseConfig {
            sqlite_path,
            max_connections,
            timeout_seconds,
        })
    }
}

/// Where the database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// SQLite file on disk
    File(PathBuf),
    /// Private in-memory database (tests and ephemeral sessions)
    Memory,
}

impl fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseLocation::File(path) => write!(f, "SQLite database at {}", path.display()),
            DatabaseLocation::Memory => write!(f, "SQLite in-memory database"),
        }
    }
}

/// Explicit database handle shared by the repositories
#[derive(Debug, Clone)]
pub struct Database {
    pool: Arc<r2d2::Pool<SqliteConnectionManager>>,
    location: DatabaseLocation,
}

impl Database {
    /// Open (or create) the configured database file and run pending migrations
    pub fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let path = config
            .sqlite_path
            .clone()
            .unwrap_or_else(|| format!("./data/{}", DATABASE_NAME));
        Self::open_file_with(Path::new(&path), config, MIGRATIONS)
    }

    /// Open a private in-memory database with the full schema
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Self::open_in_memory_with(MIGRATIONS)
    }

    /// Open a file database running the given migration list
    pub fn open_file_with(
        path: &Path,
        config: &DatabaseConfig,
        migration_list: &[Migration],
    ) -> Result<Self, DatabaseError> {
        info!("Initializing SQLite database at: {}", path.display());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
            .with_init(|conn| conn.execute_batch("PRAGMA journal_mode = WAL;"));

        let pool = r2d2::Pool::builder()
            .max_size(config.max_connections.max(1))
            .connection_timeout(Duration::from_secs(config.timeout_seconds))
            .idle_timeout(None)
            .max_lifetime(None)
            .build(manager)?;

        let database = Database {
            pool: Arc::new(pool),
            location: DatabaseLocation::File(path.to_path_buf()),
        };
        database.migrate(migration_list)?;
        Ok(database)
    }

    /// Open an in-memory database running the given migration list
    pub fn open_in_memory_with(migration_list: &[Migration]) -> Result<Self, DatabaseError> {
        debug!("Initializing in-memory SQLite database");

        // Each in-memory connection is its own database, so the pool holds exactly one.
        let pool = r2d2::Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(SqliteConnectionManager::memory())?;

        let database = Database {
            pool: Arc::new(pool),
            location: DatabaseLocation::Memory,
        };
        database.migrate(migration_list)?;
        Ok(database)
    }

    /// Check out the connection
    pub fn connection(&self) -> Result<SqliteConnection, DatabaseError> {
        Ok(self.pool.get()?)
    }

    /// Where this handle points
    pub fn location(&self) -> &DatabaseLocation {
        &self.location
    }

    /// Apply any migrations newer than the recorded schema version
    pub fn migrate(&self, migration_list: &[Migration]) -> Result<i64, DatabaseError> {
        let conn = self.connection()?;
        migrations::run_pending(&conn, migration_list)
    }

    /// Highest migration version recorded in the ledger
    pub fn schema_version(&self) -> Result<i64, DatabaseError> {
        let conn = self.connection()?;
        Ok(migrations::current_version(&conn))
    }

    /// Run a trivial query to confirm the database answers
    pub fn ping(&self) -> Result<(), DatabaseError> {
        let conn = self.connection()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    /// Human readable description used by health reporting
    pub fn describe(&self) -> String {
        let state = self.pool.state();
        format!(
            "{} (connections: active={}, idle={})",
            self.location, state.connections, state.idle_connections
        )
    }

    /// Drop every table and rebuild the schema. Development helper; all data is lost.
    pub fn reset(&self) -> Result<i64, DatabaseError> {
        info!("Resetting database: {}", self.location);
        {
            let conn = self.connection()?;
            conn.execute_batch(
                "DROP TABLE IF EXISTS bp_records;
                 DROP TABLE IF EXISTS medication_reminders;
                 DROP TABLE IF EXISTS measurement_reminders;
                 DROP TABLE IF EXISTS user_profile;
                 DROP TABLE IF EXISTS app_settings;
                 DROP TABLE IF EXISTS migrations;",
            )?;
        }
        self.migrate(MIGRATIONS)
    }

    /// Dispose of the handle. Other clones keep the pool alive until they are dropped too.
    pub fn close(self) {
        info!("Closing database handle: {}", self.location);
        drop(self);
    }
}
