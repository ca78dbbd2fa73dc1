use thiserror::Error;

// Database modules
pub mod connection;
pub mod migrations;

// Re-export database connection types
pub use connection::{Database, DatabaseConfig, DATABASE_NAME};
pub use migrations::{Migration, MIGRATIONS};

/// Database error enum
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Migration error; the failed version is not recorded in the ledger
    #[error("Migration {version} ({name}) failed: {reason}")]
    MigrationError {
        version: i64,
        name: String,
        reason: String,
    },

    /// I/O error while preparing the database location
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
