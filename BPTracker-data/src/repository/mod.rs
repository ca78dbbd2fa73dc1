// Repository module structure
pub mod errors;
pub mod query;
mod in_memory;
mod records;
mod reminders;
mod settings;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use in_memory::InMemoryRecordRepository;
pub use records::{RecordRepositoryTrait, SqliteRecordRepository};
pub use reminders::{ReminderRepositoryTrait, SqliteReminderRepository};
pub use settings::{SettingsRepositoryTrait, SqliteSettingsRepository};
