// Domain entities and value objects
pub mod conversions;
pub mod filters;
pub mod records;
pub mod reminders;
pub mod settings;
pub mod statistics;
pub mod status;

// Re-export common types for easier imports
pub use filters::{DateRange, DateRangePreset, RecordFilter};
pub use records::{BPRecord, BPRecordInput, BPRecordPatch};
pub use reminders::{describe_days, parse_time, Reminder, ReminderInput, ReminderKind, ReminderPatch, ALL_DAYS};
pub use settings::{AppSettings, AppSettingsPatch, BPThreshold, DarkMode, Gender, UserProfile, UserProfilePatch};
pub use statistics::BPStatistics;
pub use status::{BPStatus, BPStatusInfo};
