// Domain services
// Pure rules (classification, validation, date ranges, statistics) and the
// services that drive the stores and the notifier.

pub mod classification;
pub mod date_range;
pub mod statistics;
pub mod validation;

pub mod records;
pub mod reminders;
pub mod settings;

// Re-export service traits and implementations
pub use records::{RecordService, RecordServiceTrait};
pub use reminders::{ReminderService, ReminderServiceTrait};
pub use settings::{SettingsService, SettingsServiceTrait};
pub use validation::{ValidationField, ValidationReport};
