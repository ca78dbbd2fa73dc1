// Public entities for the BP Tracker API
// Request and response shapes at the HTTP boundary, converted to and from domain types

// Error responses and shared serde helpers
pub mod common;

// Blood pressure records, statistics and classification
pub mod records;

// Medication and measurement reminders
pub mod reminders;

// Profile, settings and threshold
pub mod settings;

// Photos of the cuff display
pub mod images;
