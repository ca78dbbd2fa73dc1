// BP Tracker Domain
// This crate contains the business logic: classification, validation, filtering,
// statistics and the services that drive the stores and the notifier

// Domain entities
pub mod entities;

// Services that implement business logic
pub mod services;

// Notification port and reminder scheduling
pub mod notifications;

// Health checks and system status
pub mod health;

// Service error taxonomy
pub mod errors;

// Re-export the database module from the data crate for convenience
pub use bp_tracker_data::database;

pub use errors::ServiceError;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
