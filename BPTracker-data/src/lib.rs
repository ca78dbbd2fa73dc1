// BP Tracker Data
// This crate handles persistence: the SQLite handle, migrations and repositories

// Database connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;

// Files stored next to the database (reading photos)
pub mod files;
