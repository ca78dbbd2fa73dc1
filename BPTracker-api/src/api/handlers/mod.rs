pub mod health;
pub mod images;
pub mod records;
pub mod reminders;
pub mod settings;

pub use health::health_check;
