//! Health checks for the loopback API

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::warn;

use bp_tracker_data::database::{Database, MIGRATIONS};

/// System health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemStatus {
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl ComponentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentStatus::Healthy => "healthy",
            ComponentStatus::Degraded => "degraded",
            ComponentStatus::Unhealthy => "unhealthy",
        }
    }
}

impl SystemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SystemStatus::Healthy => "healthy",
            SystemStatus::Degraded => "degraded",
            SystemStatus::Unhealthy => "unhealthy",
        }
    }
}

/// A health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    pub status: ComponentStatus,
    pub details: Option<String>,
}

/// Overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    pub status: SystemStatus,
    /// Component name to its health
    pub components: HashMap<String, HealthComponent>,
}

#[async_trait]
pub trait HealthServiceTrait: Send + Sync {
    async fn get_system_health(&self) -> SystemHealth;

    /// `Ok(true)` when fully operational, `Ok(false)` when reachable but degraded,
    /// `Err` when unreachable
    async fn check_database_status(&self) -> Result<bool, String>;
}

#[derive(Debug, Clone)]
pub struct HealthService {
    db: Database,
}

impl HealthService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HealthServiceTrait for HealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let db_component = match self.check_database_status().await {
            Ok(true) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some(self.db.describe()),
            },
            Ok(false) => HealthComponent {
                status: ComponentStatus::Degraded,
                details: Some("Database is reachable but its schema is behind".to_string()),
            },
            Err(e) => HealthComponent {
                status: ComponentStatus::Unhealthy,
                details: Some(e),
            },
        };

        let status = match db_component.status {
            ComponentStatus::Unhealthy => SystemStatus::Unhealthy,
            ComponentStatus::Degraded => SystemStatus::Degraded,
            ComponentStatus::Healthy => SystemStatus::Healthy,
        };

        SystemHealth {
            status,
            components: [("database".to_string(), db_component)].into_iter().collect(),
        }
    }

    async fn check_database_status(&self) -> Result<bool, String> {
        if let Err(e) = self.db.ping() {
            warn!("Database health check failed: {}", e);
            return Err(format!("Database connection error: {}", e));
        }

        let latest = MIGRATIONS.iter().map(|m| m.version).max().unwrap_or(0);
        match self.db.schema_version() {
            Ok(version) => Ok(version >= latest),
            Err(e) => Err(format!("Schema version unavailable: {}", e)),
        }
    }
}
