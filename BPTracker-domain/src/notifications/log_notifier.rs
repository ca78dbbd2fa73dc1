use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{NotificationContent, NotificationError, Notifier, WeeklyTrigger};

/// A notification held by [`LogNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledNotification {
    pub id: String,
    pub content: NotificationContent,
    pub trigger: WeeklyTrigger,
}

/// Notifier that keeps its schedule in memory and reports through tracing.
///
/// Permission can be revoked to reproduce a user who declined notifications.
#[derive(Debug)]
pub struct LogNotifier {
    scheduled: Mutex<HashMap<String, ScheduledNotification>>,
    delivered: Mutex<Vec<NotificationContent>>,
    permission_granted: AtomicBool,
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LogNotifier {
    pub fn new() -> Self {
        Self {
            scheduled: Mutex::new(HashMap::new()),
            delivered: Mutex::new(Vec::new()),
            permission_granted: AtomicBool::new(true),
        }
    }

    pub fn set_permission(&self, granted: bool) {
        self.permission_granted.store(granted, Ordering::SeqCst);
    }

    /// Every pending weekly notification, ordered by id
    pub fn scheduled(&self) -> Vec<ScheduledNotification> {
        let mut pending: Vec<_> = match self.scheduled.lock() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => Vec::new(),
        };
        pending.sort_by(|a, b| a.id.cmp(&b.id));
        pending
    }

    pub fn is_scheduled(&self, external_id: &str) -> bool {
        self.scheduled
            .lock()
            .map(|map| map.contains_key(external_id))
            .unwrap_or(false)
    }

    /// Notifications delivered immediately, oldest first
    pub fn delivered(&self) -> Vec<NotificationContent> {
        self.delivered.lock().map(|list| list.clone()).unwrap_or_default()
    }

    fn ensure_permission(&self) -> Result<(), NotificationError> {
        if self.permission_granted.load(Ordering::SeqCst) {
            Ok(())
        } else {
            warn!("Notification permission has not been granted");
            Err(NotificationError::PermissionDenied)
        }
    }
}

fn lock_failed<T>(_: T) -> NotificationError {
    NotificationError::Failed("notification state lock poisoned".to_string())
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn schedule_weekly(
        &self,
        content: &NotificationContent,
        trigger: WeeklyTrigger,
    ) -> Result<String, NotificationError> {
        self.ensure_permission()?;

        let id = Uuid::new_v4().to_string();
        info!(
            "Scheduled weekly notification {} on weekday {} at {:02}:{:02}: {}",
            id, trigger.weekday, trigger.hour, trigger.minute, content.title
        );

        let mut scheduled = self.scheduled.lock().map_err(lock_failed)?;
        scheduled.insert(
            id.clone(),
            ScheduledNotification {
                id: id.clone(),
                content: content.clone(),
                trigger,
            },
        );
        Ok(id)
    }

    async fn cancel(&self, external_id: &str) -> Result<(), NotificationError> {
        let mut scheduled = self.scheduled.lock().map_err(lock_failed)?;
        if scheduled.remove(external_id).is_some() {
            info!("Cancelled notification {}", external_id);
        } else {
            debug!("Notification {} was not scheduled", external_id);
        }
        Ok(())
    }

    async fn cancel_all(&self) -> Result<(), NotificationError> {
        let mut scheduled = self.scheduled.lock().map_err(lock_failed)?;
        info!("Cancelling {} scheduled notifications", scheduled.len());
        scheduled.clear();
        Ok(())
    }

    async fn fire_immediate(&self, content: &NotificationContent) -> Result<String, NotificationError> {
        self.ensure_permission()?;

        let id = Uuid::new_v4().to_string();
        info!("Notification {}: {} - {}", id, content.title, content.body);
        self.delivered.lock().map_err(lock_failed)?.push(content.clone());
        Ok(id)
    }
}
