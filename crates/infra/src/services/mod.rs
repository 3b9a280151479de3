mod app_lifecycle;
mod listeners;
mod notification_platform;
mod reminder_source;

pub use app_lifecycle::{IAppLifecycle, LocalAppLifecycle};
pub use listeners::{ListenerId, Listeners};
pub use notification_platform::{
    INotificationPlatform, InMemoryNotificationPlatform, LocalNotificationPlatform,
    PendingNotification,
};
pub use reminder_source::{HttpReminderSource, IReminderSource, InMemoryReminderSource};
use crate::repos::IKVRepo;
use std::sync::Arc;

/// Collaborators outside of the process: the backend and the platform
#[derive(Clone)]
pub struct Services {
    pub reminder_source: Arc<dyn IReminderSource>,
    pub notifications: Arc<dyn INotificationPlatform>,
    pub app_lifecycle: Arc<dyn IAppLifecycle>,
}

impl Services {
    /// Pending notifications are kept in `storage` and restored from it
    pub async fn create_local(
        reminder_source_url: &str,
        storage: Arc<dyn IKVRepo>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            reminder_source: Arc::new(HttpReminderSource::new(reminder_source_url)?),
            notifications: Arc::new(LocalNotificationPlatform::restore(storage).await?),
            app_lifecycle: Arc::new(LocalAppLifecycle::new()),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            reminder_source: Arc::new(InMemoryReminderSource::new()),
            notifications: Arc::new(InMemoryNotificationPlatform::new()),
            app_lifecycle: Arc::new(LocalAppLifecycle::new()),
        }
    }
}
