mod inmemory;
mod local;

use crate::services::listeners::ListenerId;
use chrono::{DateTime, Utc};
pub use inmemory::InMemoryNotificationPlatform;
pub use local::LocalNotificationPlatform;
use rxminder_domain::{NotificationPayload, NotificationResponse, PresentationPolicy};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// A notification waiting for its fire instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingNotification {
    pub handle: String,
    pub payload: NotificationPayload,
    pub fire_at: DateTime<Utc>,
}

/// The platform's local notification subsystem.
///
/// Notifications scheduled here fire at their instant even when the app
/// is not running. The native shell forwards notification taps into the
/// bridge with `dispatch_response`, which fans them out to the listeners.
#[async_trait::async_trait]
pub trait INotificationPlatform: Send + Sync {
    /// How notifications are presented while the app is in the foreground
    async fn set_presentation_policy(&self, policy: PresentationPolicy) -> anyhow::Result<()>;
    /// Schedules a notification at an absolute instant and returns the
    /// handle the platform assigned to it
    async fn schedule(
        &self,
        payload: &NotificationPayload,
        fire_at: DateTime<Utc>,
    ) -> anyhow::Result<String>;
    async fn cancel(&self, handle: &str) -> anyhow::Result<()>;
    async fn pending(&self) -> anyhow::Result<Vec<PendingNotification>>;
    fn add_response_listener(&self, sender: UnboundedSender<NotificationResponse>) -> ListenerId;
    fn remove_response_listener(&self, id: ListenerId) -> bool;
    /// The user tapped the notification with the given handle
    async fn dispatch_response(&self, handle: &str) -> anyhow::Result<()>;
}
