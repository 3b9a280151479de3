use chrono::{DateTime, Utc};
use rxminder_domain::NotificationPayload;
use rxminder_infra::INotificationPlatform;
use tracing::error;

/// Thin wrapper around the platform's "notify at an absolute instant"
/// primitive. A rejected notification is reported as `None` so that a
/// single failure never takes a whole batch down.
pub struct LocalSchedulerAdapter<'a> {
    platform: &'a dyn INotificationPlatform,
}

impl<'a> LocalSchedulerAdapter<'a> {
    pub fn new(platform: &'a dyn INotificationPlatform) -> Self {
        Self { platform }
    }

    pub async fn schedule(
        &self,
        payload: &NotificationPayload,
        fire_at: DateTime<Utc>,
    ) -> Option<String> {
        match self.platform.schedule(payload, fire_at).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!(
                    "Unable to schedule notification for reminder {:?} at {}. Err: {:?}",
                    payload.data.reminder_id, fire_at, e
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxminder_domain::{MedicationReminder, NotificationPayload};
    use rxminder_infra::InMemoryNotificationPlatform;

    fn payload(med_name: &str) -> NotificationPayload {
        NotificationPayload::new(&MedicationReminder {
            reminder_id: Some(1),
            trigger_time: "2030-01-01T08:00:00".into(),
            med_name: med_name.into(),
            dosage: None,
            message: None,
        })
    }

    #[tokio::test]
    async fn passes_instant_through() {
        let platform = InMemoryNotificationPlatform::new();
        let adapter = LocalSchedulerAdapter::new(&platform);
        let fire_at = Utc::now();

        let handle = adapter.schedule(&payload("Aspirin"), fire_at).await;
        assert!(handle.is_some());
        let scheduled = platform.scheduled();
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].fire_at, fire_at);
        assert_eq!(Some(scheduled[0].handle.clone()), handle);
    }

    #[tokio::test]
    async fn converts_platform_errors() {
        let platform = InMemoryNotificationPlatform::new();
        platform.fail_for_med_name("Aspirin");
        let adapter = LocalSchedulerAdapter::new(&platform);

        assert!(adapter.schedule(&payload("Aspirin"), Utc::now()).await.is_none());
        assert_eq!(platform.schedule_calls(), 1);
    }
}
