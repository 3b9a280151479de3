use super::{INotificationPlatform, PendingNotification};
use crate::services::listeners::{ListenerId, Listeners};
use chrono::{DateTime, Utc};
use rxminder_domain::{NotificationPayload, NotificationResponse, PresentationPolicy};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Default)]
struct InMemoryPlatformState {
    policies: Vec<PresentationPolicy>,
    scheduled: Vec<PendingNotification>,
    cancelled: Vec<String>,
    failing_med_names: HashSet<String>,
    fail_cancel: bool,
}

/// Records every call and never fires anything. Used for testing.
pub struct InMemoryNotificationPlatform {
    state: Mutex<InMemoryPlatformState>,
    schedule_calls: AtomicUsize,
    listeners: Listeners<NotificationResponse>,
}

impl InMemoryNotificationPlatform {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(InMemoryPlatformState::default()),
            schedule_calls: AtomicUsize::new(0),
            listeners: Listeners::new(),
        }
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, InMemoryPlatformState>> {
        self.state
            .lock()
            .map_err(|_| anyhow::anyhow!("Inmemory notification state is poisoned"))
    }

    /// Makes `schedule` fail for notifications about the given medication
    pub fn fail_for_med_name(&self, med_name: &str) {
        if let Ok(mut state) = self.lock() {
            state.failing_med_names.insert(med_name.to_string());
        }
    }

    pub fn set_fail_cancel(&self, fail: bool) {
        if let Ok(mut state) = self.lock() {
            state.fail_cancel = fail;
        }
    }

    /// Number of `schedule` calls including the failed ones
    pub fn schedule_calls(&self) -> usize {
        self.schedule_calls.load(Ordering::SeqCst)
    }

    /// Successfully scheduled notifications that were not cancelled
    pub fn scheduled(&self) -> Vec<PendingNotification> {
        self.lock()
            .map(|state| {
                state
                    .scheduled
                    .iter()
                    .filter(|n| !state.cancelled.contains(&n.handle))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.lock()
            .map(|state| state.cancelled.clone())
            .unwrap_or_default()
    }

    pub fn presentation_policies(&self) -> Vec<PresentationPolicy> {
        self.lock()
            .map(|state| state.policies.clone())
            .unwrap_or_default()
    }

    pub fn response_listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for InMemoryNotificationPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotificationPlatform for InMemoryNotificationPlatform {
    async fn set_presentation_policy(&self, policy: PresentationPolicy) -> anyhow::Result<()> {
        self.lock()?.policies.push(policy);
        Ok(())
    }

    async fn schedule(
        &self,
        payload: &NotificationPayload,
        fire_at: DateTime<Utc>,
    ) -> anyhow::Result<String> {
        let call = self.schedule_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.lock()?;
        if state.failing_med_names.contains(&payload.data.med_name) {
            return Err(anyhow::anyhow!(
                "Notification for {} was rejected",
                payload.data.med_name
            ));
        }
        let handle = format!("local-notification-{}", call);
        state.scheduled.push(PendingNotification {
            handle: handle.clone(),
            payload: payload.clone(),
            fire_at,
        });
        Ok(handle)
    }

    async fn cancel(&self, handle: &str) -> anyhow::Result<()> {
        let mut state = self.lock()?;
        if state.fail_cancel {
            return Err(anyhow::anyhow!("Unable to cancel notification {}", handle));
        }
        state.cancelled.push(handle.to_string());
        Ok(())
    }

    async fn pending(&self) -> anyhow::Result<Vec<PendingNotification>> {
        Ok(self.scheduled())
    }

    fn add_response_listener(&self, sender: UnboundedSender<NotificationResponse>) -> ListenerId {
        self.listeners.add(sender)
    }

    fn remove_response_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    async fn dispatch_response(&self, handle: &str) -> anyhow::Result<()> {
        let data = self
            .lock()?
            .scheduled
            .iter()
            .find(|n| n.handle == handle)
            .map(|n| n.payload.data.clone());
        match data {
            Some(data) => {
                self.listeners.broadcast(NotificationResponse {
                    handle: handle.to_string(),
                    data,
                });
                Ok(())
            }
            None => Err(anyhow::anyhow!("Unknown notification handle: {}", handle)),
        }
    }
}
