use super::{INotificationPlatform, PendingNotification};
use crate::repos::{IKVRepo, InMemoryKVRepo, KeyValue};
use crate::services::listeners::{ListenerId, Listeners};
use chrono::{DateTime, Utc};
use rxminder_domain::{NotificationPayload, NotificationResponse, PresentationPolicy};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

const PENDING_KEY_PREFIX: &str = "pending:";
/// Number of fired notifications kept around to be tapped
const MAX_DELIVERED: usize = 100;

fn pending_key(handle: &str) -> String {
    format!("{}{}", PENDING_KEY_PREFIX, handle)
}

#[derive(Default)]
struct LocalPlatformState {
    policy: Option<PresentationPolicy>,
    pending: HashMap<String, (PendingNotification, Option<JoinHandle<()>>)>,
    /// Oldest first
    delivered: VecDeque<(String, NotificationPayload)>,
}

/// Notification subsystem of the device the host binary runs on.
///
/// Every pending notification has a timer task that delivers it at its
/// fire instant. Delivering means logging it with the installed
/// presentation policy and remembering it so that it can be tapped.
/// Pending notifications are written to storage, so that `restore` can
/// pick them up again with the same handles after a restart.
#[derive(Clone)]
pub struct LocalNotificationPlatform {
    state: Arc<Mutex<LocalPlatformState>>,
    storage: Arc<dyn IKVRepo>,
    listeners: Arc<Listeners<NotificationResponse>>,
}

impl LocalNotificationPlatform {
    /// Platform whose pending notifications die with the process
    pub fn new() -> Self {
        Self::with_storage(Arc::new(InMemoryKVRepo::new()))
    }

    fn with_storage(storage: Arc<dyn IKVRepo>) -> Self {
        Self {
            state: Arc::new(Mutex::new(LocalPlatformState::default())),
            storage,
            listeners: Arc::new(Listeners::new()),
        }
    }

    /// Reloads the notifications a previous process left pending and
    /// restarts their timers. The ones that became due in the meantime
    /// are delivered right away.
    pub async fn restore(storage: Arc<dyn IKVRepo>) -> anyhow::Result<Self> {
        let platform = Self::with_storage(storage);
        let mut restored = 0;
        for kv in platform.storage.find_by_prefix(PENDING_KEY_PREFIX).await? {
            match serde_json::from_str::<PendingNotification>(&kv.value) {
                Ok(notification) => {
                    platform.start_timer(notification)?;
                    restored += 1;
                }
                Err(e) => warn!(
                    "Unable to read pending notification {}. Err: {:?}",
                    kv.key, e
                ),
            }
        }
        info!("Restored {} pending notifications", restored);

        Ok(platform)
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, LocalPlatformState>> {
        self.state
            .lock()
            .map_err(|_| anyhow::anyhow!("Local notification state is poisoned"))
    }

    /// Handles of the notifications that already fired, oldest first
    pub fn delivered(&self) -> Vec<String> {
        self.lock()
            .map(|state| {
                state
                    .delivered
                    .iter()
                    .map(|(handle, _)| handle.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn start_timer(&self, notification: PendingNotification) -> anyhow::Result<()> {
        let handle = notification.handle.clone();
        let delay = (notification.fire_at - Utc::now())
            .to_std()
            .unwrap_or_default();
        // Registered before the timer starts so that an instant in the
        // past is still delivered
        self.lock()?
            .pending
            .insert(handle.clone(), (notification, None));

        let platform = self.clone();
        let timer_handle = handle.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            platform.deliver(&timer_handle).await;
        });

        if let Some((_, slot)) = self.lock()?.pending.get_mut(&handle) {
            *slot = Some(timer);
        }
        Ok(())
    }

    /// Moves the notification from pending to delivered. Returns false
    /// when it was cancelled while the timer was running.
    fn mark_delivered(&self, handle: &str) -> anyhow::Result<bool> {
        let mut state = self.lock()?;
        let (notification, _) = match state.pending.remove(handle) {
            Some(pending) => pending,
            None => return Ok(false),
        };
        let policy = state.policy.unwrap_or_default();
        info!(
            handle = handle,
            title = notification.payload.title.as_str(),
            body = notification.payload.body.as_str(),
            show_alert = policy.show_alert,
            play_sound = policy.play_sound,
            set_badge = policy.set_badge,
            "Delivering notification"
        );
        state
            .delivered
            .push_back((handle.to_string(), notification.payload));
        while state.delivered.len() > MAX_DELIVERED {
            state.delivered.pop_front();
        }
        Ok(true)
    }

    async fn deliver(&self, handle: &str) {
        match self.mark_delivered(handle) {
            Ok(true) => self.forget(handle).await,
            Ok(false) => (),
            Err(e) => warn!("Unable to deliver notification {}. Err: {:?}", handle, e),
        }
    }

    async fn forget(&self, handle: &str) {
        if let Err(e) = self.storage.delete(&pending_key(handle)).await {
            warn!(
                "Unable to remove stored pending notification {}. Err: {:?}",
                handle, e
            );
        }
    }
}

impl Default for LocalNotificationPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotificationPlatform for LocalNotificationPlatform {
    async fn set_presentation_policy(&self, policy: PresentationPolicy) -> anyhow::Result<()> {
        self.lock()?.policy = Some(policy);
        Ok(())
    }

    async fn schedule(
        &self,
        payload: &NotificationPayload,
        fire_at: DateTime<Utc>,
    ) -> anyhow::Result<String> {
        let handle = Uuid::new_v4().to_string();
        let notification = PendingNotification {
            handle: handle.clone(),
            payload: payload.clone(),
            fire_at,
        };
        let value = serde_json::to_string(&notification)?;
        self.storage
            .set(&KeyValue::new(pending_key(&handle), value))
            .await?;
        self.start_timer(notification)?;

        Ok(handle)
    }

    async fn cancel(&self, handle: &str) -> anyhow::Result<()> {
        let was_pending = {
            let mut state = self.lock()?;
            match state.pending.remove(handle) {
                Some((_, timer)) => {
                    if let Some(timer) = timer {
                        timer.abort();
                    }
                    true
                }
                None => {
                    // Already fired, cancelling removes it from the notification center
                    state.delivered.retain(|(delivered, _)| delivered != handle);
                    false
                }
            }
        };
        if was_pending {
            self.storage.delete(&pending_key(handle)).await?;
        }
        Ok(())
    }

    async fn pending(&self) -> anyhow::Result<Vec<PendingNotification>> {
        let mut pending = self
            .lock()?
            .pending
            .values()
            .map(|(notification, _)| notification.clone())
            .collect::<Vec<_>>();
        pending.sort_by_key(|n| n.fire_at);
        Ok(pending)
    }

    fn add_response_listener(&self, sender: UnboundedSender<NotificationResponse>) -> ListenerId {
        self.listeners.add(sender)
    }

    fn remove_response_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    async fn dispatch_response(&self, handle: &str) -> anyhow::Result<()> {
        let data = {
            let mut state = self.lock()?;
            // A tapped notification leaves the notification center
            match state.delivered.iter().position(|(h, _)| h == handle) {
                Some(index) => state
                    .delivered
                    .remove(index)
                    .map(|(_, payload)| payload.data),
                None => state
                    .pending
                    .get(handle)
                    .map(|(n, _)| n.payload.data.clone()),
            }
        };
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
