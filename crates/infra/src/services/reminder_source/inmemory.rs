use super::IReminderSource;
use rxminder_domain::UserId;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Serves reminder lists set by the caller. Users without a list get an
/// empty one.
pub struct InMemoryReminderSource {
    reminders: Mutex<HashMap<UserId, Value>>,
    unreachable: AtomicBool,
    fetch_count: AtomicUsize,
}

impl InMemoryReminderSource {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(HashMap::new()),
            unreachable: AtomicBool::new(false),
            fetch_count: AtomicUsize::new(0),
        }
    }

    pub fn set_reminders(&self, user_id: UserId, reminders: Value) {
        if let Ok(mut lookup) = self.reminders.lock() {
            lookup.insert(user_id, reminders);
        }
    }

    /// Every fetch fails while the source is unreachable
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryReminderSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IReminderSource for InMemoryReminderSource {
    async fn fetch_reminders(&self, user_id: UserId) -> anyhow::Result<Value> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("Reminder source is unreachable"));
        }
        let lookup = self
            .reminders
            .lock()
            .map_err(|_| anyhow::anyhow!("Inmemory reminder source is poisoned"))?;
        Ok(lookup
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new())))
    }
}
