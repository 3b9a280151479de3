use crate::services::listeners::{ListenerId, Listeners};
use rxminder_domain::AppState;
use tokio::sync::mpsc::UnboundedSender;

/// Lifecycle events of the host application. The native shell forwards
/// state changes into the bridge with `dispatch_state`.
pub trait IAppLifecycle: Send + Sync {
    fn add_state_listener(&self, sender: UnboundedSender<AppState>) -> ListenerId;
    fn remove_state_listener(&self, id: ListenerId) -> bool;
    /// Returns the number of listeners that were informed
    fn dispatch_state(&self, state: AppState) -> usize;
}

pub struct LocalAppLifecycle {
    listeners: Listeners<AppState>,
}

impl LocalAppLifecycle {
    pub fn new() -> Self {
        Self {
            listeners: Listeners::new(),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for LocalAppLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl IAppLifecycle for LocalAppLifecycle {
    fn add_state_listener(&self, sender: UnboundedSender<AppState>) -> ListenerId {
        self.listeners.add(sender)
    }

    fn remove_state_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn dispatch_state(&self, state: AppState) -> usize {
        self.listeners.broadcast(state)
    }
}
