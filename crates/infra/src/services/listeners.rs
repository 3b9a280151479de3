use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;

/// Identifies a registered listener so that it can be removed again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registry of channel listeners that are all sent every event
pub struct Listeners<T> {
    next_id: AtomicU64,
    senders: Mutex<Vec<(ListenerId, UnboundedSender<T>)>>,
}

impl<T: Clone> Listeners<T> {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            senders: Mutex::new(Vec::new()),
        }
    }

    pub fn add(&self, sender: UnboundedSender<T>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        if let Ok(mut senders) = self.senders.lock() {
            senders.push((id, sender));
        }
        id
    }

    /// Returns false if there was no listener with the given id
    pub fn remove(&self, id: ListenerId) -> bool {
        match self.senders.lock() {
            Ok(mut senders) => {
                let len = senders.len();
                senders.retain(|(listener_id, _)| *listener_id != id);
                senders.len() != len
            }
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.senders.lock().map(|senders| senders.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sends the event to every listener and forgets the ones whose
    /// receiving end is gone. Returns the number of listeners reached.
    pub fn broadcast(&self, event: T) -> usize {
        match self.senders.lock() {
            Ok(mut senders) => {
                senders.retain(|(_, sender)| sender.send(event.clone()).is_ok());
                senders.len()
            }
            Err(_) => 0,
        }
    }
}

impl<T: Clone> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}
