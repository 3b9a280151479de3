mod http;
mod inmemory;

pub use http::HttpReminderSource;
pub use inmemory::InMemoryReminderSource;
use rxminder_domain::UserId;
use serde_json::Value;

/// The backend that declares which reminders exist for a user.
///
/// The response is returned untyped because the server data is not
/// trusted, see `ReminderEntry::list_from_value`.
#[async_trait::async_trait]
pub trait IReminderSource: Send + Sync {
    async fn fetch_reminders(&self, user_id: UserId) -> anyhow::Result<Value>;
}
