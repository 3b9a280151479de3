use super::IReminderSource;
use reqwest::Client;
use rxminder_domain::UserId;
use serde_json::Value;
use std::time::Duration;
use tracing::error;
use url::Url;

/// Fetches the reminder list from the Rxminder backend
pub struct HttpReminderSource {
    client: Client,
    base_url: Url,
}

impl HttpReminderSource {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    fn reminders_url(&self, user_id: UserId) -> anyhow::Result<Url> {
        let user_id = user_id.to_string();
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Reminder source url {} cannot be a base", self.base_url))?
            .pop_if_empty()
            .extend(&["users", user_id.as_str(), "reminders"]);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl IReminderSource for HttpReminderSource {
    async fn fetch_reminders(&self, user_id: UserId) -> anyhow::Result<Value> {
        let url = self.reminders_url(user_id)?;
        let res = match self.client.get(url).send().await {
            Ok(res) => res,
            Err(e) => {
                error!(
                    "[Network Error] Reminder source GET error. Error message: {:?}",
                    e
                );
                return Err(anyhow::Error::new(e));
            }
        };
        let res = res.error_for_status().map_err(|e| {
            error!(
                "[Unexpected Response] Reminder source GET error. Error message: {:?}",
                e
            );
            anyhow::Error::new(e)
        })?;
        res.json::<Value>().await.map_err(|e| {
            error!(
                "[Unexpected Response] Reminder source returned invalid json. Error message: {:?}",
                e
            );
            anyhow::Error::new(e)
        })
    }
}
