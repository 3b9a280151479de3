use rxminder_domain::UserId;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the host api to run on
    pub port: usize,
    /// The signed in user whose reminders are kept in sync. When absent
    /// no trigger occasions are listened to.
    pub user_id: Option<UserId>,
    /// Base url of the backend serving the reminder lists
    pub reminder_source_url: String,
    /// Sqlite connection string for the notification mappings. When absent
    /// the mappings only live for the lifetime of the process.
    pub database_url: Option<String>,
    /// Cancel local notifications whose reminder is no longer returned by
    /// the server. Reconciliation is additive only when this is off.
    pub prune_orphaned_notifications: bool,
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    pub fn new() -> Self {
        let default_port = 5000;
        let port = match std::env::var("PORT") {
            Ok(port) => match port.parse::<usize>() {
                Ok(port) => port,
                Err(_) => {
                    warn!(
                        "The given PORT: {} is not valid, falling back to the default port: {}.",
                        port, default_port
                    );
                    default_port
                }
            },
            Err(_) => default_port,
        };

        let user_id = match std::env::var("RXMINDER_USER_ID") {
            Ok(id) => match id.parse::<UserId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!(
                        "The given RXMINDER_USER_ID: {} is not a valid user id. Reminders will not be synced.",
                        id
                    );
                    None
                }
            },
            Err(_) => {
                info!("Did not find RXMINDER_USER_ID environment variable. Reminders will not be synced.");
                None
            }
        };

        let default_url = "http://localhost:8000";
        let reminder_source_url =
            std::env::var("RXMINDER_API_URL").unwrap_or_else(|_| default_url.into());

        let database_url = std::env::var("DATABASE_URL").ok();
        if database_url.is_none() {
            info!("Did not find DATABASE_URL environment variable. Notification mappings will be kept in memory.");
        }

        let prune_orphaned_notifications = match std::env::var("RXMINDER_PRUNE_ORPHANS") {
            Ok(flag) => parse_flag(&flag).unwrap_or_else(|| {
                warn!(
                    "The given RXMINDER_PRUNE_ORPHANS: {} is not a valid flag, falling back to false.",
                    flag
                );
                false
            }),
            Err(_) => false,
        };

        Self {
            port,
            user_id,
            reminder_source_url,
            database_url,
            prune_orphaned_notifications,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
