use crate::reminder::ReminderId;
use serde::{Deserialize, Serialize};

/// Namespace of the mapping keys in the key value storage
pub const MAPPING_KEY_PREFIX: &str = "notif:";

/// Links a server reminder to the local notification scheduled for it.
/// A record is created once and never changed, it is only ever removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingRecord {
    pub reminder_id: ReminderId,
    /// Opaque handle assigned by the notification platform
    pub handle: String,
}

pub fn mapping_key(reminder_id: ReminderId) -> String {
    format!("{}{}", MAPPING_KEY_PREFIX, reminder_id)
}

/// Inverse of `mapping_key`. Keys outside of the namespace give `None`.
pub fn parse_mapping_key(key: &str) -> Option<ReminderId> {
    key.strip_prefix(MAPPING_KEY_PREFIX)?.parse().ok()
}
