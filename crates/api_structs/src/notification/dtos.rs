use rxminder_domain::{MappingRecord, ReminderId};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledReminderDTO {
    pub reminder_id: ReminderId,
    pub handle: String,
}

impl ScheduledReminderDTO {
    pub fn new(record: MappingRecord) -> Self {
        Self {
            reminder_id: record.reminder_id,
            handle: record.handle,
        }
    }
}
