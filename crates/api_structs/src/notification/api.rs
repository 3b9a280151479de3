use crate::dtos::ScheduledReminderDTO;
use rxminder_domain::{MappingRecord, ReminderId};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledReminderResponse {
    pub notification: ScheduledReminderDTO,
}

impl ScheduledReminderResponse {
    pub fn new(record: MappingRecord) -> Self {
        Self {
            notification: ScheduledReminderDTO::new(record),
        }
    }
}

pub mod get_scheduled_reminders {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub notifications: Vec<ScheduledReminderDTO>,
    }

    impl APIResponse {
        pub fn new(records: Vec<MappingRecord>) -> Self {
            Self {
                notifications: records.into_iter().map(ScheduledReminderDTO::new).collect(),
            }
        }
    }
}

pub mod cancel_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ReminderId,
    }

    pub type APIResponse = ScheduledReminderResponse;
}

pub mod respond_to_notification {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub handle: String,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub handle: String,
    }
}
