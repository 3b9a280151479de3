mod app_state;
mod mapping;
mod notification;
mod reminder;
mod sync;
pub mod time;

pub use app_state::AppState;
pub use mapping::{mapping_key, parse_mapping_key, MappingRecord, MAPPING_KEY_PREFIX};
pub use notification::{
    NotificationData, NotificationPayload, NotificationResponse, PresentationPolicy,
    NOTIFICATION_TITLE,
};
pub use reminder::{MedicationReminder, ReminderEntry, ReminderId, UserId};
pub use sync::{ReconcileSummary, ScheduleError, ScheduleOutcome, TriggerOccasion};
