use crate::reminder::{MedicationReminder, ReminderId};
use serde::{Deserialize, Serialize};

/// Title of every medication notification
pub const NOTIFICATION_TITLE: &str = "Medication reminder";

/// Data attached to a notification so that it can be correlated with the
/// server reminder when the user interacts with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    pub reminder_id: Option<ReminderId>,
    /// The trigger time exactly as the server sent it
    pub trigger_time: String,
    pub med_name: String,
}

/// What the platform presents to the user when a notification fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub data: NotificationData,
}

impl NotificationPayload {
    pub fn new(reminder: &MedicationReminder) -> Self {
        Self {
            title: NOTIFICATION_TITLE.into(),
            body: Self::compose_body(reminder),
            data: NotificationData {
                reminder_id: reminder.reminder_id,
                trigger_time: reminder.trigger_time.clone(),
                med_name: reminder.med_name.clone(),
            },
        }
    }

    /// `<med_name> <dosage>`, followed by ` — <message>` when there is a message
    fn compose_body(reminder: &MedicationReminder) -> String {
        let mut body = match &reminder.dosage {
            Some(dosage) => format!("{} {}", reminder.med_name, dosage),
            None => reminder.med_name.clone(),
        };
        if let Some(message) = &reminder.message {
            body.push_str(" — ");
            body.push_str(message);
        }
        body
    }
}

/// How notifications are presented while the app is in the foreground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationPolicy {
    pub show_alert: bool,
    pub play_sound: bool,
    pub set_badge: bool,
}

impl PresentationPolicy {
    pub fn always() -> Self {
        Self {
            show_alert: true,
            play_sound: true,
            set_badge: true,
        }
    }
}

impl Default for PresentationPolicy {
    fn default() -> Self {
        Self::always()
    }
}

/// The user interacted with a delivered notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub handle: String,
    pub data: NotificationData,
}
