use crate::sync::ScheduleError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server side identity of a reminder
pub type ReminderId = i64;
/// Server side identity of the user owning the reminders
pub type UserId = i64;

/// A `ReminderEntry` is a single reminder as declared by the server.
///
/// The server payload is not trusted, so every field is optional here and
/// a field with the wrong JSON type is read as absent. Use `validate` to
/// get a `MedicationReminder` that can be scheduled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReminderEntry {
    /// Timestamp at which the notification should fire. Might be missing
    /// a UTC offset, see `time::normalize`.
    pub trigger_time: Option<String>,
    pub med_name: Option<String>,
    pub dosage: Option<String>,
    pub message: Option<String>,
    /// Used for deduplication across reconciliation runs. Entries without
    /// it are scheduled again on every run.
    pub reminder_id: Option<ReminderId>,
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(String::from)
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

impl ReminderEntry {
    /// Reads an entry out of an untyped server value without failing
    pub fn from_value(value: &Value) -> Self {
        Self {
            trigger_time: string_field(value, "trigger_time"),
            med_name: string_field(value, "med_name"),
            dosage: string_field(value, "dosage"),
            message: string_field(value, "message"),
            reminder_id: value.get("reminder_id").and_then(Value::as_i64),
        }
    }

    /// Reads a list of entries out of the server response.
    ///
    /// Returns `None` when the response is not a list at all.
    pub fn list_from_value(value: &Value) -> Option<Vec<Self>> {
        value
            .as_array()
            .map(|entries| entries.iter().map(Self::from_value).collect())
    }

    pub fn is_valid(&self) -> bool {
        non_empty(&self.trigger_time).is_some() && non_empty(&self.med_name).is_some()
    }

    pub fn validate(&self) -> Result<MedicationReminder, ScheduleError> {
        match (non_empty(&self.trigger_time), non_empty(&self.med_name)) {
            (Some(trigger_time), Some(med_name)) => Ok(MedicationReminder {
                reminder_id: self.reminder_id,
                trigger_time,
                med_name,
                dosage: non_empty(&self.dosage),
                message: non_empty(&self.message),
            }),
            _ => Err(ScheduleError::InvalidEntry),
        }
    }
}

/// A validated `ReminderEntry`
#[derive(Debug, Clone, PartialEq)]
pub struct MedicationReminder {
    pub reminder_id: Option<ReminderId>,
    /// Raw trigger time as received from the server
    pub trigger_time: String,
    pub med_name: String,
    pub dosage: Option<String>,
    pub message: Option<String>,
}
