use chrono::{Duration, Utc};
use rxminder_infra::InMemoryReminderSource;
use serde_json::{json, Value};

/// Server representation of a reminder firing the given number of days
/// from now, without a UTC offset
pub fn reminder_in_days(reminder_id: i64, med_name: &str, days: i64) -> Value {
    let trigger_time = Utc::now() + Duration::days(days);
    json!({
        "reminder_id": reminder_id,
        "trigger_time": trigger_time.format("%Y-%m-%dT%H:%M:%S").to_string(),
        "med_name": med_name,
        "dosage": "10 mg",
        "schedule": null,
        "end_date": null,
    })
}

/// Waits until the source has been asked for reminders the expected
/// number of times
pub async fn wait_for_fetches(source: &InMemoryReminderSource, expected: usize) {
    for _ in 0..200 {
        if source.fetch_count() >= expected {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(source.fetch_count(), expected);
}
