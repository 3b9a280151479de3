use super::scheduler_adapter::LocalSchedulerAdapter;
use crate::shared::usecase::UseCase;
use rxminder_domain::{
    time, NotificationPayload, ReminderEntry, ScheduleError, ScheduleOutcome,
};
use rxminder_infra::RxminderContext;
use tracing::info;

/// Schedules a local notification for a single server reminder, unless
/// it was already scheduled by a previous run
#[derive(Debug)]
pub struct ScheduleReminderUseCase {
    pub entry: ReminderEntry,
}

#[async_trait::async_trait]
impl UseCase for ScheduleReminderUseCase {
    type Response = ScheduleOutcome;

    type Errors = ScheduleError;

    const NAME: &'static str = "ScheduleReminder";

    async fn execute(&mut self, ctx: &RxminderContext) -> Result<Self::Response, Self::Errors> {
        let reminder = self.entry.validate()?;

        let normalized = time::normalize(&reminder.trigger_time);
        let fire_at = time::parse_instant(&normalized)
            .ok_or_else(|| ScheduleError::MalformedTimestamp(reminder.trigger_time.clone()))?;

        if time::is_past_due(&fire_at, ctx.sys.get_timestamp_millis()) {
            return Err(ScheduleError::PastDue);
        }

        if let Some(reminder_id) = reminder.reminder_id {
            if let Some(handle) = ctx.repos.mappings.get(reminder_id).await {
                return Ok(ScheduleOutcome::AlreadyScheduled(handle));
            }
        }

        let payload = NotificationPayload::new(&reminder);
        let handle = LocalSchedulerAdapter::new(ctx.services.notifications.as_ref())
            .schedule(&payload, fire_at)
            .await
            .ok_or(ScheduleError::PlatformRejected)?;

        if let Some(reminder_id) = reminder.reminder_id {
            ctx.repos.mappings.set(reminder_id, &handle).await;
        }
        info!(
            "Scheduled reminder {:?} for {} at {}",
            reminder.reminder_id, reminder.med_name, fire_at
        );

        Ok(ScheduleOutcome::Scheduled(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use chrono::{TimeZone, Utc};
    use rxminder_infra::{InMemoryNotificationPlatform, StaticTimeSys};
    use std::sync::Arc;

    struct TestContext {
        ctx: RxminderContext,
        platform: Arc<InMemoryNotificationPlatform>,
    }

    fn now_millis() -> i64 {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn setup() -> TestContext {
        let mut ctx = RxminderContext::create_inmemory();
        let platform = Arc::new(InMemoryNotificationPlatform::new());
        ctx.services.notifications = platform.clone();
        ctx.sys = Arc::new(StaticTimeSys {
            timestamp_millis: now_millis(),
        });
        TestContext { ctx, platform }
    }

    fn entry(reminder_id: Option<i64>, trigger_time: &str) -> ReminderEntry {
        ReminderEntry {
            reminder_id,
            trigger_time: Some(trigger_time.into()),
            med_name: Some("Amoxicillin".into()),
            dosage: Some("500 mg".into()),
            message: None,
        }
    }

    fn seconds_from_now(secs: i64) -> String {
        Utc.timestamp_millis_opt(now_millis() + secs * 1000)
            .unwrap()
            .to_rfc3339()
    }

    #[tokio::test]
    async fn schedules_and_maps_reminder() {
        let TestContext { ctx, platform } = setup();
        let usecase = ScheduleReminderUseCase {
            entry: entry(Some(1), "2025-07-01T08:00:00"),
        };

        let outcome = execute(usecase, &ctx).await.expect("To schedule reminder");
        let handle = match outcome {
            ScheduleOutcome::Scheduled(handle) => handle,
            other => panic!("Expected a new notification, got {:?}", other),
        };

        assert_eq!(ctx.repos.mappings.get(1).await, Some(handle.clone()));
        let scheduled = platform.scheduled();
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].handle, handle);
        assert_eq!(
            scheduled[0].fire_at,
            Utc.with_ymd_and_hms(2025, 7, 1, 13, 0, 0).unwrap()
        );
        assert_eq!(scheduled[0].payload.body, "Amoxicillin 500 mg");
        assert_eq!(scheduled[0].payload.data.trigger_time, "2025-07-01T08:00:00");
    }

    #[tokio::test]
    async fn returns_existing_handle_without_scheduling() {
        let TestContext { ctx, platform } = setup();
        ctx.repos.mappings.set(1, "existing").await;

        let usecase = ScheduleReminderUseCase {
            entry: entry(Some(1), "2025-07-01T08:00:00"),
        };
        let outcome = execute(usecase, &ctx).await;
        assert_eq!(
            outcome,
            Ok(ScheduleOutcome::AlreadyScheduled("existing".into()))
        );
        assert_eq!(platform.schedule_calls(), 0);
    }

    #[tokio::test]
    async fn entries_without_id_are_not_mapped() {
        let TestContext { ctx, platform } = setup();
        for _ in 0..2 {
            let usecase = ScheduleReminderUseCase {
                entry: entry(None, "2025-07-01T08:00:00"),
            };
            assert!(execute(usecase, &ctx).await.is_ok());
        }
        assert_eq!(platform.schedule_calls(), 2);
        assert!(ctx.repos.mappings.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn past_due_filter_has_grace_period() {
        let TestContext { ctx, platform } = setup();

        let usecase = ScheduleReminderUseCase {
            entry: entry(Some(1), &seconds_from_now(-31)),
        };
        assert_eq!(execute(usecase, &ctx).await, Err(ScheduleError::PastDue));

        let usecase = ScheduleReminderUseCase {
            entry: entry(Some(2), &seconds_from_now(-29)),
        };
        assert!(matches!(
            execute(usecase, &ctx).await,
            Ok(ScheduleOutcome::Scheduled(_))
        ));
        assert_eq!(platform.schedule_calls(), 1);
        assert!(ctx.repos.mappings.get(1).await.is_none());
        assert!(ctx.repos.mappings.get(2).await.is_some());
    }

    #[tokio::test]
    async fn drops_invalid_and_malformed_entries() {
        let TestContext { ctx, platform } = setup();

        let mut missing_name = entry(Some(1), "2025-07-01T08:00:00");
        missing_name.med_name = None;
        let usecase = ScheduleReminderUseCase {
            entry: missing_name,
        };
        assert_eq!(execute(usecase, &ctx).await, Err(ScheduleError::InvalidEntry));

        let usecase = ScheduleReminderUseCase {
            entry: entry(Some(2), "next tuesday"),
        };
        assert_eq!(
            execute(usecase, &ctx).await,
            Err(ScheduleError::MalformedTimestamp("next tuesday".into()))
        );
        assert_eq!(platform.schedule_calls(), 0);
    }

    #[tokio::test]
    async fn platform_failure_is_not_mapped() {
        let TestContext { ctx, platform } = setup();
        platform.fail_for_med_name("Amoxicillin");

        let usecase = ScheduleReminderUseCase {
            entry: entry(Some(1), "2025-07-01T08:00:00"),
        };
        assert_eq!(
            execute(usecase, &ctx).await,
            Err(ScheduleError::PlatformRejected)
        );
        assert!(ctx.repos.mappings.get(1).await.is_none());
    }
}
