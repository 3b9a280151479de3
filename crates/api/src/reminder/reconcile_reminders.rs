use super::prune_orphaned_reminders::PruneOrphanedRemindersUseCase;
use super::schedule_reminder::ScheduleReminderUseCase;
use crate::error::RxminderError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use rxminder_api_structs::reconcile_reminders::*;
use rxminder_domain::{ReconcileSummary, ReminderEntry, TriggerOccasion, UserId};
use rxminder_infra::RxminderContext;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

fn handle_error(e: UseCaseError) -> RxminderError {
    match e {
        UseCaseError::SourceUnavailable(user_id) => RxminderError::Unavailable(format!(
            "The reminders of user: {} could not be fetched.",
            user_id
        )),
    }
}

pub async fn reconcile_reminders_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<RxminderContext>,
) -> Result<HttpResponse, RxminderError> {
    let usecase = ReconcileRemindersUseCase {
        user_id: path_params.user_id,
        occasion: TriggerOccasion::Manual,
    };

    execute(usecase, &ctx)
        .await
        .map(|summary| HttpResponse::Ok().json(APIResponse::new(summary)))
        .map_err(handle_error)
}

/// Brings the locally scheduled notifications in line with the reminders
/// the server currently declares for the user.
///
/// Only ever adds notifications, unless pruning of orphaned notifications
/// is enabled in the `Config`. A failing fetch leaves everything as it was.
#[derive(Debug)]
pub struct ReconcileRemindersUseCase {
    pub user_id: UserId,
    pub occasion: TriggerOccasion,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    SourceUnavailable(UserId),
}

#[async_trait::async_trait]
impl UseCase for ReconcileRemindersUseCase {
    type Response = ReconcileSummary;

    type Errors = UseCaseError;

    const NAME: &'static str = "ReconcileReminders";

    async fn execute(&mut self, ctx: &RxminderContext) -> Result<Self::Response, Self::Errors> {
        let response = ctx
            .services
            .reminder_source
            .fetch_reminders(self.user_id)
            .await
            .map_err(|e| {
                warn!(
                    "Unable to fetch reminders for user {} on {}. Err: {:?}",
                    self.user_id, self.occasion, e
                );
                UseCaseError::SourceUnavailable(self.user_id)
            })?;

        let entries = match ReminderEntry::list_from_value(&response) {
            Some(entries) => entries,
            None => {
                warn!(
                    "Reminder source did not return a list for user {}, treating it as empty",
                    self.user_id
                );
                return Ok(ReconcileSummary::default());
            }
        };

        let mut summary = ReconcileSummary::default();
        let mut active_reminder_ids = BTreeSet::new();
        for entry in entries {
            if let Some(reminder_id) = entry.reminder_id {
                active_reminder_ids.insert(reminder_id);
            }
            let mut usecase = ScheduleReminderUseCase { entry };
            let res = usecase.execute(ctx).await;
            if let Err(e) = &res {
                debug!("Reminder {:?} not scheduled: {}", usecase.entry.reminder_id, e);
            }
            summary.record(&res);
        }

        if ctx.config.prune_orphaned_notifications {
            let usecase = PruneOrphanedRemindersUseCase {
                active_reminder_ids,
            };
            summary.pruned = execute(usecase, ctx).await.unwrap_or(0);
        }

        info!(
            "Reconciled reminders of user {} on {}: {:?}",
            self.user_id, self.occasion, summary
        );
        Ok(summary)
    }
}
