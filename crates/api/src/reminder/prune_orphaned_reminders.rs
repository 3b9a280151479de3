use crate::shared::usecase::UseCase;
use rxminder_domain::ReminderId;
use rxminder_infra::RxminderContext;
use std::collections::BTreeSet;
use std::convert::Infallible;
use tracing::{info, warn};

/// Cancels the local notifications of reminders the server no longer
/// returns. A notification that cannot be cancelled keeps its mapping so
/// that the next run tries again.
#[derive(Debug)]
pub struct PruneOrphanedRemindersUseCase {
    pub active_reminder_ids: BTreeSet<ReminderId>,
}

#[async_trait::async_trait]
impl UseCase for PruneOrphanedRemindersUseCase {
    /// Number of cancelled notifications
    type Response = usize;

    type Errors = Infallible;

    const NAME: &'static str = "PruneOrphanedReminders";

    async fn execute(&mut self, ctx: &RxminderContext) -> Result<Self::Response, Self::Errors> {
        let mut pruned = 0;
        for record in ctx.repos.mappings.list_all().await {
            if self.active_reminder_ids.contains(&record.reminder_id) {
                continue;
            }
            match ctx.services.notifications.cancel(&record.handle).await {
                Ok(_) => {
                    ctx.repos.mappings.remove(record.reminder_id).await;
                    info!(
                        "Cancelled notification {} of removed reminder {}",
                        record.handle, record.reminder_id
                    );
                    pruned += 1;
                }
                Err(e) => warn!(
                    "Unable to cancel notification {} of removed reminder {}. Err: {:?}",
                    record.handle, record.reminder_id, e
                ),
            }
        }

        Ok(pruned)
    }
}
