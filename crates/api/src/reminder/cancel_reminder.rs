use crate::error::RxminderError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use rxminder_api_structs::cancel_reminder::*;
use rxminder_domain::{MappingRecord, ReminderId};
use rxminder_infra::RxminderContext;
use tracing::info;

fn handle_error(e: UseCaseError) -> RxminderError {
    match e {
        UseCaseError::NotFound(reminder_id) => RxminderError::NotFound(format!(
            "No notification is scheduled for reminder: {}.",
            reminder_id
        )),
        UseCaseError::PlatformError => RxminderError::InternalError,
    }
}

pub async fn cancel_reminder_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<RxminderContext>,
) -> Result<HttpResponse, RxminderError> {
    let usecase = CancelReminderUseCase {
        reminder_id: path_params.reminder_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|record| HttpResponse::Ok().json(APIResponse::new(record)))
        .map_err(handle_error)
}

/// Cancels the local notification of a single reminder and forgets its
/// mapping, so that the next reconciliation run schedules it again if the
/// server still returns it
#[derive(Debug)]
pub struct CancelReminderUseCase {
    pub reminder_id: ReminderId,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ReminderId),
    PlatformError,
}

#[async_trait::async_trait]
impl UseCase for CancelReminderUseCase {
    type Response = MappingRecord;

    type Errors = UseCaseError;

    const NAME: &'static str = "CancelReminder";

    async fn execute(&mut self, ctx: &RxminderContext) -> Result<Self::Response, Self::Errors> {
        let handle = ctx
            .repos
            .mappings
            .get(self.reminder_id)
            .await
            .ok_or(UseCaseError::NotFound(self.reminder_id))?;

        ctx.services
            .notifications
            .cancel(&handle)
            .await
            .map_err(|_| UseCaseError::PlatformError)?;
        ctx.repos.mappings.remove(self.reminder_id).await;
        info!(
            "Cancelled notification {} of reminder {}",
            handle, self.reminder_id
        );

        Ok(MappingRecord {
            reminder_id: self.reminder_id,
            handle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxminder_infra::InMemoryNotificationPlatform;
    use std::sync::Arc;

    fn setup() -> (RxminderContext, Arc<InMemoryNotificationPlatform>) {
        let mut ctx = RxminderContext::create_inmemory();
        let platform = Arc::new(InMemoryNotificationPlatform::new());
        ctx.services.notifications = platform.clone();
        (ctx, platform)
    }

    #[tokio::test]
    async fn cancels_and_forgets_mapping() {
        let (ctx, platform) = setup();
        ctx.repos.mappings.set(4, "handle-4").await;

        let usecase = CancelReminderUseCase { reminder_id: 4 };
        let record = execute(usecase, &ctx).await.expect("To cancel reminder");
        assert_eq!(record.handle, "handle-4");
        assert_eq!(platform.cancelled(), vec!["handle-4"]);
        assert!(ctx.repos.mappings.get(4).await.is_none());
    }

    #[tokio::test]
    async fn unknown_reminder_is_not_found() {
        let (ctx, platform) = setup();
        let usecase = CancelReminderUseCase { reminder_id: 4 };
        assert_eq!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::NotFound(4))
        );
        assert!(platform.cancelled().is_empty());
    }

    #[tokio::test]
    async fn keeps_mapping_when_platform_fails() {
        let (ctx, platform) = setup();
        platform.set_fail_cancel(true);
        ctx.repos.mappings.set(4, "handle-4").await;

        let usecase = CancelReminderUseCase { reminder_id: 4 };
        assert_eq!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::PlatformError)
        );
        assert!(ctx.repos.mappings.get(4).await.is_some());
    }
}
