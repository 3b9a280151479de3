use crate::error::RxminderError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use rxminder_api_structs::get_scheduled_reminders::*;
use rxminder_domain::MappingRecord;
use rxminder_infra::RxminderContext;
use std::convert::Infallible;

pub async fn get_scheduled_reminders_controller(
    ctx: web::Data<RxminderContext>,
) -> Result<HttpResponse, RxminderError> {
    let usecase = GetScheduledRemindersUseCase {};

    execute(usecase, &ctx)
        .await
        .map(|records| HttpResponse::Ok().json(APIResponse::new(records)))
        .map_err(|_| RxminderError::InternalError)
}

#[derive(Debug)]
pub struct GetScheduledRemindersUseCase {}

#[async_trait::async_trait]
impl UseCase for GetScheduledRemindersUseCase {
    type Response = Vec<MappingRecord>;

    type Errors = Infallible;

    const NAME: &'static str = "GetScheduledReminders";

    async fn execute(&mut self, ctx: &RxminderContext) -> Result<Self::Response, Self::Errors> {
        Ok(ctx.repos.mappings.list_all().await)
    }
}
