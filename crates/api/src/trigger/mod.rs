mod coordinator;

use crate::error::RxminderError;
use actix_web::{web, HttpResponse};
pub use coordinator::{TriggerCoordinator, TriggerSubscription};
use rxminder_api_structs::{respond_to_notification, set_app_state};
use rxminder_infra::RxminderContext;
use tracing::warn;

/// The native shell reports a change of the app lifecycle state
async fn set_app_state_controller(
    body: web::Json<set_app_state::RequestBody>,
    ctx: web::Data<RxminderContext>,
) -> HttpResponse {
    let state = body.state;
    let listeners = ctx.services.app_lifecycle.dispatch_state(state);

    HttpResponse::Ok().json(set_app_state::APIResponse { state, listeners })
}

/// The native shell reports that the user tapped a notification
async fn respond_to_notification_controller(
    path_params: web::Path<respond_to_notification::PathParams>,
    ctx: web::Data<RxminderContext>,
) -> Result<HttpResponse, RxminderError> {
    let handle = path_params.into_inner().handle;
    ctx.services
        .notifications
        .dispatch_response(&handle)
        .await
        .map_err(|e| {
            warn!("Unable to dispatch notification response. Err: {:?}", e);
            RxminderError::NotFound(format!("No notification with handle: {}.", handle))
        })?;

    Ok(HttpResponse::Ok().json(respond_to_notification::APIResponse { handle }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/app-state", web::put().to(set_app_state_controller));
    cfg.route(
        "/notifications/{handle}/response",
        web::post().to(respond_to_notification_controller),
    );
}
