mod cancel_reminder;
mod get_scheduled_reminders;
mod prune_orphaned_reminders;
mod reconcile_reminders;
mod schedule_reminder;
mod scheduler_adapter;

use actix_web::web;
use cancel_reminder::cancel_reminder_controller;
use get_scheduled_reminders::get_scheduled_reminders_controller;
pub use reconcile_reminders::ReconcileRemindersUseCase;
use reconcile_reminders::reconcile_reminders_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/users/{user_id}/reminders/reconcile",
        web::post().to(reconcile_reminders_controller),
    );

    cfg.route(
        "/notifications",
        web::get().to(get_scheduled_reminders_controller),
    );
    cfg.route(
        "/notifications/{reminder_id}",
        web::delete().to(cancel_reminder_controller),
    );
}
