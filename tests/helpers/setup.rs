use rxminder_api::Application;
use rxminder_infra::{
    InMemoryNotificationPlatform, InMemoryReminderSource, LocalAppLifecycle, RxminderContext,
};
use serde_json::Value;
use std::sync::Arc;

pub const USER_ID: i64 = 1;

pub struct TestApp {
    pub address: String,
    pub ctx: RxminderContext,
    pub source: Arc<InMemoryReminderSource>,
    pub platform: Arc<InMemoryNotificationPlatform>,
    pub lifecycle: Arc<LocalAppLifecycle>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.address, path)
    }
}

// Launch the application as a background task with the given server
// reminders for the signed in user
pub async fn spawn_app(reminders: Value) -> TestApp {
    let mut ctx = RxminderContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.config.user_id = Some(USER_ID);

    let source = Arc::new(InMemoryReminderSource::new());
    let platform = Arc::new(InMemoryNotificationPlatform::new());
    let lifecycle = Arc::new(LocalAppLifecycle::new());
    source.set_reminders(USER_ID, reminders);
    ctx.services.reminder_source = source.clone();
    ctx.services.notifications = platform.clone();
    ctx.services.app_lifecycle = lifecycle.clone();

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    TestApp {
        address,
        ctx,
        source,
        platform,
        lifecycle,
    }
}
