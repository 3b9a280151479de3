mod telemetry;

use rxminder_api::Application;
use rxminder_infra::setup_context;
use telemetry::{get_subscriber, init_subscriber};
use tracing::error;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("rxminder".into(), "info".into());
    init_subscriber(subscriber);

    let context = setup_context().await.map_err(|e| {
        error!("Unable to setup context. Err: {:?}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let app = Application::new(context).await?;
    app.start().await
}
