mod error;
mod reminder;
mod shared;
mod status;
mod trigger;

use actix_web::{dev::Server, web, App, HttpServer};
use rxminder_infra::RxminderContext;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;
pub use trigger::{TriggerCoordinator, TriggerSubscription};

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    reminder::configure_routes(cfg);
    status::configure_routes(cfg);
    trigger::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    subscription: Option<TriggerSubscription>,
}

impl Application {
    pub async fn new(context: RxminderContext) -> Result<Self, std::io::Error> {
        let subscription = Application::start_trigger_coordinator(context.clone()).await;
        let (server, port) = Application::configure_server(context).await?;

        Ok(Self {
            server,
            port,
            subscription,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    async fn start_trigger_coordinator(context: RxminderContext) -> Option<TriggerSubscription> {
        let user_id = context.config.user_id?;
        Some(TriggerCoordinator::start(context, user_id).await)
    }

    async fn configure_server(context: RxminderContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        let Self {
            server,
            subscription,
            ..
        } = self;
        let res = server.await;
        if let Some(mut subscription) = subscription {
            subscription.teardown();
        }
        res
    }
}
