mod error;
mod event;
mod notification;
mod participant;
mod reminder;
mod shared;
mod status;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use gatherly_infra::GatherlyContext;
use std::net::TcpListener;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use error::GatherlyError;
pub use reminder::{
    PassReport, ReminderScheduler, SchedulerState, SchedulerStatus, SendEventRemindersError,
};

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    event::configure_routes(cfg);
    participant::configure_routes(cfg);
    reminder::configure_routes(cfg);
    status::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    scheduler: Arc<ReminderScheduler>,
}

impl Application {
    pub async fn new(context: GatherlyContext) -> Result<Self, std::io::Error> {
        let scheduler = Arc::new(ReminderScheduler::new(context.clone()));
        if context.config.autostart_reminder_scheduler {
            scheduler.start();
        } else {
            info!("Reminder scheduler autostart is disabled");
        }

        let (server, port) = Application::configure_server(context, scheduler.clone()).await?;

        Ok(Self {
            server,
            port,
            scheduler,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    async fn configure_server(
        context: GatherlyContext,
        scheduler: Arc<ReminderScheduler>,
    ) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();
            let scheduler = web::Data::from(scheduler.clone());

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .app_data(scheduler)
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        let res = self.server.await;
        self.scheduler.stop();
        res
    }
}
