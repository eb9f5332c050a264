mod config;
mod error;
mod intake;
mod job_schedulers;
mod language;
mod reminder;
mod shared;
mod status;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
pub use intake::{IntakeError, IntakeQueue, IntakeTask};
use job_schedulers::start_intake_workers;
use lull_infra::LullContext;
pub use reminder::scheduler::{recover_on_start, RecoveryReport};
use std::net::TcpListener;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    config::configure_routes(cfg);
    reminder::configure_routes(cfg);
    status::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    pub async fn new(context: LullContext) -> Result<Self, std::io::Error> {
        Application::recover_timers(&context).await;
        let intake = Application::start_job_schedulers(context.clone());
        let (server, port) = Application::configure_server(context, intake).await?;

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    async fn recover_timers(context: &LullContext) {
        match recover_on_start(context).await {
            Ok(report) => info!(
                armed = report.armed,
                missed = report.missed,
                fired_late = report.fired_late,
                "Recovered reminder timers"
            ),
            Err(e) => warn!("Unable to recover reminder timers. Error: {:?}", e),
        }
    }

    fn start_job_schedulers(context: LullContext) -> IntakeQueue {
        let (intake, receiver) = IntakeQueue::new(context.config.intake_queue_capacity);
        let workers = context.config.intake_workers;
        start_intake_workers(context, receiver, workers);
        intake
    }

    async fn configure_server(
        context: LullContext,
        intake: IntakeQueue,
    ) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();
            let intake = intake.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .app_data(web::Data::new(intake))
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}
