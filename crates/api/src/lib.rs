mod error;
mod job_schedulers;
mod reminder;
mod shared;
mod status;
mod subscription;

use actix_web::{dev::Server, middleware, web, App, HttpServer};
pub use job_schedulers::{
    start_routine_reminders_job, start_urgent_reminders_job, ReminderJobHandle,
};
use duesoon_infra::DuesoonContext;
pub use reminder::{ReminderError, ReminderPassError, ReminderScheduler};
use std::net::TcpListener;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    reminder::configure_routes(cfg);
    status::configure_routes(cfg);
    subscription::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    jobs: Vec<ReminderJobHandle>,
}

impl Application {
    pub async fn new(context: DuesoonContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        let jobs = Application::start_job_schedulers(context);

        Ok(Self { server, port, jobs })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn start_job_schedulers(context: DuesoonContext) -> Vec<ReminderJobHandle> {
        if !context.config.reminders.jobs_enabled {
            info!("Reminder jobs are disabled");
            return vec![];
        }
        vec![
            start_routine_reminders_job(context.clone()),
            start_urgent_reminders_job(context),
        ]
    }

    async fn configure_server(context: DuesoonContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    /// Serves requests until the server shuts down, then stops the reminder jobs
    pub async fn start(self) -> Result<(), std::io::Error> {
        let res = self.server.await;
        for job in self.jobs {
            job.stop().await;
        }
        res
    }
}
