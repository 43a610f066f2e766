mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, EmailApiConfig, ReminderConfig};
pub use repos::{ISubscriptionRepo, ITaskRepo, IUserRepo, Repos};
pub use services::*;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::info;

#[derive(Clone)]
pub struct DuesoonContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub email: Arc<EmailService>,
}

impl DuesoonContext {
    fn create(repos: Repos) -> Self {
        let config = Config::new();
        let email = Arc::new(EmailService::from_config(&config));
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            email,
        }
    }

    /// Context backed by in-memory repositories
    pub fn create_inmemory() -> Self {
        Self::create(Repos::create_inmemory())
    }

    /// Replaces the delivery channel of outgoing emails
    pub fn set_email_sender(&mut self, sender: Arc<dyn IEmailSender>) {
        self.email = Arc::new(EmailService::new(sender, &self.config));
    }
}

/// Will setup the infrastructure context given the environment.
///
/// Uses postgres when `DATABASE_URL` is set and in-memory repositories
/// otherwise.
pub async fn setup_context() -> anyhow::Result<DuesoonContext> {
    match std::env::var("DATABASE_URL") {
        Ok(connection_string) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&connection_string)
                .await?;
            run_migration(&pool).await?;
            Ok(DuesoonContext::create(Repos::create_postgres(pool)))
        }
        Err(_) => {
            info!("DATABASE_URL is not set. Going to use in-memory repositories.");
            Ok(DuesoonContext::create_inmemory())
        }
    }
}

pub async fn run_migration(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    info!("Running database migrations ...");
    sqlx::migrate!().run(pool).await?;
    info!("Running database migrations ... [done]");
    Ok(())
}
