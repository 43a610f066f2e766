mod shared;
mod subscription;
mod task;
mod user;

use sqlx::PgPool;
use std::sync::Arc;
pub use subscription::ISubscriptionRepo;
use subscription::{InMemorySubscriptionRepo, PostgresSubscriptionRepo};
pub use task::ITaskRepo;
use task::{InMemoryTaskRepo, PostgresTaskRepo};
pub use user::IUserRepo;
use user::{InMemoryUserRepo, PostgresUserRepo};

#[derive(Clone)]
pub struct Repos {
    pub subscriptions: Arc<dyn ISubscriptionRepo>,
    pub users: Arc<dyn IUserRepo>,
    pub tasks: Arc<dyn ITaskRepo>,
}

impl Repos {
    pub fn create_postgres(pool: PgPool) -> Self {
        Self {
            subscriptions: Arc::new(PostgresSubscriptionRepo::new(pool.clone())),
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            tasks: Arc::new(PostgresTaskRepo::new(pool)),
        }
    }

    pub fn create_inmemory() -> Self {
        Self {
            subscriptions: Arc::new(InMemorySubscriptionRepo::new()),
            users: Arc::new(InMemoryUserRepo::new()),
            tasks: Arc::new(InMemoryTaskRepo::new()),
        }
    }
}
