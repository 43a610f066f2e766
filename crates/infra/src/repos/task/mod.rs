mod inmemory;
mod postgres;

pub use inmemory::InMemoryTaskRepo;
pub use postgres::PostgresTaskRepo;

use chrono::{DateTime, Utc};
use duesoon_domain::{DueSoonTask, ID};

#[async_trait::async_trait]
pub trait ITaskRepo: Send + Sync {
    async fn insert(&self, task: &DueSoonTask) -> anyhow::Result<()>;
    /// Incomplete tasks of the user due within `[now, now + horizon_hours]`,
    /// earliest due first
    async fn find_due_soon(
        &self,
        user_id: &ID,
        now: DateTime<Utc>,
        horizon_hours: i64,
    ) -> anyhow::Result<Vec<DueSoonTask>>;
}
