use super::ITaskRepo;
use crate::repos::shared::inmemory_repo::*;
use chrono::{DateTime, Duration, Utc};
use duesoon_domain::{DueSoonTask, ID};

pub struct InMemoryTaskRepo {
    tasks: std::sync::Mutex<Vec<DueSoonTask>>,
}

impl InMemoryTaskRepo {
    pub fn new() -> Self {
        Self {
            tasks: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl ITaskRepo for InMemoryTaskRepo {
    async fn insert(&self, task: &DueSoonTask) -> anyhow::Result<()> {
        insert(task, &self.tasks);
        Ok(())
    }

    async fn find_due_soon(
        &self,
        user_id: &ID,
        now: DateTime<Utc>,
        horizon_hours: i64,
    ) -> anyhow::Result<Vec<DueSoonTask>> {
        let until = now + Duration::hours(horizon_hours);
        let mut tasks = find_by(&self.tasks, |t| {
            t.user_id == *user_id && t.is_due_between(now, until)
        });
        tasks.sort_by_key(|t| t.due_at);
        Ok(tasks)
    }
}
