use super::ITaskRepo;
use chrono::{DateTime, Duration, Utc};
use duesoon_domain::{DueSoonTask, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::warn;

pub struct PostgresTaskRepo {
    pool: PgPool,
}

impl PostgresTaskRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TaskRaw {
    task_uid: Uuid,
    user_uid: Uuid,
    title: String,
    description: Option<String>,
    due_at: DateTime<Utc>,
    priority: Option<String>,
    completed: bool,
}

impl From<TaskRaw> for DueSoonTask {
    fn from(raw: TaskRaw) -> Self {
        let priority = raw.priority.and_then(|p| match p.parse() {
            Ok(priority) => Some(priority),
            Err(_) => {
                warn!("Ignoring unknown priority {:?} on task {}", p, raw.task_uid);
                None
            }
        });
        Self {
            id: raw.task_uid.into(),
            user_id: raw.user_uid.into(),
            title: raw.title,
            description: raw.description,
            due_at: raw.due_at,
            priority,
            completed: raw.completed,
        }
    }
}

#[async_trait::async_trait]
impl ITaskRepo for PostgresTaskRepo {
    async fn insert(&self, task: &DueSoonTask) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks(task_uid, user_uid, title, description, due_at, priority, completed)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(task.id.inner_ref())
        .bind(task.user_id.inner_ref())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_at)
        .bind(task.priority.map(|p| p.as_str()))
        .bind(task.completed)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_due_soon(
        &self,
        user_id: &ID,
        now: DateTime<Utc>,
        horizon_hours: i64,
    ) -> anyhow::Result<Vec<DueSoonTask>> {
        let until = now + Duration::hours(horizon_hours);
        let tasks = sqlx::query_as::<_, TaskRaw>(
            r#"
            SELECT * FROM tasks AS t
            WHERE t.user_uid = $1 AND
            NOT t.completed AND
            t.due_at >= $2 AND
            t.due_at <= $3
            ORDER BY t.due_at ASC
            "#,
        )
        .bind(user_id.inner_ref())
        .bind(now)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks.into_iter().map(|t| t.into()).collect())
    }
}
