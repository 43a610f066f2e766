use super::ISubscriptionRepo;
use chrono::{DateTime, Utc};
use duesoon_domain::{ReminderHours, Subscription, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::{TryFrom, TryInto};
use tracing::warn;

pub struct PostgresSubscriptionRepo {
    pool: PgPool,
}

impl PostgresSubscriptionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SubscriptionRaw {
    subscription_uid: Uuid,
    email: String,
    user_uid: Option<Uuid>,
    name: Option<String>,
    is_active: bool,
    task_reminders: bool,
    daily_summary: bool,
    weekly_report: bool,
    reminder_hours: i32,
    last_notification_sent_at: Option<DateTime<Utc>>,
    unsubscribe_token: String,
    email_verified: bool,
    verification_token: Option<String>,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl TryFrom<SubscriptionRaw> for Subscription {
    type Error = anyhow::Error;

    fn try_from(raw: SubscriptionRaw) -> Result<Self, Self::Error> {
        Ok(Self {
            id: raw.subscription_uid.into(),
            email: raw.email,
            owner: raw.user_uid.map(ID::from),
            name: raw.name,
            is_active: raw.is_active,
            task_reminders: raw.task_reminders,
            daily_summary: raw.daily_summary,
            weekly_report: raw.weekly_report,
            reminder_hours: ReminderHours::new(raw.reminder_hours as i64)?,
            last_notification_sent_at: raw.last_notification_sent_at,
            unsubscribe_token: raw.unsubscribe_token,
            email_verified: raw.email_verified,
            verification_token: raw.verification_token,
            created: raw.created,
            updated: raw.updated,
        })
    }
}

/// Rows that no longer hold a valid subscription are logged and left out
fn into_subscriptions(rows: Vec<SubscriptionRaw>) -> Vec<Subscription> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.subscription_uid;
            match Subscription::try_from(row) {
                Ok(subscription) => Some(subscription),
                Err(e) => {
                    warn!("Skipping invalid subscription row {}. Error: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

#[async_trait::async_trait]
impl ISubscriptionRepo for PostgresSubscriptionRepo {
    async fn insert(&self, subscription: &Subscription) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions
            (subscription_uid, email, user_uid, name, is_active, task_reminders, daily_summary,
             weekly_report, reminder_hours, last_notification_sent_at, unsubscribe_token,
             email_verified, verification_token, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(subscription.id.inner_ref())
        .bind(&subscription.email)
        .bind(subscription.owner.as_ref().map(|id| *id.inner_ref()))
        .bind(&subscription.name)
        .bind(subscription.is_active)
        .bind(subscription.task_reminders)
        .bind(subscription.daily_summary)
        .bind(subscription.weekly_report)
        .bind(subscription.reminder_hours.get() as i32)
        .bind(subscription.last_notification_sent_at)
        .bind(&subscription.unsubscribe_token)
        .bind(subscription.email_verified)
        .bind(&subscription.verification_token)
        .bind(subscription.created)
        .bind(subscription.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, subscription: &Subscription) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE subscriptions
            SET email = $2,
            name = $3,
            is_active = $4,
            task_reminders = $5,
            daily_summary = $6,
            weekly_report = $7,
            reminder_hours = $8,
            last_notification_sent_at = $9,
            unsubscribe_token = $10,
            email_verified = $11,
            verification_token = $12,
            updated = $13
            WHERE subscription_uid = $1
            "#,
        )
        .bind(subscription.id.inner_ref())
        .bind(&subscription.email)
        .bind(&subscription.name)
        .bind(subscription.is_active)
        .bind(subscription.task_reminders)
        .bind(subscription.daily_summary)
        .bind(subscription.weekly_report)
        .bind(subscription.reminder_hours.get() as i32)
        .bind(subscription.last_notification_sent_at)
        .bind(&subscription.unsubscribe_token)
        .bind(subscription.email_verified)
        .bind(&subscription.verification_token)
        .bind(subscription.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_notified(&self, subscription_id: &ID, at: DateTime<Utc>) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE subscriptions
            SET last_notification_sent_at = $2,
            updated = $2
            WHERE subscription_uid = $1
            "#,
        )
        .bind(subscription_id.inner_ref())
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, subscription_id: &ID) -> anyhow::Result<Option<Subscription>> {
        sqlx::query_as::<_, SubscriptionRaw>(
            r#"
            SELECT * FROM subscriptions AS s
            WHERE s.subscription_uid = $1
            "#,
        )
        .bind(subscription_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?
        .map(|row| row.try_into())
        .transpose()
    }

    async fn find_public_by_email(&self, email: &str) -> anyhow::Result<Option<Subscription>> {
        sqlx::query_as::<_, SubscriptionRaw>(
            r#"
            SELECT * FROM subscriptions AS s
            WHERE s.user_uid IS NULL AND s.email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .map(|row| row.try_into())
        .transpose()
    }

    async fn find_by_user_and_email(
        &self,
        user_id: &ID,
        email: &str,
    ) -> anyhow::Result<Option<Subscription>> {
        sqlx::query_as::<_, SubscriptionRaw>(
            r#"
            SELECT * FROM subscriptions AS s
            WHERE s.user_uid = $1 AND s.email = $2
            "#,
        )
        .bind(user_id.inner_ref())
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .map(|row| row.try_into())
        .transpose()
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Subscription>> {
        let rows = sqlx::query_as::<_, SubscriptionRaw>(
            r#"
            SELECT * FROM subscriptions AS s
            WHERE s.user_uid = $1
            ORDER BY s.created
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;
        Ok(into_subscriptions(rows))
    }

    async fn find_by_unsubscribe_token(
        &self,
        token: &str,
    ) -> anyhow::Result<Option<Subscription>> {
        sqlx::query_as::<_, SubscriptionRaw>(
            r#"
            SELECT * FROM subscriptions AS s
            WHERE s.unsubscribe_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?
        .map(|row| row.try_into())
        .transpose()
    }

    async fn find_active_reminder_subscriptions(&self) -> anyhow::Result<Vec<Subscription>> {
        let rows = sqlx::query_as::<_, SubscriptionRaw>(
            r#"
            SELECT * FROM subscriptions AS s
            WHERE s.is_active AND s.task_reminders
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(into_subscriptions(rows))
    }

    async fn delete(&self, subscription_id: &ID) -> anyhow::Result<Option<Subscription>> {
        sqlx::query_as::<_, SubscriptionRaw>(
            r#"
            DELETE FROM subscriptions AS s
            WHERE s.subscription_uid = $1
            RETURNING *
            "#,
        )
        .bind(subscription_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?
        .map(|row| row.try_into())
        .transpose()
    }
}
