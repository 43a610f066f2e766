mod inmemory;
mod postgres;

pub use inmemory::InMemorySubscriptionRepo;
pub use postgres::PostgresSubscriptionRepo;

use chrono::{DateTime, Utc};
use duesoon_domain::{Subscription, ID};

#[async_trait::async_trait]
pub trait ISubscriptionRepo: Send + Sync {
    async fn insert(&self, subscription: &Subscription) -> anyhow::Result<()>;
    async fn save(&self, subscription: &Subscription) -> anyhow::Result<()>;
    /// Stores the send time of a reminder and touches nothing else on the
    /// subscription. A missing subscription is not an error.
    async fn mark_notified(&self, subscription_id: &ID, at: DateTime<Utc>) -> anyhow::Result<()>;
    async fn find(&self, subscription_id: &ID) -> anyhow::Result<Option<Subscription>>;
    async fn find_public_by_email(&self, email: &str) -> anyhow::Result<Option<Subscription>>;
    async fn find_by_user_and_email(
        &self,
        user_id: &ID,
        email: &str,
    ) -> anyhow::Result<Option<Subscription>>;
    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Subscription>>;
    async fn find_by_unsubscribe_token(&self, token: &str)
        -> anyhow::Result<Option<Subscription>>;
    /// Every subscription that is active and wants task reminders, of both
    /// the public and the user linked kind
    async fn find_active_reminder_subscriptions(&self) -> anyhow::Result<Vec<Subscription>>;
    async fn delete(&self, subscription_id: &ID) -> anyhow::Result<Option<Subscription>>;
}

#[cfg(test)]
mod tests {
    use crate::DuesoonContext;
    use chrono::{TimeZone, Utc};
    use duesoon_domain::{Entity, Subscription, SubscriptionPreferences, ID};

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn create_find_and_delete() {
        let ctx = DuesoonContext::create_inmemory();
        let repo = &ctx.repos.subscriptions;

        let public = Subscription::new_public("a@x.com", None, &Default::default(), now());
        let user_id = ID::new();
        let linked = Subscription::new_for_user(user_id.clone(), "a@x.com", &Default::default(), now());
        repo.insert(&public).await.unwrap();
        repo.insert(&linked).await.unwrap();

        let res = repo.find(&public.id).await.unwrap().unwrap();
        assert!(res.eq(&public));
        let res = repo.find_public_by_email("a@x.com").await.unwrap().unwrap();
        assert!(res.eq(&public));
        let res = repo
            .find_by_user_and_email(&user_id, "a@x.com")
            .await
            .unwrap()
            .unwrap();
        assert!(res.eq(&linked));
        assert_eq!(repo.find_by_user(&user_id).await.unwrap().len(), 1);
        let res = repo
            .find_by_unsubscribe_token(&linked.unsubscribe_token)
            .await
            .unwrap()
            .unwrap();
        assert!(res.eq(&linked));

        let deleted = repo.delete(&public.id).await.unwrap();
        assert!(deleted.is_some());
        assert!(repo.find(&public.id).await.unwrap().is_none());
        assert!(repo.delete(&public.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn only_active_reminder_subscriptions_are_selected() {
        let ctx = DuesoonContext::create_inmemory();
        let repo = &ctx.repos.subscriptions;

        let active = Subscription::new_public("a@x.com", None, &Default::default(), now());
        let mut unsubscribed = Subscription::new_public("b@x.com", None, &Default::default(), now());
        unsubscribed.unsubscribe(now());
        let no_reminders = Subscription::new_public(
            "c@x.com",
            None,
            &SubscriptionPreferences {
                task_reminders: Some(false),
                ..Default::default()
            },
            now(),
        );
        for sub in [&active, &unsubscribed, &no_reminders] {
            repo.insert(sub).await.unwrap();
        }

        let res = repo.find_active_reminder_subscriptions().await.unwrap();
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].id(), active.id());
    }

    #[tokio::test]
    async fn save_persists_send_state() {
        let ctx = DuesoonContext::create_inmemory();
        let repo = &ctx.repos.subscriptions;

        let mut sub = Subscription::new_public("a@x.com", None, &Default::default(), now());
        repo.insert(&sub).await.unwrap();
        sub.mark_notified(now());
        repo.save(&sub).await.unwrap();

        let res = repo.find(&sub.id).await.unwrap().unwrap();
        assert_eq!(res.last_notification_sent_at, Some(now()));
    }

    #[tokio::test]
    async fn mark_notified_keeps_other_changes() {
        let ctx = DuesoonContext::create_inmemory();
        let repo = &ctx.repos.subscriptions;

        let sub = Subscription::new_public("a@x.com", None, &Default::default(), now());
        repo.insert(&sub).await.unwrap();
        // Unsubscribed from a copy read earlier
        let mut stale = sub.clone();
        stale.unsubscribe(now());
        stale.weekly_report = true;
        repo.save(&stale).await.unwrap();

        let sent_at = now() + chrono::Duration::minutes(5);
        repo.mark_notified(&sub.id, sent_at).await.unwrap();

        let res = repo.find(&sub.id).await.unwrap().unwrap();
        assert_eq!(res.last_notification_sent_at, Some(sent_at));
        assert!(!res.is_active);
        assert!(res.weekly_report);

        // Unknown subscriptions are ignored
        assert!(repo.mark_notified(&ID::new(), sent_at).await.is_ok());
    }
}
