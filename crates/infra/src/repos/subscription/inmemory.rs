use super::ISubscriptionRepo;
use crate::repos::shared::inmemory_repo::*;
use chrono::{DateTime, Utc};
use duesoon_domain::{Subscription, ID};

pub struct InMemorySubscriptionRepo {
    subscriptions: std::sync::Mutex<Vec<Subscription>>,
}

impl InMemorySubscriptionRepo {
    pub fn new() -> Self {
        Self {
            subscriptions: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl ISubscriptionRepo for InMemorySubscriptionRepo {
    async fn insert(&self, subscription: &Subscription) -> anyhow::Result<()> {
        insert(subscription, &self.subscriptions);
        Ok(())
    }

    async fn save(&self, subscription: &Subscription) -> anyhow::Result<()> {
        save(subscription, &self.subscriptions);
        Ok(())
    }

    async fn mark_notified(&self, subscription_id: &ID, at: DateTime<Utc>) -> anyhow::Result<()> {
        update(subscription_id, &self.subscriptions, |s| s.mark_notified(at));
        Ok(())
    }

    async fn find(&self, subscription_id: &ID) -> anyhow::Result<Option<Subscription>> {
        Ok(find(subscription_id, &self.subscriptions))
    }

    async fn find_public_by_email(&self, email: &str) -> anyhow::Result<Option<Subscription>> {
        Ok(find_one_by(&self.subscriptions, |s| {
            s.is_public() && s.email == email
        }))
    }

    async fn find_by_user_and_email(
        &self,
        user_id: &ID,
        email: &str,
    ) -> anyhow::Result<Option<Subscription>> {
        Ok(find_one_by(&self.subscriptions, |s| {
            s.owner.as_ref() == Some(user_id) && s.email == email
        }))
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Subscription>> {
        Ok(find_by(&self.subscriptions, |s| {
            s.owner.as_ref() == Some(user_id)
        }))
    }

    async fn find_by_unsubscribe_token(
        &self,
        token: &str,
    ) -> anyhow::Result<Option<Subscription>> {
        Ok(find_one_by(&self.subscriptions, |s| {
            s.unsubscribe_token == token
        }))
    }

    async fn find_active_reminder_subscriptions(&self) -> anyhow::Result<Vec<Subscription>> {
        Ok(find_by(&self.subscriptions, |s| s.wants_task_reminders()))
    }

    async fn delete(&self, subscription_id: &ID) -> anyhow::Result<Option<Subscription>> {
        Ok(delete(subscription_id, &self.subscriptions))
    }
}
