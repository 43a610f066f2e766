use chrono::{DateTime, Utc};
use duesoon_domain::{Subscription, ID};
use serde::{Deserialize, Serialize};

/// Public view of a `Subscription`. Tokens are only ever delivered by email.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDTO {
    pub id: ID,
    pub email: String,
    pub user_id: Option<ID>,
    pub name: Option<String>,
    pub is_active: bool,
    pub task_reminders: bool,
    pub daily_summary: bool,
    pub weekly_report: bool,
    pub reminder_hours: i64,
    pub last_notification_sent_at: Option<DateTime<Utc>>,
    pub email_verified: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl SubscriptionDTO {
    pub fn new(subscription: Subscription) -> Self {
        Self {
            id: subscription.id,
            email: subscription.email,
            user_id: subscription.owner,
            name: subscription.name,
            is_active: subscription.is_active,
            task_reminders: subscription.task_reminders,
            daily_summary: subscription.daily_summary,
            weekly_report: subscription.weekly_report,
            reminder_hours: subscription.reminder_hours.get(),
            last_notification_sent_at: subscription.last_notification_sent_at,
            email_verified: subscription.email_verified,
            created: subscription.created,
            updated: subscription.updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn serializes_without_tokens() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let sub = Subscription::new_public("a@x.com", None, &Default::default(), now);
        let token = sub.unsubscribe_token.clone();
        let json = serde_json::to_string(&SubscriptionDTO::new(sub)).unwrap();

        assert!(json.contains("\"reminderHours\":24"));
        assert!(json.contains("\"userId\":null"));
        assert!(!json.contains(&token));
    }
}
