use crate::base::{APIResponse, BaseClient};
use duesoon_api_structs::*;
use duesoon_domain::ID;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct SubscriptionClient {
    base: Arc<BaseClient>,
}

/// Notification preferences. `None` keeps the default or current value.
#[derive(Debug, Clone, Default)]
pub struct PreferencesInput {
    pub task_reminders: Option<bool>,
    pub daily_summary: Option<bool>,
    pub weekly_report: Option<bool>,
    pub reminder_hours: Option<i64>,
}

pub struct SubscribePublicInput {
    pub email: String,
    pub name: Option<String>,
    pub preferences: PreferencesInput,
}

pub struct SubscribeUserInput {
    pub user_id: ID,
    pub email: String,
    pub preferences: PreferencesInput,
}

pub struct UpdateSubscriptionInput {
    pub user_id: ID,
    pub subscription_id: ID,
    pub is_active: Option<bool>,
    pub preferences: PreferencesInput,
}

impl SubscriptionClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn subscribe_public(
        &self,
        input: SubscribePublicInput,
    ) -> APIResponse<subscribe_public::APIResponse> {
        let body = subscribe_public::RequestBody {
            email: input.email,
            name: input.name,
            task_reminders: input.preferences.task_reminders,
            daily_summary: input.preferences.daily_summary,
            weekly_report: input.preferences.weekly_report,
            reminder_hours: input.preferences.reminder_hours,
        };
        self.base
            .post(body, "subscriptions/public".into(), StatusCode::CREATED)
            .await
    }

    pub async fn subscribe_user(
        &self,
        input: SubscribeUserInput,
    ) -> APIResponse<subscribe_user::APIResponse> {
        let body = subscribe_user::RequestBody {
            email: input.email,
            task_reminders: input.preferences.task_reminders,
            daily_summary: input.preferences.daily_summary,
            weekly_report: input.preferences.weekly_report,
            reminder_hours: input.preferences.reminder_hours,
        };
        self.base
            .post(
                body,
                format!("user/{}/subscriptions", input.user_id),
                StatusCode::CREATED,
            )
            .await
    }

    pub async fn get_by_user(
        &self,
        user_id: ID,
    ) -> APIResponse<get_user_subscriptions::APIResponse> {
        self.base
            .get(format!("user/{}/subscriptions", user_id), StatusCode::OK)
            .await
    }

    pub async fn update(
        &self,
        input: UpdateSubscriptionInput,
    ) -> APIResponse<update_subscription::APIResponse> {
        let body = update_subscription::RequestBody {
            is_active: input.is_active,
            task_reminders: input.preferences.task_reminders,
            daily_summary: input.preferences.daily_summary,
            weekly_report: input.preferences.weekly_report,
            reminder_hours: input.preferences.reminder_hours,
        };
        self.base
            .put(
                body,
                format!(
                    "user/{}/subscriptions/{}",
                    input.user_id, input.subscription_id
                ),
                StatusCode::OK,
            )
            .await
    }

    pub async fn delete(
        &self,
        user_id: ID,
        subscription_id: ID,
    ) -> APIResponse<delete_subscription::APIResponse> {
        self.base
            .delete(
                format!("user/{}/subscriptions/{}", user_id, subscription_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn unsubscribe(&self, token: String) -> APIResponse<unsubscribe::APIResponse> {
        let query = unsubscribe::QueryParams { token };
        self.base
            .post_query(query, "subscriptions/unsubscribe".into(), StatusCode::OK)
            .await
    }
}
