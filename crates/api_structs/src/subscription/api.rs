use crate::dtos::SubscriptionDTO;
use duesoon_domain::{Subscription, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub subscription: SubscriptionDTO,
}

impl SubscriptionResponse {
    pub fn new(subscription: Subscription) -> Self {
        Self {
            subscription: SubscriptionDTO::new(subscription),
        }
    }
}

pub mod subscribe_public {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub email: String,
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub task_reminders: Option<bool>,
        #[serde(default)]
        pub daily_summary: Option<bool>,
        #[serde(default)]
        pub weekly_report: Option<bool>,
        #[serde(default)]
        pub reminder_hours: Option<i64>,
    }

    pub type APIResponse = SubscriptionResponse;
}

pub mod subscribe_user {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub email: String,
        #[serde(default)]
        pub task_reminders: Option<bool>,
        #[serde(default)]
        pub daily_summary: Option<bool>,
        #[serde(default)]
        pub weekly_report: Option<bool>,
        #[serde(default)]
        pub reminder_hours: Option<i64>,
    }

    pub type APIResponse = SubscriptionResponse;
}

pub mod get_user_subscriptions {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub subscriptions: Vec<SubscriptionDTO>,
    }

    impl APIResponse {
        pub fn new(subscriptions: Vec<Subscription>) -> Self {
            Self {
                subscriptions: subscriptions.into_iter().map(SubscriptionDTO::new).collect(),
            }
        }
    }
}

pub mod update_subscription {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct PathParams {
        pub user_id: ID,
        pub subscription_id: ID,
    }

    #[derive(Debug, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub is_active: Option<bool>,
        #[serde(default)]
        pub task_reminders: Option<bool>,
        #[serde(default)]
        pub daily_summary: Option<bool>,
        #[serde(default)]
        pub weekly_report: Option<bool>,
        #[serde(default)]
        pub reminder_hours: Option<i64>,
    }

    pub type APIResponse = SubscriptionResponse;
}

pub mod delete_subscription {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct PathParams {
        pub user_id: ID,
        pub subscription_id: ID,
    }

    pub type APIResponse = SubscriptionResponse;
}

pub mod unsubscribe {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct QueryParams {
        pub token: String,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub message: String,
    }
}
