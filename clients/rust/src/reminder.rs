use crate::base::{APIResponse, BaseClient};
use duesoon_api_structs::run_reminder_pass;
use duesoon_domain::ReminderCadence;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

pub struct RunReminderPassInput {
    /// Subscription reminder hours are used when not set
    pub horizon_hours: Option<i64>,
    pub cooldown_hours: i64,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Runs a routine or urgent pass right away
    pub async fn run_cadence(
        &self,
        cadence: ReminderCadence,
    ) -> APIResponse<run_reminder_pass::APIResponse> {
        let body = run_reminder_pass::RequestBody {
            cadence: Some(cadence),
            ..Default::default()
        };
        self.base
            .post(body, "reminders/run".into(), StatusCode::OK)
            .await
    }

    pub async fn run(
        &self,
        input: RunReminderPassInput,
    ) -> APIResponse<run_reminder_pass::APIResponse> {
        let body = run_reminder_pass::RequestBody {
            cadence: None,
            horizon_hours: input.horizon_hours,
            cooldown_hours: Some(input.cooldown_hours),
        };
        self.base
            .post(body, "reminders/run".into(), StatusCode::OK)
            .await
    }
}
