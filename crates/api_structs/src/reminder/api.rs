use duesoon_domain::{ReminderCadence, ReminderPassSummary};
use serde::{Deserialize, Serialize};

pub mod run_reminder_pass {
    use super::*;

    /// Either a named `cadence` or explicit pass parameters. A missing
    /// `horizonHours` means every subscription uses its own reminder hours.
    #[derive(Debug, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub cadence: Option<ReminderCadence>,
        #[serde(default)]
        pub horizon_hours: Option<i64>,
        #[serde(default)]
        pub cooldown_hours: Option<i64>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub sent: usize,
        pub failed: usize,
        pub total: usize,
    }

    impl APIResponse {
        pub fn new(summary: ReminderPassSummary) -> Self {
            Self {
                sent: summary.sent,
                failed: summary.failed,
                total: summary.total,
            }
        }
    }
}
