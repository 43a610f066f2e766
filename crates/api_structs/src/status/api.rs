use serde::{Deserialize, Serialize};

pub mod get_service_health {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub message: String,
        /// Whether the routine and urgent reminder jobs run in this process
        pub reminder_jobs_enabled: bool,
    }
}
