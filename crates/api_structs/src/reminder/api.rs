use gatherly_domain::{DispatchOutcome, ID};
use serde::{Deserialize, Serialize};

pub mod get_scheduler_status {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub running: bool,
        pub next_run_description: Option<String>,
    }
}

pub mod start_scheduler {
    pub type APIResponse = super::get_scheduler_status::APIResponse;
}

pub mod stop_scheduler {
    pub type APIResponse = super::get_scheduler_status::APIResponse;
}

pub mod run_reminders {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub success: bool,
        pub message: String,
        pub outcome: DispatchOutcome,
    }
}

pub mod run_event_reminders {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    pub type APIResponse = super::run_reminders::APIResponse;
}
