use crate::dtos::ReconcileSummaryDTO;
use rxminder_domain::{ReconcileSummary, UserId};
use serde::{Deserialize, Serialize};

pub mod reconcile_reminders {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: UserId,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub summary: ReconcileSummaryDTO,
    }

    impl APIResponse {
        pub fn new(summary: ReconcileSummary) -> Self {
            Self {
                summary: ReconcileSummaryDTO::new(summary),
            }
        }
    }
}
