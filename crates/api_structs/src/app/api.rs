use rxminder_domain::AppState;
use serde::{Deserialize, Serialize};

pub mod set_app_state {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub state: AppState,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub state: AppState,
        /// Number of listeners that were informed about the state change
        pub listeners: usize,
    }
}
