use serde::{Deserialize, Serialize};

/// Lifecycle state of the host application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AppState {
    Active,
    Inactive,
    Background,
}

impl AppState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}
