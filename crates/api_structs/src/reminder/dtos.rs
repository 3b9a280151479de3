use rxminder_domain::ReconcileSummary;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileSummaryDTO {
    pub scheduled: usize,
    pub already_scheduled: usize,
    pub skipped: usize,
    pub failed: usize,
    pub pruned: usize,
}

impl ReconcileSummaryDTO {
    pub fn new(summary: ReconcileSummary) -> Self {
        Self {
            scheduled: summary.scheduled,
            already_scheduled: summary.already_scheduled,
            skipped: summary.skipped,
            failed: summary.failed,
            pruned: summary.pruned,
        }
    }
}
