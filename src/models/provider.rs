use serde::{Deserialize, Serialize};

/// Summary figures shown on the provider dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDashboard {
    pub leads: u32,
    pub rating: f64,
    pub active_projects: u32,
}

impl ProviderDashboard {
    /// Figures served until providers have real accounts behind them
    #[must_use]
    pub fn sample() -> Self {
        Self {
            leads: 24,
            rating: 4.8,
            active_projects: 8,
        }
    }
}
