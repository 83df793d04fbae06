//! Fleet evaluation results

use serde::{Deserialize, Serialize};

use crate::VehicleCharges;

/// Outcome for one fleet vehicle: charges, or the error that stopped it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canton: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charges: Option<VehicleCharges>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FleetEntry {
    pub fn is_ok(&self) -> bool {
        self.charges.is_some()
    }
}

/// Fleet evaluation results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetResults {
    /// Entries in fleet-file order
    pub entries: Vec<FleetEntry>,
    pub total_processed: usize,
    pub successful: usize,
    pub failed: usize,
    /// Version of the tariff book used
    pub tariff_version: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

impl FleetResults {
    /// Mean total cost per km over the successful entries
    pub fn mean_total_cost_per_km(&self) -> Option<f64> {
        let values: Vec<f64> = self
            .entries
            .iter()
            .filter_map(|e| e.charges.as_ref())
            .map(|c| c.total_cost_per_km)
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }
}
