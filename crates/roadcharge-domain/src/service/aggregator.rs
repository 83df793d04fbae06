//! Merge of federal and cantonal results into per-km figures

use roadcharge_types::{ChargeResult, VehicleCharges};

/// Relabels the two results; nothing is recalculated
pub fn aggregate(federal: ChargeResult, cantonal: ChargeResult) -> VehicleCharges {
    VehicleCharges {
        federal_cost_per_km: federal.cost_per_kilometer,
        cantonal_cost_per_km: cantonal.cost_per_kilometer,
        total_cost_per_km: federal.cost_per_kilometer + cantonal.cost_per_kilometer,
        federal,
        cantonal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadcharge_types::ChargeBreakdownEntry;

    fn result(year: i32, km: f64, charge: f64) -> ChargeResult {
        ChargeResult::from_breakdown(
            vec![ChargeBreakdownEntry {
                year,
                kilometers: km,
                tonnes: 18.0,
                rate: 0.0,
                charge,
            }],
            vec![],
        )
    }

    #[test]
    fn test_aggregate_keeps_breakdowns() {
        let federal = result(2025, 1000.0, 500.0);
        let cantonal = result(2025, 1000.0, 100.0);
        let charges = aggregate(federal.clone(), cantonal.clone());
        assert_eq!(charges.federal_cost_per_km, 0.5);
        assert_eq!(charges.cantonal_cost_per_km, 0.1);
        assert!((charges.total_cost_per_km - 0.6).abs() < 1e-12);
        assert_eq!(charges.federal, federal);
        assert_eq!(charges.cantonal, cantonal);
    }
}
