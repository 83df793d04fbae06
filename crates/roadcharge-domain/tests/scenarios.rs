//! End-to-end charge scenarios against the embedded tariff book

use roadcharge_domain::{
    compute_cantonal_charge, compute_federal_charge, compute_vehicle_charges, Canton,
    CantonalChargeEngine, DEFAULT_TARIFFS,
};
use roadcharge_types::{ChargeError, ChargeResult, OwnershipWindow, VehicleTaxInput};

fn assert_consistent(result: &ChargeResult) {
    let sum: f64 = result.breakdown.iter().map(|e| e.charge).sum();
    assert!((result.total_charge - sum).abs() < 1e-9);
    let back = result.cost_per_kilometer * result.total_kilometers;
    assert!((back - result.total_charge).abs() <= 1e-9 * result.total_charge.max(1.0));
}

/// Older ICEV, resale year not driven
#[test]
fn test_federal_older_icev() {
    let input = VehicleTaxInput::new("ICEV-d", 2010, 2025, 2027, 100000.0).with_weight_text("40t");
    let result = compute_federal_charge(&input).unwrap();

    assert_eq!(result.years(), vec![2025, 2026]);
    for entry in &result.breakdown {
        assert_eq!(entry.rate, 0.0326);
    }
    assert!((result.total_charge - 260800.0).abs() < 1e-6);
    assert_eq!(result.total_kilometers, 200000.0);
    assert!((result.cost_per_kilometer - 1.304).abs() < 1e-9);
    assert_consistent(&result);
}

/// BEV in the first rebate year
#[test]
fn test_federal_bev_rebate_phase_in() {
    let input = VehicleTaxInput::new("BEV", 2028, 2029, 2030, 107000.0).with_weight_tonnes(32.0);
    let result = compute_federal_charge(&input).unwrap();

    assert_eq!(result.years(), vec![2029]);
    assert!((result.breakdown[0].rate - 0.00717).abs() < 1e-12);
    assert!((result.total_charge - 24549.79).abs() < 1.0);
    assert!((result.cost_per_kilometer - 0.2294).abs() < 1e-3);
    assert_consistent(&result);
}

#[test]
fn test_federal_zero_emission_rate_schedule() {
    let input = VehicleTaxInput::new("FCEV", 2024, 2025, 2040, 1000.0).with_weight_tonnes(1.0);
    let result = compute_federal_charge(&input).unwrap();
    let cat_iii = DEFAULT_TARIFFS.federal.category_iii;

    for entry in &result.breakdown {
        let expected = match entry.year {
            y if y <= 2028 => 0.0,
            2029..=2035 => {
                let rebate = 0.7 - 0.1 * f64::from(entry.year - 2029);
                cat_iii * (1.0 - rebate)
            }
            _ => cat_iii,
        };
        assert!(
            (entry.rate - expected).abs() < 1e-12,
            "year {}: {} != {}",
            entry.year,
            entry.rate,
            expected
        );
    }
    assert_consistent(&result);
}

/// Canton A, modern ICEV, one ownership year
#[test]
fn test_cantonal_zurich() {
    let input = VehicleTaxInput::new("ICEV-d", 2019, 2025, 2026, 90000.0)
        .with_weight_text("18000 kg")
        .with_canton("Zürich");
    let result = CantonalChargeEngine::new(&DEFAULT_TARIFFS)
        .with_window(OwnershipWindow::ExcludeResaleYear)
        .compute(&input)
        .unwrap();

    assert_eq!(result.breakdown.len(), 1);
    assert_eq!(result.total_charge, 1534.0);
    assert_consistent(&result);
}

/// Canton D without power
#[test]
fn test_cantonal_ticino_missing_power() {
    let input = VehicleTaxInput::new("ICEV-d", 2019, 2025, 2026, 90000.0)
        .with_weight_tonnes(18.0)
        .with_canton("TI");
    let err = compute_cantonal_charge(&input).unwrap_err();
    assert_eq!(
        err,
        ChargeError::MissingJurisdictionSpecificField {
            canton: "TI".to_string(),
            field: "power_kw",
        }
    );
}

#[test]
fn test_st_gallen_bev_reduction_spans_window() {
    let input = VehicleTaxInput::new("BEV", 2023, 2025, 2028, 60000.0)
        .with_weight_tonnes(1.0)
        .with_first_registration_year(2023)
        .with_canton("Sankt Gallen");
    let result = compute_cantonal_charge(&input).unwrap();

    let charges: Vec<f64> = result.breakdown.iter().map(|e| e.charge).collect();
    assert_eq!(result.years(), vec![2025, 2026, 2027, 2028]);
    assert!((charges[0] - 48.0).abs() < 1e-9);
    assert!((charges[1] - 48.0).abs() < 1e-9);
    assert!((charges[2] - 120.0).abs() < 1e-9);
    assert!((charges[3] - 120.0).abs() < 1e-9);
    assert_consistent(&result);
}

#[test]
fn test_every_canton_name_resolves() {
    for canton in Canton::ALL {
        let input = VehicleTaxInput::new("ICEV-d", 2019, 2025, 2026, 90000.0)
            .with_size_class("articulated >32t")
            .with_power_kw(350.0)
            .with_payload_kg(25000.0)
            .with_canton(canton.name());
        let result = compute_cantonal_charge(&input).unwrap();
        assert!(result.total_charge > 0.0, "{}", canton);
        assert!(result.notes.iter().any(|n| n.contains("lower bound")));
        assert_consistent(&result);
    }
}

#[test]
fn test_vehicle_charges_combine_both_engines() {
    let input = VehicleTaxInput::new("ICEV-d", 2010, 2025, 2027, 100000.0)
        .with_weight_tonnes(40.0)
        .with_canton("Lucerne");
    let charges = compute_vehicle_charges(&input).unwrap();

    assert!((charges.federal_cost_per_km - 1.304).abs() < 1e-9);
    // 0.048 × 40000 per year, three years inclusive
    assert!((charges.cantonal.total_charge - 3.0 * 1920.0).abs() < 1e-9);
    assert!((charges.cantonal_cost_per_km - 5760.0 / 300000.0).abs() < 1e-12);
    assert!(
        (charges.total_cost_per_km - charges.federal_cost_per_km - charges.cantonal_cost_per_km)
            .abs()
            < 1e-12
    );
}

#[test]
fn test_invalid_window_fails_both_engines() {
    let input = VehicleTaxInput::new("ICEV-d", 2010, 2027, 2025, 100000.0)
        .with_weight_tonnes(40.0)
        .with_canton("ZH");
    assert!(matches!(
        compute_federal_charge(&input).unwrap_err(),
        ChargeError::InvalidOwnershipWindow { .. }
    ));
    assert!(matches!(
        compute_vehicle_charges(&input).unwrap_err(),
        ChargeError::InvalidOwnershipWindow { .. }
    ));
}
