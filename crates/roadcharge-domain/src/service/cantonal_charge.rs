//! Cantonal annual vehicle-tax engine
//!
//! Normalizes the canton name, builds a `VehicleProfile` and evaluates the
//! canton's formula once per ownership year, so calendar-year rebates (Bern,
//! St. Gallen) show up year by year in the breakdown.

use roadcharge_types::{
    ChargeBreakdownEntry, ChargeEngine, ChargeError, ChargeResult, EstimationStrategy,
    OwnershipWindow, VehicleTaxInput,
};
use tracing::{debug, instrument};

use crate::model::{Canton, ResolvedWeight, TariffBook};
use crate::service::cantonal_formulas::{annual_tax, VehicleProfile};
use crate::service::canton_normalizer::normalize_canton;
use crate::service::emission::{era_note, resolve_era, resolve_powertrain};
use crate::service::ownership::{ownership_years, window_note};
use crate::service::weight_resolver::resolve_weight;

pub struct CantonalChargeEngine<'a> {
    book: &'a TariffBook,
    window: OwnershipWindow,
    strategy: EstimationStrategy,
}

impl<'a> CantonalChargeEngine<'a> {
    pub fn new(book: &'a TariffBook) -> Self {
        Self {
            book,
            window: OwnershipWindow::IncludeResaleYear,
            strategy: EstimationStrategy::default(),
        }
    }

    pub fn with_window(mut self, window: OwnershipWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_default_strategy(mut self, strategy: EstimationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Canton named by the input
    pub fn canton_of(input: &VehicleTaxInput) -> Result<Canton, ChargeError> {
        let name = input.canton.as_deref().ok_or_else(|| ChargeError::InvalidInput {
            field: "canton",
            value: String::new(),
            reason: "a canton is required for the cantonal vehicle tax".to_string(),
        })?;
        normalize_canton(name).ok_or_else(|| ChargeError::UnsupportedCanton {
            value: name.to_string(),
        })
    }

    #[instrument(skip(self, input), fields(canton = input.canton.as_deref().unwrap_or("")))]
    pub fn compute(&self, input: &VehicleTaxInput) -> Result<ChargeResult, ChargeError> {
        let canton = Self::canton_of(input)?;
        let powertrain = resolve_powertrain(ChargeEngine::Cantonal, &input.powertrain)?;
        let years = ownership_years(ChargeEngine::Cantonal, input, self.window)?;
        let era = resolve_era(input, &self.book.emission)?;
        let weight = self.resolve_weight(canton, input)?;

        let profile = VehicleProfile {
            weight_kg: weight.map(|w| round_kg(w.kilograms())),
            powertrain,
            era,
            power_kw: non_negative("power_kw", input.power_kw)?,
            payload_kg: non_negative("payload_kg", input.payload_kg)?,
            first_registration_year: input.first_registration_year(),
        };

        let mut notes = vec![
            format!("Canton {}, taxed on {}", canton, canton.tax_basis()),
            window_note(self.window, &years),
            era_note(input, era),
        ];
        if let Some(note) = weight.and_then(|w| w.note()) {
            notes.push(note);
        }

        let mut breakdown = Vec::with_capacity(years.len());
        for &year in &years {
            let tax = annual_tax(canton, &self.book.cantons, &profile, year)?;
            debug!(canton = canton.code(), year, amount = tax.amount, "cantonal year evaluated");
            if let Some(adjustment) = tax.adjustment {
                notes.push(format!("{}: {}", year, adjustment));
            }
            breakdown.push(ChargeBreakdownEntry {
                year,
                kilometers: input.kilometers_per_year,
                tonnes: weight.map(|w| w.tonnes).unwrap_or(0.0),
                rate: tax.amount,
                charge: tax.amount,
            });
        }

        Ok(ChargeResult::from_breakdown(breakdown, notes))
    }

    /// Gross weight is mandatory unless the canton taxes payload only;
    /// a supplied but broken weight is still an error there
    fn resolve_weight(
        &self,
        canton: Canton,
        input: &VehicleTaxInput,
    ) -> Result<Option<ResolvedWeight>, ChargeError> {
        let supplied = input.weight.is_some() || input.size_class.is_some();
        if !canton.requires_gross_weight() && !supplied {
            return Ok(None);
        }
        resolve_weight(
            input.weight.as_ref(),
            input.size_class.as_deref(),
            input.weight_strategy.unwrap_or(self.strategy),
        )
        .map(Some)
        .map_err(|e| match e {
            ChargeError::UnparseableWeight {
                field,
                value,
                reason,
            } => ChargeError::UnparseableWeight {
                field,
                value,
                reason: format!("cantonal tax, canton {}: {}", canton.code(), reason),
            },
            other => other,
        })
    }
}

fn non_negative(field: &'static str, value: Option<f64>) -> Result<Option<f64>, ChargeError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(ChargeError::InvalidInput {
            field,
            value: v.to_string(),
            reason: "must be a non-negative number".to_string(),
        }),
        other => Ok(other),
    }
}

/// Gram precision, so 18.3 t compares as 18300 kg in the step formulas
fn round_kg(kg: f64) -> f64 {
    (kg * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::DEFAULT_TARIFFS;

    fn engine() -> CantonalChargeEngine<'static> {
        CantonalChargeEngine::new(&DEFAULT_TARIFFS)
    }

    #[test]
    fn test_zurich_single_year() {
        let input = VehicleTaxInput::new("ICEV-d", 2020, 2025, 2026, 80000.0)
            .with_weight_tonnes(18.0)
            .with_canton("Zürich");
        let result = engine()
            .with_window(OwnershipWindow::ExcludeResaleYear)
            .compute(&input)
            .unwrap();
        assert_eq!(result.years(), vec![2025]);
        assert_eq!(result.total_charge, 1534.0);
    }

    #[test]
    fn test_inclusive_window_by_default() {
        let input = VehicleTaxInput::new("ICEV-d", 2020, 2025, 2027, 80000.0)
            .with_weight_tonnes(18.0)
            .with_canton("ZH");
        let result = engine().compute(&input).unwrap();
        assert_eq!(result.years(), vec![2025, 2026, 2027]);
        assert_eq!(result.total_charge, 3.0 * 1534.0);
        assert_eq!(result.total_kilometers, 240000.0);
    }

    #[test]
    fn test_bern_rebate_per_year() {
        let input = VehicleTaxInput::new("BEV", 2022, 2023, 2026, 50000.0)
            .with_weight_tonnes(40.0)
            .with_canton("Berne");
        let result = engine().compute(&input).unwrap();
        let charges: Vec<f64> = result.breakdown.iter().map(|e| e.charge).collect();
        assert_eq!(charges, vec![1500.0, 1500.0, 750.0, 750.0]);
        assert!(result.notes.iter().any(|n| n.starts_with("2025:")));
    }

    #[test]
    fn test_ticino_without_power() {
        let input = VehicleTaxInput::new("ICEV-d", 2020, 2025, 2026, 80000.0)
            .with_weight_tonnes(18.0)
            .with_canton("Tessin");
        let err = engine().compute(&input).unwrap_err();
        assert!(matches!(
            err,
            ChargeError::MissingJurisdictionSpecificField {
                field: "power_kw",
                ..
            }
        ));
    }

    #[test]
    fn test_aargau_needs_no_gross_weight() {
        let input = VehicleTaxInput::new("ICEV-d", 2020, 2025, 2026, 80000.0)
            .with_payload_kg(9000.0)
            .with_canton("Argovie");
        let result = engine().compute(&input).unwrap();
        assert_eq!(result.breakdown[0].tonnes, 0.0);
        assert_eq!(result.breakdown[0].charge, 528.0);
    }

    #[test]
    fn test_aargau_rejects_broken_weight() {
        let input = VehicleTaxInput::new("ICEV-d", 2020, 2025, 2026, 80000.0)
            .with_payload_kg(9000.0)
            .with_weight_text("heavy")
            .with_canton("AG");
        match engine().compute(&input).unwrap_err() {
            ChargeError::UnparseableWeight { field, reason, .. } => {
                assert_eq!(field, "weight");
                assert!(reason.starts_with("cantonal tax, canton AG:"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_light_fribourg_vehicle_out_of_scope() {
        let input = VehicleTaxInput::new("ICEV-d", 2020, 2025, 2026, 20000.0)
            .with_weight_text("3,5 t")
            .with_canton("Freiburg");
        assert_eq!(
            engine().compute(&input).unwrap_err(),
            ChargeError::VehicleOutOfScope {
                canton: "FR".to_string(),
                weight_kg: 3500.0,
                threshold_kg: 3500.0,
            }
        );

        let input = VehicleTaxInput::new("ICEV-d", 2020, 2025, 2026, 20000.0)
            .with_weight_tonnes(7.5)
            .with_canton("FR");
        assert_eq!(engine().compute(&input).unwrap().breakdown[0].charge, 700.0);
    }

    #[test]
    fn test_unknown_and_missing_canton() {
        let input = VehicleTaxInput::new("ICEV-d", 2020, 2025, 2026, 80000.0)
            .with_weight_tonnes(18.0)
            .with_canton("Basel-Stadt");
        assert_eq!(
            engine().compute(&input).unwrap_err(),
            ChargeError::UnsupportedCanton {
                value: "Basel-Stadt".to_string()
            }
        );

        let input = VehicleTaxInput::new("ICEV-d", 2020, 2025, 2026, 80000.0).with_weight_tonnes(18.0);
        assert!(matches!(
            engine().compute(&input).unwrap_err(),
            ChargeError::InvalidInput { field: "canton", .. }
        ));
    }

    #[test]
    fn test_negative_power_is_invalid() {
        let input = VehicleTaxInput::new("ICEV-d", 2020, 2025, 2026, 80000.0)
            .with_weight_tonnes(18.0)
            .with_power_kw(-5.0)
            .with_canton("TI");
        assert!(matches!(
            engine().compute(&input).unwrap_err(),
            ChargeError::InvalidInput {
                field: "power_kw",
                ..
            }
        ));
    }

    #[test]
    fn test_fractional_tonnes_round_to_kg() {
        let input = VehicleTaxInput::new("ICEV-d", 2020, 2025, 2026, 80000.0)
            .with_weight_text("18,3 t")
            .with_canton("Genf");
        let result = engine()
            .with_window(OwnershipWindow::ExcludeResaleYear)
            .compute(&input)
            .unwrap();
        // 250 + 60 × 15, 35% off
        assert!((result.total_charge - 1150.0 * 0.65).abs() < 1e-6);
    }
}
