//! Ownership window validation

use roadcharge_types::{ChargeEngine, ChargeError, OwnershipWindow, VehicleTaxInput};

/// Longest ownership period the engines evaluate
pub const MAX_OWNERSHIP_YEARS: i64 = 100;

/// Calendar years charged by `engine` under `window`
pub fn ownership_years(
    engine: ChargeEngine,
    input: &VehicleTaxInput,
    window: OwnershipWindow,
) -> Result<Vec<i32>, ChargeError> {
    let fail = |reason: &str| ChargeError::InvalidOwnershipWindow {
        engine,
        purchase_year: input.purchase_year,
        resale_year: input.resale_year,
        kilometers_per_year: input.kilometers_per_year,
        reason: reason.to_string(),
    };

    if input.resale_year <= input.purchase_year {
        return Err(fail("resale_year must be after purchase_year"));
    }
    let span = i64::from(input.resale_year) - i64::from(input.purchase_year);
    if span > MAX_OWNERSHIP_YEARS {
        return Err(fail(&format!(
            "ownership period of {} years exceeds {} years",
            span, MAX_OWNERSHIP_YEARS
        )));
    }
    if !input.kilometers_per_year.is_finite() || input.kilometers_per_year <= 0.0 {
        return Err(fail("kilometers_per_year must be greater than zero"));
    }

    Ok(window.years(input.purchase_year, input.resale_year))
}

pub fn window_note(window: OwnershipWindow, years: &[i32]) -> String {
    let span = match (years.first(), years.last()) {
        (Some(first), Some(last)) if first != last => format!("{}-{}", first, last),
        (Some(first), _) => first.to_string(),
        _ => "none".to_string(),
    };
    let rule = match window {
        OwnershipWindow::ExcludeResaleYear => "resale year excluded",
        OwnershipWindow::IncludeResaleYear => "resale year included",
    };
    format!("Ownership window {} ({}, {} years)", span, rule, years.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows() {
        let input = VehicleTaxInput::new("BEV", 2020, 2025, 2027, 50000.0);
        let federal =
            ownership_years(ChargeEngine::Federal, &input, OwnershipWindow::ExcludeResaleYear).unwrap();
        assert_eq!(federal, vec![2025, 2026]);
        let cantonal =
            ownership_years(ChargeEngine::Cantonal, &input, OwnershipWindow::IncludeResaleYear)
                .unwrap();
        assert_eq!(cantonal, vec![2025, 2026, 2027]);
        assert_eq!(
            window_note(OwnershipWindow::IncludeResaleYear, &cantonal),
            "Ownership window 2025-2027 (resale year included, 3 years)"
        );
    }

    #[test]
    fn test_resale_not_after_purchase() {
        let input = VehicleTaxInput::new("BEV", 2020, 2025, 2025, 50000.0);
        let err = ownership_years(ChargeEngine::Cantonal, &input, OwnershipWindow::IncludeResaleYear)
            .unwrap_err();
        assert!(matches!(
            err,
            ChargeError::InvalidOwnershipWindow {
                engine: ChargeEngine::Cantonal,
                ..
            }
        ));
    }

    #[test]
    fn test_overlong_window_rejected() {
        let input = VehicleTaxInput::new("BEV", 2020, i32::MIN, i32::MAX, 50000.0);
        let err = ownership_years(ChargeEngine::Federal, &input, OwnershipWindow::ExcludeResaleYear)
            .unwrap_err();
        assert!(matches!(err, ChargeError::InvalidOwnershipWindow { .. }));

        let input = VehicleTaxInput::new("BEV", 2020, 2000, 2100, 50000.0);
        let years =
            ownership_years(ChargeEngine::Cantonal, &input, OwnershipWindow::IncludeResaleYear)
                .unwrap();
        assert_eq!(years.len(), 101);
    }

    #[test]
    fn test_non_positive_distance() {
        for km in [0.0, -10.0, f64::NAN] {
            let input = VehicleTaxInput::new("BEV", 2020, 2025, 2026, km);
            assert!(
                ownership_years(ChargeEngine::Federal, &input, OwnershipWindow::ExcludeResaleYear)
                    .is_err()
            );
        }
    }
}
