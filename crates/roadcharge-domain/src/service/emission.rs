//! Powertrain and emission-era classification

use roadcharge_types::{ChargeEngine, ChargeError, EmissionEra, EuroClass, Powertrain, VehicleTaxInput};

use crate::model::EmissionPolicy;

pub fn resolve_powertrain(engine: ChargeEngine, value: &str) -> Result<Powertrain, ChargeError> {
    Powertrain::parse(value).ok_or_else(|| ChargeError::UnsupportedPowertrain {
        engine,
        value: value.to_string(),
    })
}

/// Explicit Euro class wins; otherwise the manufacture year decides
pub fn resolve_era(
    input: &VehicleTaxInput,
    policy: &EmissionPolicy,
) -> Result<EmissionEra, ChargeError> {
    match input.euro_class.as_deref() {
        Some(text) => EuroClass::parse(text)
            .map(|class| class.era())
            .ok_or_else(|| ChargeError::InvalidInput {
                field: "euro_class",
                value: text.to_string(),
                reason: "expected a Euro class between Euro 0 and Euro VII".to_string(),
            }),
        None if input.manufacture_year >= policy.modern_from_manufacture_year => {
            Ok(EmissionEra::Modern)
        }
        None => Ok(EmissionEra::Older),
    }
}

/// Note describing how the era was chosen
pub fn era_note(input: &VehicleTaxInput, era: EmissionEra) -> String {
    match input.euro_class.as_deref() {
        Some(class) => format!("Emission era {} from Euro class '{}'", era.label(), class),
        None => format!(
            "Emission era {} inferred from manufacture year {}",
            era.label(),
            input.manufacture_year
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> EmissionPolicy {
        EmissionPolicy {
            modern_from_manufacture_year: 2014,
        }
    }

    #[test]
    fn test_era_from_manufacture_year() {
        let old = VehicleTaxInput::new("ICEV-d", 2013, 2025, 2026, 1000.0);
        let new = VehicleTaxInput::new("ICEV-d", 2014, 2025, 2026, 1000.0);
        assert_eq!(resolve_era(&old, &policy()).unwrap(), EmissionEra::Older);
        assert_eq!(resolve_era(&new, &policy()).unwrap(), EmissionEra::Modern);
    }

    #[test]
    fn test_euro_class_overrides_year() {
        let input = VehicleTaxInput::new("ICEV-d", 2018, 2025, 2026, 1000.0).with_euro_class("Euro V");
        assert_eq!(resolve_era(&input, &policy()).unwrap(), EmissionEra::Older);
        assert!(era_note(&input, EmissionEra::Older).contains("Euro V"));
    }

    #[test]
    fn test_bad_euro_class() {
        let input = VehicleTaxInput::new("ICEV-d", 2018, 2025, 2026, 1000.0).with_euro_class("Euro X");
        let err = resolve_era(&input, &policy()).unwrap_err();
        assert!(matches!(err, ChargeError::InvalidInput { field: "euro_class", .. }));
    }

    #[test]
    fn test_unknown_powertrain() {
        let err = resolve_powertrain(ChargeEngine::Federal, "steam").unwrap_err();
        assert_eq!(
            err,
            ChargeError::UnsupportedPowertrain {
                engine: ChargeEngine::Federal,
                value: "steam".to_string()
            }
        );
    }
}
