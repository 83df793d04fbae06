//! Error types for the road-charge engine

use std::fmt;

use thiserror::Error;

/// Which engine raised a charge error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeEngine {
    Federal,
    Cantonal,
}

impl fmt::Display for ChargeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeEngine::Federal => write!(f, "federal LSVA/RPLP"),
            ChargeEngine::Cantonal => write!(f, "cantonal vehicle tax"),
        }
    }
}

/// Calculation failures. All of them are terminal for the vehicle concerned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChargeError {
    #[error(
        "Invalid ownership window for {engine}: {reason} \
         (purchase_year={purchase_year}, resale_year={resale_year}, kilometers_per_year={kilometers_per_year})"
    )]
    InvalidOwnershipWindow {
        engine: ChargeEngine,
        purchase_year: i32,
        resale_year: i32,
        kilometers_per_year: f64,
        reason: String,
    },

    #[error("Unparseable weight in `{field}` ({value:?}): {reason}")]
    UnparseableWeight {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unsupported canton: {value:?}")]
    UnsupportedCanton { value: String },

    #[error("Unsupported powertrain for {engine}: {value:?}")]
    UnsupportedPowertrain { engine: ChargeEngine, value: String },

    #[error("Canton {canton} requires `{field}`, which was not supplied")]
    MissingJurisdictionSpecificField { canton: String, field: &'static str },

    #[error("Canton {canton} does not tax vehicles of {weight_kg} kg (light threshold {threshold_kg} kg)")]
    VehicleOutOfScope {
        canton: String,
        weight_kg: f64,
        threshold_kg: f64,
    },

    #[error("Invalid value for `{field}` ({value:?}): {reason}")]
    InvalidInput {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Tariff table errors
#[derive(Debug, Error)]
pub enum TariffError {
    #[error("Failed to parse tariff table: {0}")]
    Parse(String),

    #[error("Invalid tariff table `{table}`: {reason}")]
    Invalid { table: String, reason: String },
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Charge calculation failed: {0}")]
    Charge(#[from] ChargeError),

    #[error("Tariff error: {0}")]
    Tariff(#[from] TariffError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Fleet loader error: {0}")]
    FleetLoad(String),

    #[error("Excel export error: {0}")]
    Excel(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_error_messages_carry_context() {
        let err = ChargeError::MissingJurisdictionSpecificField {
            canton: "TI".to_string(),
            field: "power_kw",
        };
        assert_eq!(
            err.to_string(),
            "Canton TI requires `power_kw`, which was not supplied"
        );

        let err = ChargeError::UnsupportedPowertrain {
            engine: ChargeEngine::Federal,
            value: "ICEV-x".to_string(),
        };
        assert!(err.to_string().contains("federal LSVA/RPLP"));
        assert!(err.to_string().contains("ICEV-x"));
    }

    #[test]
    fn test_charge_error_converts_into_error() {
        let err: Error = ChargeError::UnsupportedCanton {
            value: "Atlantis".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Charge(ChargeError::UnsupportedCanton { .. })));
    }
}
