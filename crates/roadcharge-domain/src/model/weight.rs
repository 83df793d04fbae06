//! Gross weight types

use roadcharge_types::EstimationStrategy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Vehicle category tag of a class-band descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleCategory {
    Rigid,
    Articulated,
}

impl VehicleCategory {
    pub fn label(&self) -> &'static str {
        match self {
            VehicleCategory::Rigid => "rigid",
            VehicleCategory::Articulated => "articulated",
        }
    }
}

/// Weight range in tonnes. `max_tonnes == None` means open-ended (">32t").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassBand {
    pub category: Option<VehicleCategory>,
    pub min_tonnes: f64,
    pub max_tonnes: Option<f64>,
}

impl ClassBand {
    pub fn is_open_ended(&self) -> bool {
        self.max_tonnes.is_none()
    }

    /// Collapse the band to one tonnage. Open-ended bands always give the lower bound.
    pub fn estimate(&self, strategy: EstimationStrategy) -> f64 {
        let Some(max) = self.max_tonnes else {
            return self.min_tonnes;
        };
        match strategy {
            EstimationStrategy::Midpoint => (self.min_tonnes + max) / 2.0,
            EstimationStrategy::Upper => max,
            EstimationStrategy::Lower => self.min_tonnes,
        }
    }
}

impl fmt::Display for ClassBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(category) = self.category {
            write!(f, "{} ", category.label())?;
        }
        match self.max_tonnes {
            None => write!(f, ">{}t", self.min_tonnes),
            Some(max) if max == self.min_tonnes => write!(f, "{}t", max),
            Some(max) => write!(f, "{}-{}t", self.min_tonnes, max),
        }
    }
}

/// Where a resolved tonnage came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WeightProvenance {
    Exact,
    Estimated {
        band: ClassBand,
        strategy: EstimationStrategy,
    },
}

/// Gross weight ready for rate formulas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedWeight {
    pub tonnes: f64,
    pub provenance: WeightProvenance,
}

impl ResolvedWeight {
    pub fn exact(tonnes: f64) -> Self {
        Self {
            tonnes,
            provenance: WeightProvenance::Exact,
        }
    }

    pub fn kilograms(&self) -> f64 {
        self.tonnes * 1000.0
    }

    pub fn is_estimated(&self) -> bool {
        matches!(self.provenance, WeightProvenance::Estimated { .. })
    }

    /// Human-readable provenance for result notes, `None` for exact weights
    pub fn note(&self) -> Option<String> {
        match self.provenance {
            WeightProvenance::Exact => None,
            WeightProvenance::Estimated { band, .. } if band.is_open_ended() => Some(format!(
                "Gross weight estimated from open-ended class band '{}': lower bound {} t used",
                band, self.tonnes
            )),
            WeightProvenance::Estimated { band, strategy } => Some(format!(
                "Gross weight estimated from class band '{}' ({} strategy): {} t",
                band, strategy, self.tonnes
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_estimate_strategies() {
        let band = ClassBand {
            category: Some(VehicleCategory::Rigid),
            min_tonnes: 20.0,
            max_tonnes: Some(26.0),
        };
        assert_eq!(band.estimate(EstimationStrategy::Midpoint), 23.0);
        assert_eq!(band.estimate(EstimationStrategy::Upper), 26.0);
        assert_eq!(band.estimate(EstimationStrategy::Lower), 20.0);
    }

    #[test]
    fn test_open_band_ignores_strategy() {
        let band = ClassBand {
            category: Some(VehicleCategory::Articulated),
            min_tonnes: 32.0,
            max_tonnes: None,
        };
        assert_eq!(band.estimate(EstimationStrategy::Upper), 32.0);
        assert_eq!(band.estimate(EstimationStrategy::Midpoint), 32.0);
        assert_eq!(band.to_string(), "articulated >32t");
    }

    #[test]
    fn test_exact_weight_has_no_note() {
        let w = ResolvedWeight::exact(40.0);
        assert_eq!(w.kilograms(), 40000.0);
        assert!(w.note().is_none());
        assert!(!w.is_estimated());
    }
}
