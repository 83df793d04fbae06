//! Vehicle input and charge result records

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Powertrains known to the charge engines
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Powertrain {
    #[serde(rename = "BEV")]
    Bev,
    #[serde(rename = "FCEV")]
    Fcev,
    #[serde(rename = "ICEV-d")]
    IcevD,
    #[serde(rename = "ICEV-g")]
    IcevG,
    #[serde(rename = "HEV-d")]
    HevD,
    #[serde(rename = "PHEV-d")]
    PhevD,
}

impl Powertrain {
    pub const ALL: [Powertrain; 6] = [
        Powertrain::Bev,
        Powertrain::Fcev,
        Powertrain::IcevD,
        Powertrain::IcevG,
        Powertrain::HevD,
        Powertrain::PhevD,
    ];

    /// Parse a powertrain code such as "ICEV-d" (case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|pt| pt.code().eq_ignore_ascii_case(value))
    }

    pub fn code(&self) -> &'static str {
        match self {
            Powertrain::Bev => "BEV",
            Powertrain::Fcev => "FCEV",
            Powertrain::IcevD => "ICEV-d",
            Powertrain::IcevG => "ICEV-g",
            Powertrain::HevD => "HEV-d",
            Powertrain::PhevD => "PHEV-d",
        }
    }

    /// No tailpipe emissions (battery or fuel cell)
    pub fn is_zero_emission(&self) -> bool {
        matches!(self, Powertrain::Bev | Powertrain::Fcev)
    }

    pub fn is_hybrid(&self) -> bool {
        matches!(self, Powertrain::HevD | Powertrain::PhevD)
    }
}

impl fmt::Display for Powertrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Euro emission standard
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EuroClass {
    Euro0,
    Euro1,
    Euro2,
    Euro3,
    Euro4,
    Euro5,
    Euro6,
    Euro7,
}

impl EuroClass {
    /// Parse "Euro VI", "EURO-6", "euro_5", "VI", "6" and similar spellings
    pub fn parse(value: &str) -> Option<Self> {
        let compact: String = value
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_uppercase();
        let level = compact.strip_prefix("EURO").unwrap_or(&compact);
        let class = match level {
            "0" => EuroClass::Euro0,
            "1" | "I" => EuroClass::Euro1,
            "2" | "II" => EuroClass::Euro2,
            "3" | "III" => EuroClass::Euro3,
            "4" | "IV" => EuroClass::Euro4,
            "5" | "V" | "EEV" => EuroClass::Euro5,
            "6" | "VI" => EuroClass::Euro6,
            "7" | "VII" => EuroClass::Euro7,
            _ => return None,
        };
        Some(class)
    }

    pub fn era(&self) -> EmissionEra {
        if *self >= EuroClass::Euro6 {
            EmissionEra::Modern
        } else {
            EmissionEra::Older
        }
    }
}

/// Emission era used to select tariff categories
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmissionEra {
    /// Euro 0 to V
    Older,
    /// Euro VI and newer
    Modern,
}

impl EmissionEra {
    pub const ALL: [EmissionEra; 2] = [EmissionEra::Older, EmissionEra::Modern];

    pub fn label(&self) -> &'static str {
        match self {
            EmissionEra::Older => "Euro 0-V",
            EmissionEra::Modern => "Euro VI+",
        }
    }
}

/// How a class-band descriptor collapses to a single tonnage
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimationStrategy {
    #[default]
    Midpoint,
    Upper,
    Lower,
}

impl fmt::Display for EstimationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimationStrategy::Midpoint => write!(f, "midpoint"),
            EstimationStrategy::Upper => write!(f, "upper"),
            EstimationStrategy::Lower => write!(f, "lower"),
        }
    }
}

/// Which calendar years of the ownership period are charged
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OwnershipWindow {
    /// `purchase_year..resale_year`, the vehicle is not driven in the resale year
    ExcludeResaleYear,
    /// `purchase_year..=resale_year`
    IncludeResaleYear,
}

impl OwnershipWindow {
    pub fn years(&self, purchase_year: i32, resale_year: i32) -> Vec<i32> {
        match self {
            OwnershipWindow::ExcludeResaleYear => (purchase_year..resale_year).collect(),
            OwnershipWindow::IncludeResaleYear => (purchase_year..=resale_year).collect(),
        }
    }
}

impl fmt::Display for OwnershipWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnershipWindow::ExcludeResaleYear => write!(f, "exclude-resale-year"),
            OwnershipWindow::IncludeResaleYear => write!(f, "include-resale-year"),
        }
    }
}

/// Explicit gross weight, either a bare number of tonnes or text like "40t"
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightValue {
    Tonnes(f64),
    Text(String),
}

impl fmt::Display for WeightValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightValue::Tonnes(t) => write!(f, "{}", t),
            WeightValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Attribute record for one vehicle, as delivered by upstream nomenclature translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleTaxInput {
    /// Powertrain code (BEV, FCEV, ICEV-d, ICEV-g, HEV-d, PHEV-d)
    pub powertrain: String,

    /// Exact gross weight; wins over `size_class` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<WeightValue>,

    /// Class-band descriptor, e.g. "rigid 20-26t" or "articulated >32t"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_class: Option<String>,

    /// Overrides the configured estimation strategy for class bands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_strategy: Option<EstimationStrategy>,

    pub manufacture_year: i32,

    /// Explicit Euro class, overrides the year-based era inference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub euro_class: Option<String>,

    pub purchase_year: i32,
    pub resale_year: i32,
    pub kilometers_per_year: f64,

    /// Free-form canton name, only needed for the cantonal tax
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canton: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_kw: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_kg: Option<f64>,

    /// Defaults to `manufacture_year`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_registration_year: Option<i32>,
}

impl VehicleTaxInput {
    pub fn new(
        powertrain: impl Into<String>,
        manufacture_year: i32,
        purchase_year: i32,
        resale_year: i32,
        kilometers_per_year: f64,
    ) -> Self {
        Self {
            powertrain: powertrain.into(),
            weight: None,
            size_class: None,
            weight_strategy: None,
            manufacture_year,
            euro_class: None,
            purchase_year,
            resale_year,
            kilometers_per_year,
            canton: None,
            power_kw: None,
            payload_kg: None,
            first_registration_year: None,
        }
    }

    pub fn with_weight_tonnes(mut self, tonnes: f64) -> Self {
        self.weight = Some(WeightValue::Tonnes(tonnes));
        self
    }

    pub fn with_weight_text(mut self, text: impl Into<String>) -> Self {
        self.weight = Some(WeightValue::Text(text.into()));
        self
    }

    pub fn with_size_class(mut self, descriptor: impl Into<String>) -> Self {
        self.size_class = Some(descriptor.into());
        self
    }

    pub fn with_weight_strategy(mut self, strategy: EstimationStrategy) -> Self {
        self.weight_strategy = Some(strategy);
        self
    }

    pub fn with_euro_class(mut self, euro_class: impl Into<String>) -> Self {
        self.euro_class = Some(euro_class.into());
        self
    }

    pub fn with_canton(mut self, canton: impl Into<String>) -> Self {
        self.canton = Some(canton.into());
        self
    }

    pub fn with_power_kw(mut self, power_kw: f64) -> Self {
        self.power_kw = Some(power_kw);
        self
    }

    pub fn with_payload_kg(mut self, payload_kg: f64) -> Self {
        self.payload_kg = Some(payload_kg);
        self
    }

    pub fn with_first_registration_year(mut self, year: i32) -> Self {
        self.first_registration_year = Some(year);
        self
    }

    pub fn first_registration_year(&self) -> i32 {
        self.first_registration_year.unwrap_or(self.manufacture_year)
    }
}

/// One evaluated calendar year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeBreakdownEntry {
    pub year: i32,
    pub kilometers: f64,
    pub tonnes: f64,
    /// CHF per tonne-km for the federal fee, CHF per year for cantonal taxes
    pub rate: f64,
    pub charge: f64,
}

/// Aggregated charge over the ownership window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeResult {
    pub total_charge: f64,
    pub total_kilometers: f64,
    pub cost_per_kilometer: f64,
    pub breakdown: Vec<ChargeBreakdownEntry>,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl ChargeResult {
    /// Sum a per-year breakdown into totals
    pub fn from_breakdown(breakdown: Vec<ChargeBreakdownEntry>, notes: Vec<String>) -> Self {
        let total_charge: f64 = breakdown.iter().map(|e| e.charge).sum();
        let total_kilometers: f64 = breakdown.iter().map(|e| e.kilometers).sum();
        let cost_per_kilometer = if total_kilometers > 0.0 {
            total_charge / total_kilometers
        } else {
            0.0
        };

        Self {
            total_charge,
            total_kilometers,
            cost_per_kilometer,
            breakdown,
            notes,
        }
    }

    pub fn years(&self) -> Vec<i32> {
        self.breakdown.iter().map(|e| e.year).collect()
    }
}

/// Federal and cantonal charges for one vehicle, as consumed by the cost pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleCharges {
    pub federal_cost_per_km: f64,
    pub cantonal_cost_per_km: f64,
    pub total_cost_per_km: f64,
    pub federal: ChargeResult,
    pub cantonal: ChargeResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_powertrain_parse() {
        assert_eq!(Powertrain::parse("BEV"), Some(Powertrain::Bev));
        assert_eq!(Powertrain::parse(" icev-d "), Some(Powertrain::IcevD));
        assert_eq!(Powertrain::parse("PHEV-d"), Some(Powertrain::PhevD));
        assert_eq!(Powertrain::parse("PHEV-p"), None);
        assert_eq!(Powertrain::parse(""), None);
    }

    #[test]
    fn test_powertrain_serde_uses_codes() {
        let json = serde_json::to_string(&Powertrain::IcevG).unwrap();
        assert_eq!(json, "\"ICEV-g\"");
    }

    #[test]
    fn test_euro_class_parse() {
        assert_eq!(EuroClass::parse("Euro VI"), Some(EuroClass::Euro6));
        assert_eq!(EuroClass::parse("EURO-5"), Some(EuroClass::Euro5));
        assert_eq!(EuroClass::parse("euro_iii"), Some(EuroClass::Euro3));
        assert_eq!(EuroClass::parse("VII"), Some(EuroClass::Euro7));
        assert_eq!(EuroClass::parse("Euro 9"), None);
    }

    #[test]
    fn test_euro_class_era() {
        assert_eq!(EuroClass::Euro5.era(), EmissionEra::Older);
        assert_eq!(EuroClass::Euro6.era(), EmissionEra::Modern);
        assert_eq!(EuroClass::Euro7.era(), EmissionEra::Modern);
    }

    #[test]
    fn test_ownership_window_years() {
        assert_eq!(
            OwnershipWindow::ExcludeResaleYear.years(2025, 2027),
            vec![2025, 2026]
        );
        assert_eq!(
            OwnershipWindow::IncludeResaleYear.years(2025, 2027),
            vec![2025, 2026, 2027]
        );
    }

    #[test]
    fn test_weight_value_untagged() {
        let v: WeightValue = serde_json::from_str("40").unwrap();
        assert_eq!(v, WeightValue::Tonnes(40.0));
        let v: WeightValue = serde_json::from_str("\"40t\"").unwrap();
        assert_eq!(v, WeightValue::Text("40t".to_string()));
    }

    #[test]
    fn test_input_deserialize_defaults() {
        let json = r#"{
            "powertrain": "ICEV-d",
            "weight": "40t",
            "manufacture_year": 2010,
            "purchase_year": 2025,
            "resale_year": 2027,
            "kilometers_per_year": 100000
        }"#;
        let input: VehicleTaxInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.weight, Some(WeightValue::Text("40t".to_string())));
        assert!(input.canton.is_none());
        assert_eq!(input.first_registration_year(), 2010);
    }

    #[test]
    fn test_charge_result_from_breakdown() {
        let breakdown = vec![
            ChargeBreakdownEntry {
                year: 2025,
                kilometers: 1000.0,
                tonnes: 10.0,
                rate: 0.01,
                charge: 100.0,
            },
            ChargeBreakdownEntry {
                year: 2026,
                kilometers: 1000.0,
                tonnes: 10.0,
                rate: 0.02,
                charge: 200.0,
            },
        ];
        let result = ChargeResult::from_breakdown(breakdown, vec![]);
        assert!((result.total_charge - 300.0).abs() < 1e-9);
        assert!((result.total_kilometers - 2000.0).abs() < 1e-9);
        assert!((result.cost_per_kilometer - 0.15).abs() < 1e-9);
        assert_eq!(result.years(), vec![2025, 2026]);
    }

    #[test]
    fn test_charge_result_empty_guard() {
        let result = ChargeResult::from_breakdown(vec![], vec![]);
        assert_eq!(result.cost_per_kilometer, 0.0);
    }
}
