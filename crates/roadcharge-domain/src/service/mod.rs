//! Domain services

pub mod aggregator;
pub mod canton_normalizer;
pub mod cantonal_charge;
pub mod cantonal_formulas;
pub mod emission;
pub mod federal_charge;
pub mod ownership;
pub mod weight_resolver;

pub use aggregator::aggregate;
pub use canton_normalizer::normalize_canton;
pub use cantonal_charge::CantonalChargeEngine;
pub use cantonal_formulas::{annual_tax, AnnualTax, VehicleProfile};
pub use federal_charge::FederalChargeEngine;
pub use weight_resolver::{parse_class_band, parse_tonnes, resolve_weight};
