//! Swiss heavy-vehicle road charges: federal LSVA/RPLP fee and cantonal vehicle taxes
//!
//! The two entry points use the embedded tariff book and the default
//! ownership windows (federal excludes the resale year, cantonal includes it).
//! Build `FederalChargeEngine` / `CantonalChargeEngine` directly for another
//! book or window.

pub mod model;
pub mod policy;
pub mod repository;
pub mod service;

use roadcharge_types::{ChargeError, ChargeResult, VehicleCharges, VehicleTaxInput};
use tracing::instrument;

pub use model::{Canton, ResolvedWeight, TariffBook, WeightProvenance};
pub use policy::DEFAULT_TARIFFS;
pub use service::{aggregate, normalize_canton, CantonalChargeEngine, FederalChargeEngine};

pub fn compute_federal_charge(input: &VehicleTaxInput) -> Result<ChargeResult, ChargeError> {
    FederalChargeEngine::new(&DEFAULT_TARIFFS).compute(input)
}

pub fn compute_cantonal_charge(input: &VehicleTaxInput) -> Result<ChargeResult, ChargeError> {
    CantonalChargeEngine::new(&DEFAULT_TARIFFS).compute(input)
}

/// Both charges for one vehicle; fails if either engine fails
#[instrument(skip(input))]
pub fn compute_vehicle_charges(input: &VehicleTaxInput) -> Result<VehicleCharges, ChargeError> {
    let federal = compute_federal_charge(input)?;
    let cantonal = compute_cantonal_charge(input)?;
    Ok(aggregate(federal, cantonal))
}
