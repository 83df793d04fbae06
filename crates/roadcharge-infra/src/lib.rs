//! Infrastructure layer: tariff book sources and fleet file loaders

pub mod fleet;
pub mod persistence;

pub use fleet::{load_fleet, FleetLoaderError, FleetVehicle};
pub use persistence::{EmbeddedTariffRepository, FileTariffRepository};
