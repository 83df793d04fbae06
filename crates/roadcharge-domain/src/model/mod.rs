//! Domain model types

pub mod canton;
pub mod tariff;
pub mod weight;

pub use canton::Canton;
pub use tariff::{
    AargauTariff, BernTariff, CantonalTariffs, EmissionPolicy, FederalTariff, FribourgTariff,
    GenevaTariff, LucerneTariff, RebateStep, StGallenTariff, TariffBook, TicinoTariff,
    ValaisTariff, VaudTariff, WeightBracket, ZurichTariff,
};
pub use weight::{ClassBand, ResolvedWeight, VehicleCategory, WeightProvenance};
