//! Tariff repository implementations

mod embedded_tariff_repo;
mod file_tariff_repo;

pub use embedded_tariff_repo::EmbeddedTariffRepository;
pub use file_tariff_repo::FileTariffRepository;
