//! Tariff book compiled into the binary

use roadcharge_domain::model::TariffBook;
use roadcharge_domain::repository::TariffRepository;
use roadcharge_domain::DEFAULT_TARIFFS;
use roadcharge_types::Error;

#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedTariffRepository;

impl TariffRepository for EmbeddedTariffRepository {
    fn load(&self) -> Result<TariffBook, Error> {
        Ok(DEFAULT_TARIFFS.clone())
    }

    fn describe(&self) -> String {
        format!("embedded tariff book {}", DEFAULT_TARIFFS.version)
    }
}
