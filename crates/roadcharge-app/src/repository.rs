//! Repository adapters for the tariff book

use roadcharge_domain::model::TariffBook;
use roadcharge_domain::repository::TariffRepository;
use roadcharge_infra::{EmbeddedTariffRepository, FileTariffRepository};
use roadcharge_types::Result;
use tracing::debug;

use crate::config::Config;

/// Open the configured tariff source: the TOML override if set, otherwise the embedded book
pub fn open_tariff_repo(config: &Config) -> Result<Box<dyn TariffRepository>> {
    match &config.tariff_file {
        Some(path) => Ok(Box::new(FileTariffRepository::new(path.clone())?)),
        None => Ok(Box::new(EmbeddedTariffRepository)),
    }
}

pub fn load_tariff_book(config: &Config) -> Result<TariffBook> {
    let repo = open_tariff_repo(config)?;
    debug!(source = %repo.describe(), "loading tariff book");
    repo.load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadcharge_domain::policy::DEFAULT_TARIFFS_TOML;
    use tempfile::tempdir;

    #[test]
    fn test_embedded_by_default() {
        let repo = open_tariff_repo(&Config::default()).unwrap();
        assert_eq!(repo.describe(), "embedded tariff book 2025.1");
        assert_eq!(load_tariff_book(&Config::default()).unwrap().version, "2025.1");
    }

    #[test]
    fn test_configured_file_wins() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tariffs.toml");
        std::fs::write(&path, DEFAULT_TARIFFS_TOML.replace("2025.1", "2025.2")).unwrap();
        let config = Config {
            tariff_file: Some(path),
            ..Config::default()
        };
        let repo = open_tariff_repo(&config).unwrap();
        assert!(repo.describe().contains("tariffs.toml"));
        assert_eq!(repo.load().unwrap().version, "2025.2");
    }
}
