//! File-based implementation of TariffRepository (TOML)

use std::path::{Path, PathBuf};

use roadcharge_domain::model::TariffBook;
use roadcharge_domain::repository::TariffRepository;
use roadcharge_types::Error;
use tracing::info;

/// Tariff book read from a TOML file with the same shape as the embedded one
pub struct FileTariffRepository {
    toml_path: PathBuf,
    book: TariffBook,
}

impl FileTariffRepository {
    /// Read and validate the file
    pub fn new(toml_path: PathBuf) -> Result<Self, Error> {
        let book = load_book(&toml_path)?;
        Ok(Self { toml_path, book })
    }
}

impl TariffRepository for FileTariffRepository {
    fn load(&self) -> Result<TariffBook, Error> {
        Ok(self.book.clone())
    }

    fn describe(&self) -> String {
        format!(
            "tariff book {} from {}",
            self.book.version,
            self.toml_path.display()
        )
    }
}

fn load_book(path: &Path) -> Result<TariffBook, Error> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let book = TariffBook::from_toml_str(&content)?;
    info!(path = %path.display(), version = %book.version, "tariff book loaded");
    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadcharge_domain::policy::DEFAULT_TARIFFS_TOML;
    use roadcharge_types::TariffError;
    use tempfile::tempdir;

    #[test]
    fn test_load_copy_of_default_book() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tariffs.toml");
        std::fs::write(&path, DEFAULT_TARIFFS_TOML).unwrap();

        let repo = FileTariffRepository::new(path.clone()).unwrap();
        assert_eq!(repo.load().unwrap().version, "2025.1");
        assert!(repo.describe().contains("tariffs.toml"));
    }

    #[test]
    fn test_override_rate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tariffs.toml");
        let edited = DEFAULT_TARIFFS_TOML
            .replace("version = \"2025.1\"", "version = \"2026.1\"")
            .replace("rate_per_kg = 0.048", "rate_per_kg = 0.05");
        std::fs::write(&path, edited).unwrap();

        let repo = FileTariffRepository::new(path).unwrap();
        let book = repo.load().unwrap();
        assert_eq!(book.version, "2026.1");
        assert_eq!(book.cantons.lucerne.rate_per_kg, 0.05);
        assert!(repo.describe().starts_with("tariff book 2026.1"));
    }

    #[test]
    fn test_invalid_book_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tariffs.toml");
        let broken = DEFAULT_TARIFFS_TOML.replace("{ year = 2031, fraction = 0.5 },", "");
        std::fs::write(&path, broken).unwrap();

        let err = FileTariffRepository::new(path).err().unwrap();
        assert!(matches!(err, Error::Tariff(TariffError::Invalid { .. })));
    }

    #[test]
    fn test_missing_file() {
        let err = FileTariffRepository::new(PathBuf::from("/nonexistent/tariffs.toml"))
            .err()
            .unwrap();
        assert!(matches!(err, Error::FileNotFound(_)));
    }
}
