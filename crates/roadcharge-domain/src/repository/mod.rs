//! Repository trait definitions

use roadcharge_types::Error;

use crate::model::TariffBook;

/// Source of the active tariff book
pub trait TariffRepository {
    /// Load and validate the book
    fn load(&self) -> Result<TariffBook, Error>;

    /// Where the book comes from, for display
    fn describe(&self) -> String;
}
