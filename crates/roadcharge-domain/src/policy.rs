//! Embedded default tariff book

use std::sync::LazyLock;

use crate::model::TariffBook;

/// Raw TOML of the default book, shipped with the crate
pub const DEFAULT_TARIFFS_TOML: &str = include_str!("../policy/tariffs.toml");

/// Default book, parsed and validated on first use.
/// The embedded file is covered by tests, so a failure here is a build defect.
pub static DEFAULT_TARIFFS: LazyLock<TariffBook> = LazyLock::new(|| {
    TariffBook::from_toml_str(DEFAULT_TARIFFS_TOML).expect("embedded tariffs.toml is invalid")
});
