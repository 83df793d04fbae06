//! Cantons with an implemented heavy-vehicle tax formula

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Canton {
    #[serde(rename = "ZH")]
    Zurich,
    #[serde(rename = "BE")]
    Bern,
    #[serde(rename = "GE")]
    Geneva,
    #[serde(rename = "TI")]
    Ticino,
    #[serde(rename = "VD")]
    Vaud,
    #[serde(rename = "VS")]
    Valais,
    #[serde(rename = "SG")]
    StGallen,
    #[serde(rename = "LU")]
    Lucerne,
    #[serde(rename = "FR")]
    Fribourg,
    #[serde(rename = "AG")]
    Aargau,
}

impl Canton {
    pub const ALL: [Canton; 10] = [
        Canton::Zurich,
        Canton::Bern,
        Canton::Geneva,
        Canton::Ticino,
        Canton::Vaud,
        Canton::Valais,
        Canton::StGallen,
        Canton::Lucerne,
        Canton::Fribourg,
        Canton::Aargau,
    ];

    /// Official two-letter abbreviation
    pub fn code(&self) -> &'static str {
        match self {
            Canton::Zurich => "ZH",
            Canton::Bern => "BE",
            Canton::Geneva => "GE",
            Canton::Ticino => "TI",
            Canton::Vaud => "VD",
            Canton::Valais => "VS",
            Canton::StGallen => "SG",
            Canton::Lucerne => "LU",
            Canton::Fribourg => "FR",
            Canton::Aargau => "AG",
        }
    }

    /// Name in the canton's official language
    pub fn name(&self) -> &'static str {
        match self {
            Canton::Zurich => "Zürich",
            Canton::Bern => "Bern",
            Canton::Geneva => "Genève",
            Canton::Ticino => "Ticino",
            Canton::Vaud => "Vaud",
            Canton::Valais => "Valais",
            Canton::StGallen => "St. Gallen",
            Canton::Lucerne => "Luzern",
            Canton::Fribourg => "Fribourg",
            Canton::Aargau => "Aargau",
        }
    }

    /// What the annual tax is primarily assessed on
    pub fn tax_basis(&self) -> &'static str {
        match self {
            Canton::Ticino => "engine power",
            Canton::Aargau => "payload",
            Canton::Lucerne => "gross weight (linear)",
            Canton::Bern | Canton::Fribourg => "gross weight brackets",
            _ => "gross weight steps",
        }
    }

    /// Aargau taxes payload only; every other formula needs gross weight
    pub fn requires_gross_weight(&self) -> bool {
        !matches!(self, Canton::Aargau)
    }
}

impl fmt::Display for Canton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}
