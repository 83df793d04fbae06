//! Declarative tariff book
//!
//! Every rate, bracket and rebate the engines use is read from a `TariffBook`.
//! The default book is embedded from `policy/tariffs.toml`; a replacement can be
//! loaded from any TOML file with the same shape. Books are validated once on
//! load and shared read-only afterwards.

use roadcharge_types::{EmissionEra, Powertrain, TariffError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffBook {
    pub version: String,
    pub effective_from: i32,
    pub emission: EmissionPolicy,
    pub federal: FederalTariff,
    pub cantons: CantonalTariffs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionPolicy {
    pub modern_from_manufacture_year: i32,
}

/// LSVA/RPLP rates in CHF per tonne-km
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FederalTariff {
    pub category_i: f64,
    pub category_ii: f64,
    pub category_iii: f64,
    pub modern_category_ii_from: i32,
    pub zero_emission_exempt_until: i32,
    pub zero_emission_full_rate_from: i32,
    pub zero_emission_rebates: Vec<RebateStep>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebateStep {
    pub year: i32,
    pub fraction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightBracket {
    pub up_to_kg: f64,
    pub tax: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CantonalTariffs {
    pub zurich: ZurichTariff,
    pub bern: BernTariff,
    pub geneva: GenevaTariff,
    pub ticino: TicinoTariff,
    pub vaud: VaudTariff,
    pub valais: ValaisTariff,
    pub st_gallen: StGallenTariff,
    pub lucerne: LucerneTariff,
    pub fribourg: FribourgTariff,
    pub aargau: AargauTariff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZurichTariff {
    pub base: f64,
    pub threshold_kg: f64,
    pub step_kg: f64,
    pub step_rate: f64,
    pub surcharge_older: f64,
    pub surcharge_modern: f64,
    pub surcharge_zero_emission: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BernTariff {
    pub light_limit_kg: f64,
    pub minimum: f64,
    pub above_max: f64,
    pub zero_emission_reduction: f64,
    pub reduction_from_year: i32,
    pub brackets: Vec<WeightBracket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenevaTariff {
    pub base: f64,
    pub threshold_kg: f64,
    pub step_kg: f64,
    pub step_rate: f64,
    pub bev_reduction: f64,
    pub modern_reduction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicinoTariff {
    pub base: f64,
    pub rate_per_kw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaudTariff {
    pub base: f64,
    pub threshold_kg: f64,
    pub step_kg: f64,
    pub tier_break_kg: f64,
    pub tier1_step_rate: f64,
    pub tier2_step_rate: f64,
    pub secondary_base: f64,
    pub secondary_step_rate: f64,
    pub secondary_step_kg: f64,
    pub secondary_max_category: u32,
    pub low_emission_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValaisTariff {
    pub base: f64,
    pub threshold_kg: f64,
    pub step_kg: f64,
    pub step_rate: f64,
    pub linear_until_kg: f64,
    pub above_max: f64,
    pub bands: Vec<WeightBracket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StGallenTariff {
    pub first_tonne_rate: f64,
    pub bev_first_tonne_rate: f64,
    pub decay: f64,
    pub bev_registration_reduction: f64,
    pub bev_reduction_years: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LucerneTariff {
    pub rate_per_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FribourgTariff {
    pub light_limit_kg: f64,
    pub above_max: f64,
    pub bands: Vec<WeightBracket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AargauTariff {
    pub band_kg: f64,
    pub extrapolation_step: f64,
    pub payload_table: Vec<f64>,
}

impl FederalTariff {
    /// Rebate fraction for a zero-emission vehicle in `year`, if the schedule lists it
    pub fn rebate_for(&self, year: i32) -> Option<f64> {
        self.zero_emission_rebates
            .iter()
            .find(|step| step.year == year)
            .map(|step| step.fraction)
    }

    /// CHF per tonne-km for one calendar year
    pub fn rate(&self, powertrain: Powertrain, era: EmissionEra, year: i32) -> f64 {
        if powertrain.is_zero_emission() {
            if year <= self.zero_emission_exempt_until {
                0.0
            } else if year < self.zero_emission_full_rate_from {
                self.category_iii * (1.0 - self.rebate_for(year).unwrap_or(0.0))
            } else {
                self.category_iii
            }
        } else {
            match era {
                EmissionEra::Modern if year < self.modern_category_ii_from => self.category_iii,
                EmissionEra::Modern => self.category_ii,
                EmissionEra::Older => self.category_i,
            }
        }
    }
}

impl TariffBook {
    /// Parse and validate a book from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, TariffError> {
        let book: TariffBook =
            toml::from_str(content).map_err(|e| TariffError::Parse(e.to_string()))?;
        book.validate()?;
        Ok(book)
    }

    pub fn validate(&self) -> Result<(), TariffError> {
        self.validate_federal()?;
        self.validate_cantons()
    }

    fn validate_federal(&self) -> Result<(), TariffError> {
        let fed = &self.federal;
        check_amount("federal", "category_i", fed.category_i)?;
        check_amount("federal", "category_ii", fed.category_ii)?;
        check_amount("federal", "category_iii", fed.category_iii)?;

        if fed.zero_emission_full_rate_from <= fed.zero_emission_exempt_until {
            return Err(invalid(
                "federal",
                "zero_emission_full_rate_from must come after zero_emission_exempt_until",
            ));
        }

        for step in &fed.zero_emission_rebates {
            check_fraction("federal.zero_emission_rebates", &step.year.to_string(), step.fraction)?;
        }

        // Every transition year needs exactly one rebate step
        for year in (fed.zero_emission_exempt_until + 1)..fed.zero_emission_full_rate_from {
            let count = fed
                .zero_emission_rebates
                .iter()
                .filter(|s| s.year == year)
                .count();
            if count != 1 {
                return Err(invalid(
                    "federal.zero_emission_rebates",
                    &format!("year {} has {} entries, expected exactly one", year, count),
                ));
            }
        }
        if let Some(stray) = fed.zero_emission_rebates.iter().find(|s| {
            s.year <= fed.zero_emission_exempt_until || s.year >= fed.zero_emission_full_rate_from
        }) {
            return Err(invalid(
                "federal.zero_emission_rebates",
                &format!("year {} lies outside the transition period", stray.year),
            ));
        }

        let last_year = fed.zero_emission_full_rate_from + 1;
        for powertrain in Powertrain::ALL {
            for era in EmissionEra::ALL {
                for year in self.effective_from..=last_year {
                    let rate = fed.rate(powertrain, era, year);
                    if !rate.is_finite() || rate < 0.0 {
                        return Err(invalid(
                            "federal",
                            &format!(
                                "{} / {} has no valid rate for {} ({})",
                                powertrain,
                                era.label(),
                                year,
                                rate
                            ),
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    fn validate_cantons(&self) -> Result<(), TariffError> {
        let c = &self.cantons;

        check_amount("cantons.zurich", "base", c.zurich.base)?;
        check_positive("cantons.zurich", "step_kg", c.zurich.step_kg)?;
        check_amount("cantons.zurich", "step_rate", c.zurich.step_rate)?;
        check_amount("cantons.zurich", "surcharge_older", c.zurich.surcharge_older)?;
        check_amount("cantons.zurich", "surcharge_modern", c.zurich.surcharge_modern)?;
        check_amount(
            "cantons.zurich",
            "surcharge_zero_emission",
            c.zurich.surcharge_zero_emission,
        )?;

        check_amount("cantons.bern", "minimum", c.bern.minimum)?;
        check_amount("cantons.bern", "above_max", c.bern.above_max)?;
        check_fraction("cantons.bern", "zero_emission_reduction", c.bern.zero_emission_reduction)?;
        check_brackets("cantons.bern.brackets", &c.bern.brackets)?;
        if let Some(first) = c.bern.brackets.first() {
            if first.up_to_kg <= c.bern.light_limit_kg {
                return Err(invalid(
                    "cantons.bern.brackets",
                    "first bracket must lie above light_limit_kg",
                ));
            }
        }

        check_amount("cantons.geneva", "base", c.geneva.base)?;
        check_positive("cantons.geneva", "step_kg", c.geneva.step_kg)?;
        check_amount("cantons.geneva", "step_rate", c.geneva.step_rate)?;
        check_fraction("cantons.geneva", "bev_reduction", c.geneva.bev_reduction)?;
        check_fraction("cantons.geneva", "modern_reduction", c.geneva.modern_reduction)?;

        check_amount("cantons.ticino", "base", c.ticino.base)?;
        check_amount("cantons.ticino", "rate_per_kw", c.ticino.rate_per_kw)?;

        check_amount("cantons.vaud", "base", c.vaud.base)?;
        check_positive("cantons.vaud", "step_kg", c.vaud.step_kg)?;
        check_positive("cantons.vaud", "secondary_step_kg", c.vaud.secondary_step_kg)?;
        check_amount("cantons.vaud", "tier1_step_rate", c.vaud.tier1_step_rate)?;
        check_amount("cantons.vaud", "tier2_step_rate", c.vaud.tier2_step_rate)?;
        check_amount("cantons.vaud", "secondary_base", c.vaud.secondary_base)?;
        check_amount("cantons.vaud", "secondary_step_rate", c.vaud.secondary_step_rate)?;
        check_fraction("cantons.vaud", "low_emission_share", c.vaud.low_emission_share)?;
        if c.vaud.tier_break_kg <= c.vaud.threshold_kg {
            return Err(invalid("cantons.vaud", "tier_break_kg must exceed threshold_kg"));
        }
        if c.vaud.secondary_max_category == 0 {
            return Err(invalid("cantons.vaud", "secondary_max_category must be at least 1"));
        }

        check_amount("cantons.valais", "base", c.valais.base)?;
        check_positive("cantons.valais", "step_kg", c.valais.step_kg)?;
        check_amount("cantons.valais", "step_rate", c.valais.step_rate)?;
        check_amount("cantons.valais", "above_max", c.valais.above_max)?;
        check_brackets("cantons.valais.bands", &c.valais.bands)?;
        if let Some(first) = c.valais.bands.first() {
            if first.up_to_kg <= c.valais.linear_until_kg {
                return Err(invalid(
                    "cantons.valais.bands",
                    "first band must lie above linear_until_kg",
                ));
            }
        }

        check_amount("cantons.st_gallen", "first_tonne_rate", c.st_gallen.first_tonne_rate)?;
        check_amount(
            "cantons.st_gallen",
            "bev_first_tonne_rate",
            c.st_gallen.bev_first_tonne_rate,
        )?;
        check_fraction("cantons.st_gallen", "decay", c.st_gallen.decay)?;
        check_fraction(
            "cantons.st_gallen",
            "bev_registration_reduction",
            c.st_gallen.bev_registration_reduction,
        )?;
        if c.st_gallen.bev_reduction_years < 0 {
            return Err(invalid("cantons.st_gallen", "bev_reduction_years must not be negative"));
        }

        check_amount("cantons.lucerne", "rate_per_kg", c.lucerne.rate_per_kg)?;

        check_amount("cantons.fribourg", "above_max", c.fribourg.above_max)?;
        check_brackets("cantons.fribourg.bands", &c.fribourg.bands)?;
        if let Some(first) = c.fribourg.bands.first() {
            if first.up_to_kg <= c.fribourg.light_limit_kg {
                return Err(invalid(
                    "cantons.fribourg.bands",
                    "first band must lie above light_limit_kg",
                ));
            }
        }

        check_positive("cantons.aargau", "band_kg", c.aargau.band_kg)?;
        check_amount("cantons.aargau", "extrapolation_step", c.aargau.extrapolation_step)?;
        if c.aargau.payload_table.is_empty() {
            return Err(invalid("cantons.aargau.payload_table", "table is empty"));
        }
        for (i, tax) in c.aargau.payload_table.iter().enumerate() {
            check_amount("cantons.aargau.payload_table", &format!("band {}", i + 1), *tax)?;
        }

        Ok(())
    }
}

fn invalid(table: &str, reason: &str) -> TariffError {
    TariffError::Invalid {
        table: table.to_string(),
        reason: reason.to_string(),
    }
}

fn check_amount(table: &str, key: &str, value: f64) -> Result<(), TariffError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(
            table,
            &format!("{} must be a non-negative number, got {}", key, value),
        ))
    }
}

fn check_positive(table: &str, key: &str, value: f64) -> Result<(), TariffError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(
            table,
            &format!("{} must be greater than zero, got {}", key, value),
        ))
    }
}

fn check_fraction(table: &str, key: &str, value: f64) -> Result<(), TariffError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(
            table,
            &format!("{} must lie within [0, 1], got {}", key, value),
        ))
    }
}

fn check_brackets(table: &str, brackets: &[WeightBracket]) -> Result<(), TariffError> {
    if brackets.is_empty() {
        return Err(invalid(table, "bracket table is empty"));
    }
    for (i, bracket) in brackets.iter().enumerate() {
        check_positive(table, &format!("bracket {} up_to_kg", i + 1), bracket.up_to_kg)?;
        check_amount(table, &format!("bracket {} tax", i + 1), bracket.tax)?;
    }
    if brackets.windows(2).any(|w| w[1].up_to_kg <= w[0].up_to_kg) {
        return Err(invalid(table, "up_to_kg must be strictly ascending"));
    }
    Ok(())
}
