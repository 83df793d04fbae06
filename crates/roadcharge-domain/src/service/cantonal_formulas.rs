//! Annual vehicle-tax formulas of the ten supported cantons
//!
//! Each formula is a pure function of its tariff table and the vehicle
//! attributes it needs. `annual_tax` is the single dispatch point; its match
//! over `Canton` is exhaustive, so a new canton does not compile until it has
//! a formula.

use roadcharge_types::{ChargeError, EmissionEra, Powertrain};

use crate::model::{
    AargauTariff, BernTariff, Canton, CantonalTariffs, FribourgTariff, GenevaTariff,
    LucerneTariff, StGallenTariff, TicinoTariff, ValaisTariff, VaudTariff, WeightBracket,
    ZurichTariff,
};

/// Vehicle attributes the cantonal formulas read
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleProfile {
    /// Gross weight; `None` only when the canton does not need it
    pub weight_kg: Option<f64>,
    pub powertrain: Powertrain,
    pub era: EmissionEra,
    pub power_kw: Option<f64>,
    pub payload_kg: Option<f64>,
    pub first_registration_year: i32,
}

/// Tax for one calendar year, with the rebate that was applied, if any
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualTax {
    pub amount: f64,
    pub adjustment: Option<String>,
}

impl AnnualTax {
    fn flat(amount: f64) -> Self {
        Self {
            amount,
            adjustment: None,
        }
    }

    fn reduced(amount: f64, fraction: f64, label: &str) -> Self {
        Self {
            amount: amount * (1.0 - fraction),
            adjustment: Some(format!("{} {}% off", label, round_percent(fraction))),
        }
    }
}

pub fn annual_tax(
    canton: Canton,
    tariffs: &CantonalTariffs,
    profile: &VehicleProfile,
    year: i32,
) -> Result<AnnualTax, ChargeError> {
    let tax = match canton {
        Canton::Zurich => zurich(
            &tariffs.zurich,
            gross_weight(canton, profile)?,
            profile.powertrain,
            profile.era,
        ),
        Canton::Bern => bern(
            &tariffs.bern,
            gross_weight(canton, profile)?,
            profile.powertrain,
            year,
        ),
        Canton::Geneva => geneva(
            &tariffs.geneva,
            gross_weight(canton, profile)?,
            profile.powertrain,
            profile.era,
        ),
        Canton::Ticino => {
            let power_kw = profile
                .power_kw
                .ok_or_else(|| missing(canton, "power_kw"))?;
            ticino(&tariffs.ticino, power_kw)
        }
        Canton::Vaud => vaud(
            &tariffs.vaud,
            gross_weight(canton, profile)?,
            profile.powertrain,
        ),
        Canton::Valais => valais(&tariffs.valais, gross_weight(canton, profile)?),
        Canton::StGallen => st_gallen(
            &tariffs.st_gallen,
            gross_weight(canton, profile)?,
            profile.powertrain,
            profile.first_registration_year,
            year,
        ),
        Canton::Lucerne => lucerne(&tariffs.lucerne, gross_weight(canton, profile)?),
        Canton::Fribourg => fribourg(&tariffs.fribourg, gross_weight(canton, profile)?)?,
        Canton::Aargau => {
            let payload_kg = profile
                .payload_kg
                .ok_or_else(|| missing(canton, "payload_kg"))?;
            aargau(&tariffs.aargau, payload_kg)
        }
    };
    Ok(tax)
}

/// A: 500 kg steps above 4 t plus an emission surcharge
pub fn zurich(
    t: &ZurichTariff,
    weight_kg: f64,
    powertrain: Powertrain,
    era: EmissionEra,
) -> AnnualTax {
    let base = t.base + t.step_rate * steps_above(weight_kg, t.threshold_kg, t.step_kg);
    let surcharge = if powertrain.is_zero_emission() {
        t.surcharge_zero_emission
    } else {
        match era {
            EmissionEra::Older => t.surcharge_older,
            EmissionEra::Modern => t.surcharge_modern,
        }
    };
    AnnualTax::flat(base + surcharge)
}

/// B: bracket table, zero-emission reduction from a fixed calendar year
pub fn bern(t: &BernTariff, weight_kg: f64, powertrain: Powertrain, year: i32) -> AnnualTax {
    let tax = if weight_kg <= t.light_limit_kg {
        t.minimum
    } else {
        bracket_lookup(&t.brackets, weight_kg).unwrap_or(t.above_max)
    };
    if powertrain.is_zero_emission() && year >= t.reduction_from_year {
        AnnualTax::reduced(tax, t.zero_emission_reduction, "zero-emission")
    } else {
        AnnualTax::flat(tax)
    }
}

/// C: 1000 kg steps above 4 t; BEV and modern-era reductions do not compound
pub fn geneva(
    t: &GenevaTariff,
    weight_kg: f64,
    powertrain: Powertrain,
    era: EmissionEra,
) -> AnnualTax {
    let tax = t.base + t.step_rate * steps_above(weight_kg, t.threshold_kg, t.step_kg);
    if powertrain == Powertrain::Bev {
        AnnualTax::reduced(tax, t.bev_reduction, "BEV")
    } else if era == EmissionEra::Modern {
        AnnualTax::reduced(tax, t.modern_reduction, "Euro VI+")
    } else {
        AnnualTax::flat(tax)
    }
}

/// D: fixed base plus a rate per kW
pub fn ticino(t: &TicinoTariff, power_kw: f64) -> AnnualTax {
    AnnualTax::flat(t.base + t.rate_per_kw * power_kw)
}

/// E: two-tier weight stepping; low-emission vehicles pay a share of the secondary category
pub fn vaud(t: &VaudTariff, weight_kg: f64, powertrain: Powertrain) -> AnnualTax {
    if powertrain.is_zero_emission() || powertrain.is_hybrid() {
        let category = vaud_secondary_category(t, weight_kg);
        let tariff = t.secondary_base + t.secondary_step_rate * f64::from(category);
        return AnnualTax {
            amount: tariff * t.low_emission_share,
            adjustment: Some(format!(
                "low-emission: {}% of secondary category {} tariff",
                round_percent(t.low_emission_share),
                category
            )),
        };
    }

    let tier1 = steps_above(weight_kg.min(t.tier_break_kg), t.threshold_kg, t.step_kg);
    let tier2 = steps_above(weight_kg, t.tier_break_kg, t.step_kg);
    AnnualTax::flat(t.base + t.tier1_step_rate * tier1 + t.tier2_step_rate * tier2)
}

pub fn vaud_secondary_category(t: &VaudTariff, weight_kg: f64) -> u32 {
    let raw = steps_above(weight_kg, t.threshold_kg, t.secondary_step_kg) as u32;
    raw.clamp(1, t.secondary_max_category)
}

/// F: 1000 kg steps up to 23 t, flat bands above
pub fn valais(t: &ValaisTariff, weight_kg: f64) -> AnnualTax {
    let tax = if weight_kg <= t.linear_until_kg {
        t.base + t.step_rate * steps_above(weight_kg, t.threshold_kg, t.step_kg)
    } else {
        bracket_lookup(&t.bands, weight_kg).unwrap_or(t.above_max)
    };
    AnnualTax::flat(tax)
}

/// G: every started tonne taxed at the previous tonne's rate less `decay`,
/// summed in closed form
pub fn st_gallen(
    t: &StGallenTariff,
    weight_kg: f64,
    powertrain: Powertrain,
    first_registration_year: i32,
    year: i32,
) -> AnnualTax {
    let is_bev = powertrain == Powertrain::Bev;
    let first_rate = if is_bev {
        t.bev_first_tonne_rate
    } else {
        t.first_tonne_rate
    };

    // Geometric series over the started tonnes
    let tonnes = (weight_kg / 1000.0).ceil().max(0.0);
    let tax = if t.decay > 0.0 {
        first_rate * (1.0 - (1.0 - t.decay).powf(tonnes)) / t.decay
    } else {
        first_rate * tonnes
    };

    let since_registration = i64::from(year) - i64::from(first_registration_year);
    let in_reduction =
        since_registration >= 0 && since_registration < i64::from(t.bev_reduction_years);
    if is_bev && in_reduction {
        AnnualTax::reduced(tax, t.bev_registration_reduction, "BEV first-registration")
    } else {
        AnnualTax::flat(tax)
    }
}

/// H: linear rate per kg
pub fn lucerne(t: &LucerneTariff, weight_kg: f64) -> AnnualTax {
    AnnualTax::flat(t.rate_per_kg * weight_kg)
}

/// I: band table; light vehicles are outside this tax
pub fn fribourg(t: &FribourgTariff, weight_kg: f64) -> Result<AnnualTax, ChargeError> {
    if weight_kg <= t.light_limit_kg {
        return Err(ChargeError::VehicleOutOfScope {
            canton: Canton::Fribourg.code().to_string(),
            weight_kg,
            threshold_kg: t.light_limit_kg,
        });
    }
    let tax = bracket_lookup(&t.bands, weight_kg).unwrap_or(t.above_max);
    Ok(AnnualTax::flat(tax))
}

/// J: payload bands, extrapolated past the published table
pub fn aargau(t: &AargauTariff, payload_kg: f64) -> AnnualTax {
    let band = ((payload_kg / t.band_kg).ceil() as usize).max(1);
    let table = &t.payload_table;
    let tax = match table.get(band - 1) {
        Some(tax) => *tax,
        None => {
            let last = table.last().copied().unwrap_or(0.0);
            last + t.extrapolation_step * (band - table.len()) as f64
        }
    };
    AnnualTax::flat(tax)
}

/// Number of started `step_kg` steps above `threshold_kg`
fn steps_above(weight_kg: f64, threshold_kg: f64, step_kg: f64) -> f64 {
    if weight_kg <= threshold_kg {
        0.0
    } else {
        ((weight_kg - threshold_kg) / step_kg).ceil()
    }
}

/// First bracket whose upper bound (inclusive) covers the weight
fn bracket_lookup(brackets: &[WeightBracket], weight_kg: f64) -> Option<f64> {
    brackets
        .iter()
        .find(|b| weight_kg <= b.up_to_kg)
        .map(|b| b.tax)
}

fn gross_weight(canton: Canton, profile: &VehicleProfile) -> Result<f64, ChargeError> {
    profile.weight_kg.ok_or_else(|| ChargeError::UnparseableWeight {
        field: "weight",
        value: String::new(),
        reason: format!("canton {} taxes gross weight, none was resolved", canton.code()),
    })
}

fn missing(canton: Canton, field: &'static str) -> ChargeError {
    ChargeError::MissingJurisdictionSpecificField {
        canton: canton.code().to_string(),
        field,
    }
}

fn round_percent(fraction: f64) -> f64 {
    (fraction * 1000.0).round() / 10.0
}
