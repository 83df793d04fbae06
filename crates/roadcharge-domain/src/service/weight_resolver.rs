//! Weight resolution
//!
//! Turns an explicit weight ("40t", "3,5 t", 18) or a class-band descriptor
//! ("rigid 20-26t", "articulated >32t") into one tonnage with a provenance tag.
//! Nothing outside this module parses weight text.

use roadcharge_types::{ChargeError, EstimationStrategy, WeightValue};

use crate::model::{ClassBand, ResolvedWeight, VehicleCategory, WeightProvenance};

/// Resolve gross weight. An explicit weight wins over the class band.
pub fn resolve_weight(
    weight: Option<&WeightValue>,
    size_class: Option<&str>,
    strategy: EstimationStrategy,
) -> Result<ResolvedWeight, ChargeError> {
    if let Some(value) = weight {
        let tonnes = match value {
            WeightValue::Tonnes(t) => Some(*t),
            WeightValue::Text(text) => parse_tonnes(text),
        };
        return match tonnes {
            Some(t) if t.is_finite() && t > 0.0 => Ok(ResolvedWeight::exact(t)),
            Some(t) => Err(ChargeError::UnparseableWeight {
                field: "weight",
                value: value.to_string(),
                reason: format!("gross weight must be greater than zero, got {} t", t),
            }),
            None => Err(ChargeError::UnparseableWeight {
                field: "weight",
                value: value.to_string(),
                reason: "expected a tonnage such as '40t' or '3.5 t'".to_string(),
            }),
        };
    }

    let Some(descriptor) = size_class else {
        return Err(ChargeError::UnparseableWeight {
            field: "weight",
            value: String::new(),
            reason: "neither an explicit weight nor a size_class descriptor was supplied"
                .to_string(),
        });
    };

    let band = parse_class_band(descriptor).ok_or_else(|| ChargeError::UnparseableWeight {
        field: "size_class",
        value: descriptor.to_string(),
        reason: "expected '[rigid|articulated] <N>t', '<N>-<M>t' or '>N t'".to_string(),
    })?;

    Ok(ResolvedWeight {
        tonnes: band.estimate(strategy),
        provenance: WeightProvenance::Estimated { band, strategy },
    })
}

/// Parse a tonnage such as "40t", " 3,5 t", "40" or "18000 kg"
pub fn parse_tonnes(text: &str) -> Option<f64> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
        .replace(',', ".");

    if let Some(kg) = compact.strip_suffix("kg") {
        return parse_number(kg).map(|v| v / 1000.0);
    }

    let number = ["tonnes", "tonnen", "tons", "ton", "t"]
        .iter()
        .find_map(|suffix| compact.strip_suffix(suffix))
        .unwrap_or(&compact);

    parse_number(number)
}

/// Parse a class-band descriptor into a weight range
pub fn parse_class_band(descriptor: &str) -> Option<ClassBand> {
    let normalized = descriptor.to_lowercase().replace(['–', '—'], "-");

    let mut category = None;
    let mut value = String::new();
    for token in normalized.split_whitespace() {
        let word = token.trim_matches(|c| c == ',' || c == ':' || c == ';');
        if let Some(cat) = category_alias(word) {
            if category.replace(cat).is_some_and(|prev| prev != cat) {
                return None;
            }
        } else if word == "to" {
            value.push('-');
        } else {
            value.push_str(word);
        }
    }

    let value = value.replace(',', ".");
    if value.is_empty() {
        return None;
    }

    let open_lower = value
        .strip_prefix(">=")
        .or_else(|| value.strip_prefix('>'))
        .or_else(|| value.strip_prefix('≥'))
        .map(str::to_string)
        .or_else(|| value.contains('+').then(|| value.replace('+', "")));

    let band = if let Some(lower) = open_lower {
        ClassBand {
            category,
            min_tonnes: band_bound(&lower)?,
            max_tonnes: None,
        }
    } else if let Some((lo, hi)) = value.split_once('-') {
        let (min, max) = (band_bound(lo)?, band_bound(hi)?);
        if max < min {
            return None;
        }
        ClassBand {
            category,
            min_tonnes: min,
            max_tonnes: Some(max),
        }
    } else {
        let exact = band_bound(&value)?;
        ClassBand {
            category,
            min_tonnes: exact,
            max_tonnes: Some(exact),
        }
    };

    Some(band)
}

fn category_alias(word: &str) -> Option<VehicleCategory> {
    match word {
        "rigid" | "truck" | "lorry" | "solo" => Some(VehicleCategory::Rigid),
        "articulated" | "semi" | "tractor" | "trailer" => Some(VehicleCategory::Articulated),
        _ => None,
    }
}

fn band_bound(text: &str) -> Option<f64> {
    let tonnes = parse_tonnes(text)?;
    (tonnes > 0.0).then_some(tonnes)
}

fn parse_number(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}
