//! CSV fleet files
//!
//! Header row required. Columns are matched by name (case-insensitive), in any
//! order; empty cells mean "not supplied".
//!
//! Required: id, powertrain, manufacture_year, purchase_year, resale_year, kilometers_per_year
//! Optional: weight, size_class, weight_strategy, euro_class, canton, power_kw,
//! payload_kg, first_registration_year

use std::path::Path;
use std::str::FromStr;

use roadcharge_types::{EstimationStrategy, VehicleTaxInput, WeightValue};

use super::{FleetLoaderError, FleetVehicle};

const REQUIRED: [&str; 6] = [
    "id",
    "powertrain",
    "manufacture_year",
    "purchase_year",
    "resale_year",
    "kilometers_per_year",
];

pub fn load_fleet_csv<P: AsRef<Path>>(path: P) -> Result<Vec<FleetVehicle>, FleetLoaderError> {
    let content = std::fs::read_to_string(path)?;
    parse_fleet_csv(&content)
}

pub fn parse_fleet_csv(content: &str) -> Result<Vec<FleetVehicle>, FleetLoaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_ascii_lowercase())
        .collect();
    for col in REQUIRED {
        if !headers.iter().any(|h| h == col) {
            return Err(FleetLoaderError::MissingColumn(col.to_string()));
        }
    }

    let mut vehicles = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        let row = Row {
            headers: &headers,
            record: &record,
            // header is row 1
            row_num: row_idx + 2,
        };
        vehicles.push(row.to_vehicle()?);
    }

    Ok(vehicles)
}

struct Row<'a> {
    headers: &'a [String],
    record: &'a csv::StringRecord,
    row_num: usize,
}

impl Row<'_> {
    fn to_vehicle(&self) -> Result<FleetVehicle, FleetLoaderError> {
        let id = self.required_text("id")?;
        let mut input = VehicleTaxInput::new(
            self.required_text("powertrain")?,
            self.required("manufacture_year")?,
            self.required("purchase_year")?,
            self.required("resale_year")?,
            self.required("kilometers_per_year")?,
        );

        input.weight = self.text("weight").map(|w| WeightValue::Text(w.to_string()));
        input.size_class = self.text("size_class").map(str::to_string);
        input.weight_strategy = self
            .text("weight_strategy")
            .map(|s| parse_strategy(s).ok_or_else(|| self.invalid("weight_strategy", s)))
            .transpose()?;
        input.euro_class = self.text("euro_class").map(str::to_string);
        input.canton = self.text("canton").map(str::to_string);
        input.power_kw = self.optional("power_kw")?;
        input.payload_kg = self.optional("payload_kg")?;
        input.first_registration_year = self.optional("first_registration_year")?;

        Ok(FleetVehicle { id, input })
    }

    fn text(&self, column: &str) -> Option<&str> {
        let idx = self.headers.iter().position(|h| h == column)?;
        self.record.get(idx).filter(|v| !v.is_empty())
    }

    fn required_text(&self, column: &str) -> Result<String, FleetLoaderError> {
        self.text(column)
            .map(str::to_string)
            .ok_or_else(|| self.invalid(column, ""))
    }

    fn required<T: FromStr>(&self, column: &str) -> Result<T, FleetLoaderError> {
        self.optional(column)?
            .ok_or_else(|| self.invalid(column, ""))
    }

    fn optional<T: FromStr>(&self, column: &str) -> Result<Option<T>, FleetLoaderError> {
        self.text(column)
            .map(|v| v.parse::<T>().map_err(|_| self.invalid(column, v)))
            .transpose()
    }

    fn invalid(&self, column: &str, value: &str) -> FleetLoaderError {
        FleetLoaderError::InvalidValue {
            row: self.row_num,
            column: column.to_string(),
            value: value.to_string(),
        }
    }
}

fn parse_strategy(value: &str) -> Option<EstimationStrategy> {
    match value.to_ascii_lowercase().as_str() {
        "midpoint" => Some(EstimationStrategy::Midpoint),
        "upper" => Some(EstimationStrategy::Upper),
        "lower" => Some(EstimationStrategy::Lower),
        _ => None,
    }
}
