//! Fleet files: a list of vehicles with ids, as JSON or CSV

mod csv_loader;
mod json_loader;

use std::path::Path;

use roadcharge_types::VehicleTaxInput;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use csv_loader::{load_fleet_csv, parse_fleet_csv};
pub use json_loader::{load_fleet_json, parse_fleet_json};

/// One vehicle of a fleet file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetVehicle {
    pub id: String,
    #[serde(flatten)]
    pub input: VehicleTaxInput,
}

#[derive(Error, Debug)]
pub enum FleetLoaderError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid value in row {row}, column {column}: {value:?}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Duplicate vehicle id: {0}")]
    DuplicateId(String),

    #[error("Unsupported fleet file extension: {0:?} (expected .json or .csv)")]
    UnsupportedFormat(String),
}

impl From<FleetLoaderError> for roadcharge_types::Error {
    fn from(e: FleetLoaderError) -> Self {
        match e {
            FleetLoaderError::IoError(io) => roadcharge_types::Error::Io(io),
            other => roadcharge_types::Error::FleetLoad(other.to_string()),
        }
    }
}

/// Load a fleet file, choosing the format by extension
pub fn load_fleet(path: &Path) -> Result<Vec<FleetVehicle>, FleetLoaderError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let vehicles = match ext.as_str() {
        "json" => load_fleet_json(path)?,
        "csv" => load_fleet_csv(path)?,
        _ => return Err(FleetLoaderError::UnsupportedFormat(ext)),
    };
    check_unique_ids(&vehicles)?;
    Ok(vehicles)
}

fn check_unique_ids(vehicles: &[FleetVehicle]) -> Result<(), FleetLoaderError> {
    let mut seen = std::collections::HashSet::new();
    for v in vehicles {
        if !seen.insert(v.id.as_str()) {
            return Err(FleetLoaderError::DuplicateId(v.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_dispatch_by_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fleet.txt");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            load_fleet(&path),
            Err(FleetLoaderError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fleet.csv");
        std::fs::write(
            &path,
            "id,powertrain,weight,manufacture_year,purchase_year,resale_year,kilometers_per_year\n\
             T1,ICEV-d,40t,2010,2025,2027,100000\n\
             T1,BEV,32t,2024,2029,2030,107000\n",
        )
        .unwrap();
        assert!(matches!(
            load_fleet(&path),
            Err(FleetLoaderError::DuplicateId(id)) if id == "T1"
        ));
    }

    #[test]
    fn test_loader_error_converts() {
        let err: roadcharge_types::Error = FleetLoaderError::MissingColumn("id".to_string()).into();
        assert!(matches!(err, roadcharge_types::Error::FleetLoad(_)));
    }
}
