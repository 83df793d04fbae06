//! JSON fleet files: an array of vehicle records, each with an `id`

use std::path::Path;

use super::{FleetLoaderError, FleetVehicle};

pub fn load_fleet_json<P: AsRef<Path>>(path: P) -> Result<Vec<FleetVehicle>, FleetLoaderError> {
    let content = std::fs::read_to_string(path)?;
    parse_fleet_json(&content)
}

pub fn parse_fleet_json(content: &str) -> Result<Vec<FleetVehicle>, FleetLoaderError> {
    Ok(serde_json::from_str(content)?)
}
