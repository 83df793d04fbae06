//! Excel export of fleet results

use std::path::Path;

use roadcharge_types::{Error, FleetResults, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

fn excel_err(e: XlsxError) -> Error {
    Error::Excel(e.to_string())
}

/// Export fleet results: a summary sheet, one row per vehicle, one row per charged year
pub fn export_to_excel(results: &FleetResults, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, results)?;

    let vehicles_sheet = workbook.add_worksheet();
    write_vehicles_sheet(vehicles_sheet, results)?;

    let years_sheet = workbook.add_worksheet();
    write_years_sheet(years_sheet, results)?;

    workbook.save(output_path).map_err(excel_err)?;

    Ok(())
}

fn write_summary_sheet(sheet: &mut Worksheet, results: &FleetResults) -> Result<()> {
    sheet.set_name("Summary").map_err(excel_err)?;

    let header_format = Format::new().set_bold();
    sheet
        .write_string_with_format(0, 0, "Swiss Road Charge Fleet Report", &header_format)
        .map_err(excel_err)?;

    let rows: [(&str, String); 6] = [
        ("Evaluated:", results.started_at.to_rfc3339()),
        ("Tariff book:", results.tariff_version.clone()),
        ("Vehicles:", results.total_processed.to_string()),
        ("Successful:", results.successful.to_string()),
        ("Failed:", results.failed.to_string()),
        (
            "Mean CHF/km:",
            results
                .mean_total_cost_per_km()
                .map(|v| format!("{:.4}", v))
                .unwrap_or_else(|| "-".to_string()),
        ),
    ];
    for (i, (label, value)) in rows.iter().enumerate() {
        let row = (i + 2) as u32;
        sheet.write_string(row, 0, *label).map_err(excel_err)?;
        sheet.write_string(row, 1, value).map_err(excel_err)?;
    }

    sheet.set_column_width(0, 16).map_err(excel_err)?;
    sheet.set_column_width(1, 32).map_err(excel_err)?;

    Ok(())
}

fn write_vehicles_sheet(sheet: &mut Worksheet, results: &FleetResults) -> Result<()> {
    sheet.set_name("Vehicles").map_err(excel_err)?;

    let header_format = Format::new().set_bold();
    let headers = [
        "Vehicle",
        "Canton",
        "Federal total (CHF)",
        "Cantonal total (CHF)",
        "Federal CHF/km",
        "Cantonal CHF/km",
        "Total CHF/km",
        "Error",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(excel_err)?;
    }

    for (row_idx, entry) in results.entries.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        sheet.write_string(row, 0, &entry.id).map_err(excel_err)?;
        if let Some(canton) = &entry.canton {
            sheet.write_string(row, 1, canton).map_err(excel_err)?;
        }

        match (&entry.charges, &entry.error) {
            (Some(c), _) => {
                sheet.write_number(row, 2, c.federal.total_charge).map_err(excel_err)?;
                sheet.write_number(row, 3, c.cantonal.total_charge).map_err(excel_err)?;
                sheet.write_number(row, 4, c.federal_cost_per_km).map_err(excel_err)?;
                sheet.write_number(row, 5, c.cantonal_cost_per_km).map_err(excel_err)?;
                sheet.write_number(row, 6, c.total_cost_per_km).map_err(excel_err)?;
            }
            (None, Some(error)) => {
                sheet.write_string(row, 7, error).map_err(excel_err)?;
            }
            (None, None) => {}
        }
    }

    sheet.set_column_width(0, 16).map_err(excel_err)?;
    sheet.set_column_width(1, 14).map_err(excel_err)?;
    for col in 2..=6 {
        sheet.set_column_width(col, 18).map_err(excel_err)?;
    }
    sheet.set_column_width(7, 60).map_err(excel_err)?;

    Ok(())
}

fn write_years_sheet(sheet: &mut Worksheet, results: &FleetResults) -> Result<()> {
    sheet.set_name("Breakdown").map_err(excel_err)?;

    let header_format = Format::new().set_bold();
    let headers = ["Vehicle", "Charge", "Year", "km", "Tonnes", "Rate", "Charge (CHF)"];
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(excel_err)?;
    }

    let mut row = 1u32;
    for entry in &results.entries {
        let Some(charges) = &entry.charges else {
            continue;
        };
        for (label, result) in [("federal", &charges.federal), ("cantonal", &charges.cantonal)] {
            for year in &result.breakdown {
                sheet.write_string(row, 0, &entry.id).map_err(excel_err)?;
                sheet.write_string(row, 1, label).map_err(excel_err)?;
                sheet.write_number(row, 2, year.year).map_err(excel_err)?;
                sheet.write_number(row, 3, year.kilometers).map_err(excel_err)?;
                sheet.write_number(row, 4, year.tonnes).map_err(excel_err)?;
                sheet.write_number(row, 5, year.rate).map_err(excel_err)?;
                sheet.write_number(row, 6, year.charge).map_err(excel_err)?;
                row += 1;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ChargeService;
    use crate::config::Config;
    use roadcharge_domain::DEFAULT_TARIFFS;
    use roadcharge_infra::FleetVehicle;
    use roadcharge_types::VehicleTaxInput;
    use tempfile::tempdir;

    #[test]
    fn test_export_writes_workbook() {
        let fleet = vec![
            FleetVehicle {
                id: "T-1".to_string(),
                input: VehicleTaxInput::new("ICEV-d", 2010, 2025, 2027, 100000.0)
                    .with_weight_tonnes(40.0)
                    .with_canton("VS"),
            },
            FleetVehicle {
                id: "T-2".to_string(),
                input: VehicleTaxInput::new("ICEV-d", 2010, 2025, 2027, 100000.0)
                    .with_weight_tonnes(40.0)
                    .with_canton("Atlantis"),
            },
        ];
        let results = ChargeService::new(DEFAULT_TARIFFS.clone(), Config::default())
            .evaluate_fleet(fleet, 1, None);

        let dir = tempdir().unwrap();
        let path = dir.path().join("fleet.xlsx");
        export_to_excel(&results, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
