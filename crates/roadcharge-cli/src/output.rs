//! Output formatting module

use roadcharge_domain::model::TariffBook;
use roadcharge_domain::service::canton_normalizer::aliases;
use roadcharge_domain::{normalize_canton, Canton};
use roadcharge_types::{ChargeError, ChargeResult, FleetResults, OutputFormat, Result, VehicleCharges};
use serde::Serialize;

pub fn output_charge(output_format: OutputFormat, title: &str, result: &ChargeResult) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(result)?;
        println!("{}", content);
    } else {
        println!("\n{}", title);
        println!("{}", "=".repeat(title.chars().count()));
        print_charge_table(result);
    }

    Ok(())
}

fn print_charge_table(result: &ChargeResult) {
    println!(
        "{:<6} {:>12} {:>8} {:>10} {:>12}",
        "Year", "km", "t", "Rate", "Charge CHF"
    );
    for entry in &result.breakdown {
        println!(
            "{:<6} {:>12.0} {:>8.2} {:>10.5} {:>12.2}",
            entry.year, entry.kilometers, entry.tonnes, entry.rate, entry.charge
        );
    }
    println!("{}", "-".repeat(52));
    println!("Total charge:    {:.2} CHF", result.total_charge);
    println!("Total distance:  {:.0} km", result.total_kilometers);
    println!("Cost per km:     {:.4} CHF/km", result.cost_per_kilometer);

    if !result.notes.is_empty() {
        println!("\nNotes:");
        for note in &result.notes {
            println!("  - {}", note);
        }
    }
}

pub fn output_vehicle(output_format: OutputFormat, charges: &VehicleCharges) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(charges)?;
        println!("{}", content);
        return Ok(());
    }

    println!("\nVehicle Road Charges");
    println!("====================");
    println!("Federal:         {:.4} CHF/km", charges.federal_cost_per_km);
    println!("Cantonal:        {:.4} CHF/km", charges.cantonal_cost_per_km);
    println!("Total:           {:.4} CHF/km", charges.total_cost_per_km);

    println!("\n--- Federal LSVA/RPLP ---");
    print_charge_table(&charges.federal);
    println!("\n--- Cantonal tax ---");
    print_charge_table(&charges.cantonal);

    Ok(())
}

pub fn output_fleet(output_format: OutputFormat, results: &FleetResults) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(results)?;
        println!("{}", content);
        return Ok(());
    }

    println!("\nFleet Results");
    println!("=============");
    println!(
        "{:<16} {:<6} {:>12} {:>12} {:>12}  {}",
        "ID", "Canton", "Federal/km", "Cantonal/km", "Total/km", "Status"
    );
    for entry in &results.entries {
        let canton = entry
            .canton
            .as_deref()
            .and_then(normalize_canton)
            .map(|c| c.code())
            .unwrap_or("-");
        match (&entry.charges, &entry.error) {
            (Some(charges), _) => println!(
                "{:<16} {:<6} {:>12.4} {:>12.4} {:>12.4}  ok",
                entry.id,
                canton,
                charges.federal_cost_per_km,
                charges.cantonal_cost_per_km,
                charges.total_cost_per_km
            ),
            (None, error) => println!(
                "{:<16} {:<6} {:>12} {:>12} {:>12}  {}",
                entry.id,
                canton,
                "-",
                "-",
                "-",
                error.as_deref().unwrap_or("failed")
            ),
        }
    }

    println!("\nTotal:      {}", results.total_processed);
    println!("Successful: {}", results.successful);
    println!("Failed:     {}", results.failed);
    if let Some(mean) = results.mean_total_cost_per_km() {
        println!("Mean total: {:.4} CHF/km", mean);
    }
    println!("Tariffs:    {}", results.tariff_version);

    Ok(())
}

#[derive(Serialize)]
struct CantonRow {
    code: &'static str,
    name: &'static str,
    tax_basis: &'static str,
    aliases: &'static [&'static str],
}

impl From<Canton> for CantonRow {
    fn from(canton: Canton) -> Self {
        Self {
            code: canton.code(),
            name: canton.name(),
            tax_basis: canton.tax_basis(),
            aliases: aliases(canton),
        }
    }
}

/// Supported cantons, or the one `name` resolves to; an unknown name is an error
pub fn output_cantons(output_format: OutputFormat, name: Option<&str>) -> Result<()> {
    let rows: Vec<CantonRow> = match name {
        Some(name) => match normalize_canton(name) {
            Some(canton) => vec![canton.into()],
            None => {
                return Err(ChargeError::UnsupportedCanton {
                    value: name.to_string(),
                }
                .into())
            }
        },
        None => Canton::ALL.into_iter().map(CantonRow::from).collect(),
    };

    if output_format == OutputFormat::Json {
        let content = match name {
            Some(_) => serde_json::to_string_pretty(&rows[0])?,
            None => serde_json::to_string_pretty(&rows)?,
        };
        println!("{}", content);
    } else {
        println!("{:<4} {:<12} {:<14} {}", "Code", "Name", "Taxed on", "Aliases");
        for row in &rows {
            println!(
                "{:<4} {:<12} {:<14} {}",
                row.code,
                row.name,
                row.tax_basis,
                row.aliases.join(", ")
            );
        }
    }

    Ok(())
}

pub fn output_tariffs(output_format: OutputFormat, book: &TariffBook, source: &str) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(book)?;
        println!("{}", content);
        return Ok(());
    }

    let fed = &book.federal;
    println!("\nTariff Book {}", book.version);
    println!("==================");
    println!("Source:          {}", source);
    println!("Effective from:  {}", book.effective_from);
    println!(
        "Euro VI+ from:   manufacture year {}",
        book.emission.modern_from_manufacture_year
    );

    println!("\n--- Federal LSVA/RPLP (CHF per tonne-km) ---");
    println!("Category I:      {}", fed.category_i);
    println!("Category II:     {} (Euro VI+ from {})", fed.category_ii, fed.modern_category_ii_from);
    println!("Category III:    {}", fed.category_iii);
    println!("BEV/FCEV exempt: until {}", fed.zero_emission_exempt_until);
    for step in &fed.zero_emission_rebates {
        println!(
            "  {}: {:.0}% rebate, {:.5}",
            step.year,
            step.fraction * 100.0,
            fed.category_iii * (1.0 - step.fraction)
        );
    }
    println!("Full rate from:  {}", fed.zero_emission_full_rate_from);

    println!("\n--- Cantons ---");
    for canton in Canton::ALL {
        println!("{:<22} taxed on {}", canton.to_string(), canton.tax_basis());
    }

    Ok(())
}
