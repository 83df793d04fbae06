//! Command implementations

use std::path::{Path, PathBuf};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use roadcharge_app::app::ChargeService;
use roadcharge_app::config::Config;
use roadcharge_app::export::export_to_excel;
use roadcharge_app::repository::open_tariff_repo;
use roadcharge_domain::normalize_canton;
use roadcharge_domain::policy::DEFAULT_TARIFFS_TOML;
use roadcharge_infra::load_fleet;
use roadcharge_types::{
    Error, EstimationStrategy, FleetResults, OutputFormat, OwnershipWindow, Result,
};
use tracing::{debug, info};

use crate::cli::{Cli, Commands, VehicleArgs};
use crate::output;

pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref path) = cli.tariff_file {
        config.tariff_file = Some(path.clone());
    }
    if let Some(strategy) = cli.weight_strategy {
        config.weight_strategy = strategy;
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match &cli.command {
        Commands::Federal { vehicle, window } => {
            if let Some(window) = window {
                config.federal_window = *window;
            }
            cmd_federal(config, vehicle, output_format)
        }

        Commands::Cantonal { vehicle, window } => {
            if let Some(window) = window {
                config.cantonal_window = *window;
            }
            cmd_cantonal(config, vehicle, output_format)
        }

        Commands::Vehicle { vehicle } => cmd_vehicle(config, vehicle, output_format),

        Commands::Fleet {
            file,
            output,
            excel,
            jobs,
        } => {
            if let Some(jobs) = jobs {
                config.jobs = *jobs;
            }
            cmd_fleet(config, file, output.clone(), excel.clone(), output_format)
        }

        Commands::Export { results, output } => cmd_export(results, output.clone()),

        Commands::Cantons { name } => output::output_cantons(output_format, name.as_deref()),

        Commands::Tariffs { raw } => cmd_tariffs(config, *raw, output_format),

        Commands::Config {
            show,
            set_federal_window,
            set_cantonal_window,
            set_weight_strategy,
            set_tariff_file,
            clear_tariff_file,
            set_output,
            set_jobs,
            reset,
        } => cmd_config(ConfigUpdate {
            show: *show,
            federal_window: *set_federal_window,
            cantonal_window: *set_cantonal_window,
            weight_strategy: *set_weight_strategy,
            tariff_file: set_tariff_file.clone(),
            clear_tariff_file: *clear_tariff_file,
            output_format: *set_output,
            jobs: *set_jobs,
            reset: *reset,
        }),
    }
}

fn cmd_federal(config: Config, vehicle: &VehicleArgs, output_format: OutputFormat) -> Result<()> {
    let service = ChargeService::from_config(config)?;
    let input = vehicle.to_input();
    debug!(?input, "federal charge");
    let result = service.federal(&input)?;
    output::output_charge(output_format, "Federal LSVA/RPLP", &result)
}

fn cmd_cantonal(config: Config, vehicle: &VehicleArgs, output_format: OutputFormat) -> Result<()> {
    let service = ChargeService::from_config(config)?;
    let input = vehicle.to_input();
    debug!(?input, "cantonal charge");
    let result = service.cantonal(&input)?;
    let title = match input.canton.as_deref().and_then(normalize_canton) {
        Some(canton) => format!("Cantonal tax, {}", canton),
        None => "Cantonal tax".to_string(),
    };
    output::output_charge(output_format, &title, &result)
}

fn cmd_vehicle(config: Config, vehicle: &VehicleArgs, output_format: OutputFormat) -> Result<()> {
    let service = ChargeService::from_config(config)?;
    let input = vehicle.to_input();
    let charges = service.vehicle(&input)?;
    output::output_vehicle(output_format, &charges)
}

fn cmd_fleet(
    config: Config,
    file: &Path,
    output: Option<PathBuf>,
    excel: Option<PathBuf>,
    output_format: OutputFormat,
) -> Result<()> {
    if !file.exists() {
        return Err(Error::FileNotFound(file.display().to_string()));
    }

    let vehicles = load_fleet(file)?;
    if vehicles.is_empty() {
        println!("No vehicles found in {}", file.display());
        return Ok(());
    }

    let job_count = config.effective_jobs();
    let service = ChargeService::from_config(config)?;

    eprintln!(
        "Evaluating {} vehicles with {} workers (tariffs {})",
        vehicles.len(),
        job_count,
        service.book().version
    );

    let pb = ProgressBar::new(vehicles.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let results = service.evaluate_fleet(vehicles, job_count, Some(pb.clone()));
    pb.finish_with_message("Done");
    info!(
        successful = results.successful,
        failed = results.failed,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "fleet evaluated"
    );

    if let Some(ref output_path) = output {
        let content = serde_json::to_string_pretty(&results)?;
        std::fs::write(output_path, content)?;
        eprintln!("Results saved to: {}", output_path.display());
    }

    if let Some(ref excel_path) = excel {
        export_to_excel(&results, excel_path)?;
        eprintln!("Excel report saved to: {}", excel_path.display());
    }

    output::output_fleet(output_format, &results)
}

fn cmd_export(results_path: &Path, output: Option<PathBuf>) -> Result<()> {
    if !results_path.exists() {
        return Err(Error::FileNotFound(results_path.display().to_string()));
    }

    let content = std::fs::read_to_string(results_path)?;
    let results: FleetResults = serde_json::from_str(&content)?;

    let output_path = output.unwrap_or_else(|| results_path.with_extension("xlsx"));
    export_to_excel(&results, &output_path)?;

    println!(
        "Exported {} vehicles to: {}",
        results.total_processed,
        output_path.display()
    );
    Ok(())
}

fn cmd_tariffs(config: Config, raw: bool, output_format: OutputFormat) -> Result<()> {
    if raw {
        let content = match &config.tariff_file {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::FileNotFound(path.display().to_string()));
                }
                std::fs::read_to_string(path)?
            }
            None => DEFAULT_TARIFFS_TOML.to_string(),
        };
        print!("{}", content);
        return Ok(());
    }

    let repo = open_tariff_repo(&config)?;
    let book = repo.load()?;
    output::output_tariffs(output_format, &book, &repo.describe())
}

struct ConfigUpdate {
    show: bool,
    federal_window: Option<OwnershipWindow>,
    cantonal_window: Option<OwnershipWindow>,
    weight_strategy: Option<EstimationStrategy>,
    tariff_file: Option<PathBuf>,
    clear_tariff_file: bool,
    output_format: Option<OutputFormat>,
    jobs: Option<usize>,
    reset: bool,
}

fn cmd_config(update: ConfigUpdate) -> Result<()> {
    if update.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(window) = update.federal_window {
        config.federal_window = window;
        modified = true;
    }

    if let Some(window) = update.cantonal_window {
        config.cantonal_window = window;
        modified = true;
    }

    if let Some(strategy) = update.weight_strategy {
        config.weight_strategy = strategy;
        modified = true;
    }

    if let Some(path) = update.tariff_file {
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        config.tariff_file = Some(path);
        modified = true;
    }

    if update.clear_tariff_file {
        config.tariff_file = None;
        modified = true;
    }

    if let Some(output_format) = update.output_format {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(jobs) = update.jobs {
        config.jobs = jobs;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if update.show || !modified {
        println!("{}", config);
    }

    Ok(())
}
