//! CLI definition using clap

use std::path::PathBuf;

use chrono::Datelike;
use clap::{Args, Parser, Subcommand};
use roadcharge_types::{EstimationStrategy, OutputFormat, OwnershipWindow, VehicleTaxInput, WeightValue};

#[derive(Parser)]
#[command(name = "roadcharge")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Swiss heavy-vehicle road charges: federal LSVA/RPLP and cantonal vehicle taxes")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML tariff book to use instead of the configured one
    #[arg(long, global = true)]
    pub tariff_file: Option<PathBuf>,

    /// Class-band estimation strategy. Uses config value if not specified.
    #[arg(long, global = true)]
    pub weight_strategy: Option<EstimationStrategy>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Federal LSVA/RPLP fee for one vehicle
    Federal {
        #[command(flatten)]
        vehicle: VehicleArgs,

        /// Ownership years charged. Uses config value if not specified.
        #[arg(long)]
        window: Option<OwnershipWindow>,
    },

    /// Cantonal annual vehicle tax for one vehicle
    Cantonal {
        #[command(flatten)]
        vehicle: VehicleArgs,

        /// Ownership years charged. Uses config value if not specified.
        #[arg(long)]
        window: Option<OwnershipWindow>,
    },

    /// Federal and cantonal charges per km for one vehicle
    Vehicle {
        #[command(flatten)]
        vehicle: VehicleArgs,
    },

    /// Evaluate a fleet file (.json or .csv)
    Fleet {
        /// Path to the fleet file
        file: PathBuf,

        /// Output file for results (JSON)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Also write an Excel report
        #[arg(long)]
        excel: Option<PathBuf>,

        /// Number of worker threads. 0 = auto (CPU count). Uses config value if not specified.
        #[arg(long, short = 'j')]
        jobs: Option<usize>,
    },

    /// Export fleet results (JSON) to Excel
    Export {
        /// Path to JSON results file
        results: PathBuf,

        /// Output Excel file path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List supported cantons, or resolve a canton name
    Cantons {
        /// Name to resolve (e.g. "Genf", "Kanton Zürich")
        name: Option<String>,
    },

    /// Show the active tariff book
    Tariffs {
        /// Print the TOML source of the embedded book
        #[arg(long)]
        raw: bool,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set the federal ownership window
        #[arg(long)]
        set_federal_window: Option<OwnershipWindow>,

        /// Set the cantonal ownership window
        #[arg(long)]
        set_cantonal_window: Option<OwnershipWindow>,

        /// Set the default class-band estimation strategy
        #[arg(long)]
        set_weight_strategy: Option<EstimationStrategy>,

        /// Use a TOML tariff book instead of the embedded one
        #[arg(long)]
        set_tariff_file: Option<PathBuf>,

        /// Go back to the embedded tariff book
        #[arg(long)]
        clear_tariff_file: bool,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set default fleet worker count (0 = auto)
        #[arg(long)]
        set_jobs: Option<usize>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

/// Vehicle attributes shared by the single-vehicle commands
#[derive(Args, Debug, Clone)]
pub struct VehicleArgs {
    /// Powertrain (BEV, FCEV, ICEV-d, ICEV-g, HEV-d, PHEV-d)
    #[arg(long, short = 'p')]
    pub powertrain: String,

    /// Gross weight, e.g. "40t", "3,5 t", "18000 kg"
    #[arg(long, short = 'w')]
    pub weight: Option<String>,

    /// Class-band descriptor used when no weight is given, e.g. "rigid 20-26t"
    #[arg(long)]
    pub size_class: Option<String>,

    #[arg(long)]
    pub manufacture_year: i32,

    /// Euro class (e.g. "Euro VI"), overrides the manufacture-year inference
    #[arg(long)]
    pub euro_class: Option<String>,

    /// Defaults to the current year
    #[arg(long)]
    pub purchase_year: Option<i32>,

    #[arg(long)]
    pub resale_year: i32,

    /// Annual distance in km
    #[arg(long)]
    pub km_per_year: f64,

    /// Canton name or abbreviation
    #[arg(long, short = 'c')]
    pub canton: Option<String>,

    /// Engine power in kW (Ticino)
    #[arg(long)]
    pub power_kw: Option<f64>,

    /// Payload in kg (Aargau)
    #[arg(long)]
    pub payload_kg: Option<f64>,

    /// Defaults to the manufacture year
    #[arg(long)]
    pub first_registration_year: Option<i32>,
}

impl VehicleArgs {
    pub fn to_input(&self) -> VehicleTaxInput {
        let purchase_year = self
            .purchase_year
            .unwrap_or_else(|| chrono::Local::now().year());
        VehicleTaxInput {
            powertrain: self.powertrain.clone(),
            weight: self.weight.clone().map(WeightValue::Text),
            size_class: self.size_class.clone(),
            weight_strategy: None,
            manufacture_year: self.manufacture_year,
            euro_class: self.euro_class.clone(),
            purchase_year,
            resale_year: self.resale_year,
            kilometers_per_year: self.km_per_year,
            canton: self.canton.clone(),
            power_kw: self.power_kw,
            payload_kg: self.payload_kg,
            first_registration_year: self.first_registration_year,
        }
    }
}
