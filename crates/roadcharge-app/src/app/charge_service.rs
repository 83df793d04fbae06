//! Charge Service - single-vehicle and fleet evaluation
//!
//! Wraps a loaded tariff book and the configured windows and strategy.
//! Fleet evaluation runs vehicles on worker threads; every vehicle is
//! independent, so workers only share the job index and the result list.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use chrono::Utc;
use indicatif::ProgressBar;
use roadcharge_domain::model::TariffBook;
use roadcharge_domain::service::{aggregate, CantonalChargeEngine, FederalChargeEngine};
use roadcharge_infra::FleetVehicle;
use roadcharge_types::{
    ChargeError, ChargeResult, FleetEntry, FleetResults, Result, VehicleCharges,
    VehicleTaxInput,
};
use tracing::{debug, info, warn};

use crate::config::{resolve_jobs, Config};
use crate::repository::load_tariff_book;

#[derive(Debug, Clone)]
pub struct ChargeService {
    book: TariffBook,
    config: Config,
}

impl ChargeService {
    pub fn new(book: TariffBook, config: Config) -> Self {
        Self { book, config }
    }

    /// Load the tariff book the config points at
    pub fn from_config(config: Config) -> Result<Self> {
        let book = load_tariff_book(&config)?;
        info!(version = %book.version, "charge service ready");
        Ok(Self::new(book, config))
    }

    pub fn book(&self) -> &TariffBook {
        &self.book
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn federal_engine(&self) -> FederalChargeEngine<'_> {
        FederalChargeEngine::new(&self.book)
            .with_window(self.config.federal_window)
            .with_default_strategy(self.config.weight_strategy)
    }

    fn cantonal_engine(&self) -> CantonalChargeEngine<'_> {
        CantonalChargeEngine::new(&self.book)
            .with_window(self.config.cantonal_window)
            .with_default_strategy(self.config.weight_strategy)
    }

    pub fn federal(&self, input: &VehicleTaxInput) -> std::result::Result<ChargeResult, ChargeError> {
        self.federal_engine().compute(input)
    }

    pub fn cantonal(&self, input: &VehicleTaxInput) -> std::result::Result<ChargeResult, ChargeError> {
        self.cantonal_engine().compute(input)
    }

    /// Both charges merged; the first failing engine fails the vehicle
    pub fn vehicle(&self, input: &VehicleTaxInput) -> std::result::Result<VehicleCharges, ChargeError> {
        let federal = self.federal(input)?;
        let cantonal = self.cantonal(input)?;
        Ok(aggregate(federal, cantonal))
    }

    /// Evaluate a fleet on `jobs` worker threads (0 = one per CPU).
    /// Entries come back in input order.
    pub fn evaluate_fleet(
        &self,
        vehicles: Vec<FleetVehicle>,
        jobs: usize,
        progress: Option<ProgressBar>,
    ) -> FleetResults {
        let job_count = resolve_jobs(jobs).min(vehicles.len()).max(1);
        let total = vehicles.len();
        info!(vehicles = total, jobs = job_count, "evaluating fleet");

        let started_at = Utc::now();
        let service = Arc::new(self.clone());
        let vehicles = Arc::new(vehicles);
        let next_index = Arc::new(AtomicUsize::new(0));
        let results: Arc<Mutex<Vec<(usize, FleetEntry)>>> =
            Arc::new(Mutex::new(Vec::with_capacity(total)));

        let mut handles = Vec::new();
        for worker_id in 0..job_count {
            let service = Arc::clone(&service);
            let vehicles = Arc::clone(&vehicles);
            let next_index = Arc::clone(&next_index);
            let results = Arc::clone(&results);
            let pb = progress.clone();

            let handle = thread::spawn(move || loop {
                let idx = next_index.fetch_add(1, Ordering::SeqCst);
                if idx >= vehicles.len() {
                    break;
                }

                let vehicle = &vehicles[idx];
                if let Some(pb) = &pb {
                    pb.set_message(format!("[W{}] {}", worker_id, vehicle.id));
                }

                let entry = service.fleet_entry(vehicle);
                results
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push((idx, entry));
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
            });
            handles.push(handle);
        }

        for handle in handles {
            if handle.join().is_err() {
                warn!("fleet worker panicked");
            }
        }

        let collected = match Arc::try_unwrap(results) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(|e| e.into_inner()),
            Err(shared) => shared
                .lock()
                .map(|g| g.clone())
                .unwrap_or_else(|e| e.into_inner().clone()),
        };

        // One slot per submitted vehicle; a slot left empty means its worker died
        let mut slots: Vec<Option<FleetEntry>> = vec![None; total];
        for (idx, entry) in collected {
            slots[idx] = Some(entry);
        }
        let entries: Vec<FleetEntry> = slots
            .into_iter()
            .zip(vehicles.iter())
            .map(|(slot, vehicle)| {
                slot.unwrap_or_else(|| {
                    failed_entry(vehicle, "evaluation aborted: worker stopped".to_string())
                })
            })
            .collect();
        debug_assert_eq!(entries.len(), total);

        let successful = entries.iter().filter(|e| e.is_ok()).count();
        FleetResults {
            failed: total - successful,
            successful,
            total_processed: total,
            entries,
            tariff_version: self.book.version.clone(),
            started_at,
            completed_at: Utc::now(),
        }
    }

    fn fleet_entry(&self, vehicle: &FleetVehicle) -> FleetEntry {
        guarded_entry(vehicle, |input| self.vehicle(input))
    }
}

/// Evaluate one vehicle; errors and panics both become an error entry
fn guarded_entry<F>(vehicle: &FleetVehicle, evaluate: F) -> FleetEntry
where
    F: FnOnce(&VehicleTaxInput) -> std::result::Result<VehicleCharges, ChargeError>,
{
    match panic::catch_unwind(AssertUnwindSafe(|| evaluate(&vehicle.input))) {
        Ok(Ok(charges)) => FleetEntry {
            id: vehicle.id.clone(),
            canton: vehicle.input.canton.clone(),
            charges: Some(charges),
            error: None,
        },
        Ok(Err(e)) => {
            debug!(id = %vehicle.id, error = %e, "vehicle failed");
            failed_entry(vehicle, e.to_string())
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            warn!(id = %vehicle.id, panic = %message, "vehicle evaluation panicked");
            failed_entry(vehicle, format!("evaluation panicked: {}", message))
        }
    }
}

fn failed_entry(vehicle: &FleetVehicle, error: String) -> FleetEntry {
    FleetEntry {
        id: vehicle.id.clone(),
        canton: vehicle.input.canton.clone(),
        charges: None,
        error: Some(error),
    }
}
