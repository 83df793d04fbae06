//! Federal LSVA/RPLP engine
//!
//! Per calendar year of the ownership window:
//! `charge = rate(powertrain, era, year) × tonnes × kilometers_per_year`.

use roadcharge_types::{
    ChargeBreakdownEntry, ChargeEngine, ChargeError, ChargeResult, EstimationStrategy,
    OwnershipWindow, VehicleTaxInput,
};
use tracing::{debug, instrument};

use crate::model::TariffBook;
use crate::service::emission::{era_note, resolve_era, resolve_powertrain};
use crate::service::ownership::{ownership_years, window_note};
use crate::service::weight_resolver::resolve_weight;

pub struct FederalChargeEngine<'a> {
    book: &'a TariffBook,
    window: OwnershipWindow,
    strategy: EstimationStrategy,
}

impl<'a> FederalChargeEngine<'a> {
    pub fn new(book: &'a TariffBook) -> Self {
        Self {
            book,
            window: OwnershipWindow::ExcludeResaleYear,
            strategy: EstimationStrategy::default(),
        }
    }

    pub fn with_window(mut self, window: OwnershipWindow) -> Self {
        self.window = window;
        self
    }

    /// Strategy for class-band descriptors when the input does not name one
    pub fn with_default_strategy(mut self, strategy: EstimationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[instrument(skip(self, input), fields(powertrain = %input.powertrain))]
    pub fn compute(&self, input: &VehicleTaxInput) -> Result<ChargeResult, ChargeError> {
        let powertrain = resolve_powertrain(ChargeEngine::Federal, &input.powertrain)?;
        let years = ownership_years(ChargeEngine::Federal, input, self.window)?;
        let era = resolve_era(input, &self.book.emission)?;
        let weight = resolve_weight(
            input.weight.as_ref(),
            input.size_class.as_deref(),
            input.weight_strategy.unwrap_or(self.strategy),
        )?;

        let tariff = &self.book.federal;
        let breakdown: Vec<ChargeBreakdownEntry> = years
            .iter()
            .map(|&year| {
                let rate = tariff.rate(powertrain, era, year);
                let charge = rate * weight.tonnes * input.kilometers_per_year;
                debug!(year, rate, tonnes = weight.tonnes, charge, "federal year evaluated");
                ChargeBreakdownEntry {
                    year,
                    kilometers: input.kilometers_per_year,
                    tonnes: weight.tonnes,
                    rate,
                    charge,
                }
            })
            .collect();

        let mut notes = vec![window_note(self.window, &years)];
        if !powertrain.is_zero_emission() {
            notes.push(era_note(input, era));
        }
        if let Some(note) = weight.note() {
            notes.push(note);
        }

        Ok(ChargeResult::from_breakdown(breakdown, notes))
    }
}
