//! Scenario engine: counterfactual shut-off policies over the full dataset.
//!
//! Each scenario maps every reading to a scenario energy in
//! `[0, energy_kwh]`; [`aggregate`] then rolls baseline and scenario energy up
//! per day and in total. Scenarios always run on the whole dataset, never on
//! a filtered selection.

pub mod business_hours;
pub mod day_index;
pub mod early_shutoff;

use std::time::Instant;

use hvac_domain::{
    domain::{DailySavings, Reading, ScenarioKind, ScenarioResult, ScenarioSet},
    Column, Dataset, DatasetError,
};
use time::Duration;

pub use day_index::DayIndex;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScenarioError {
    #[error("cannot compute scenarios over an empty dataset")]
    EmptyDataset,
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioSettings {
    /// How long before the last "on" reading of a day the early-shutoff
    /// scenario switches the unit off.
    pub early_shutoff_window: Duration,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            early_shutoff_window: Duration::hours(1),
        }
    }
}

/// Rolls baseline and scenario energy up per day and in total.
///
/// `scenario_kwh` is parallel to `readings`. Every day in `days` appears in
/// the result, including days the scenario left untouched.
pub fn aggregate(
    scenario: ScenarioKind,
    readings: &[Reading],
    days: &DayIndex,
    scenario_kwh: &[f64],
) -> ScenarioResult {
    let daily: Vec<DailySavings> = days
        .iter()
        .map(|(date, indices)| {
            let base_kwh: f64 = indices.iter().map(|&i| readings[i].energy_kwh).sum();
            let scenario_day: f64 = indices.iter().map(|&i| scenario_kwh[i]).sum();
            DailySavings {
                date,
                base_kwh,
                scenario_kwh: scenario_day,
                savings_kwh: base_kwh - scenario_day,
            }
        })
        .collect();

    let total_base_kwh: f64 = readings.iter().map(|r| r.energy_kwh).sum();
    let total_scenario_kwh: f64 = scenario_kwh.iter().sum();
    let mean_daily_savings_kwh = if daily.is_empty() {
        0.0
    } else {
        daily.iter().map(|d| d.savings_kwh).sum::<f64>() / daily.len() as f64
    };

    ScenarioResult {
        scenario,
        total_base_kwh,
        total_scenario_kwh,
        total_savings_kwh: total_base_kwh - total_scenario_kwh,
        mean_daily_savings_kwh,
        daily,
    }
}

fn day_index(dataset: &Dataset) -> Result<DayIndex, ScenarioError> {
    if dataset.is_empty() {
        return Err(ScenarioError::EmptyDataset);
    }
    Ok(DayIndex::build(dataset.readings()))
}

fn run_early_shutoff(dataset: &Dataset, days: &DayIndex, window: Duration) -> Result<ScenarioResult, ScenarioError> {
    dataset.require(Column::OnOff)?;
    let energy = early_shutoff::scenario_energy(dataset.readings(), days, window);
    Ok(aggregate(ScenarioKind::EarlyShutoff, dataset.readings(), days, &energy))
}

fn run_business_hours_only(dataset: &Dataset, days: &DayIndex) -> Result<ScenarioResult, ScenarioError> {
    dataset.require(Column::IsBusinessHours)?;
    let energy = business_hours::scenario_energy(dataset.readings());
    Ok(aggregate(ScenarioKind::BusinessHoursOnly, dataset.readings(), days, &energy))
}

/// Scenario 1: switch off `window` before the last "on" reading of each day.
pub fn early_shutoff(dataset: &Dataset, window: Duration) -> Result<ScenarioResult, ScenarioError> {
    let days = day_index(dataset)?;
    run_early_shutoff(dataset, &days, window)
}

/// Scenario 2: run only during business hours.
pub fn business_hours_only(dataset: &Dataset) -> Result<ScenarioResult, ScenarioError> {
    let days = day_index(dataset)?;
    run_business_hours_only(dataset, &days)
}

/// Computes both scenarios over one shared day index.
pub fn compute_scenarios(dataset: &Dataset, settings: &ScenarioSettings) -> Result<ScenarioSet, ScenarioError> {
    let started = Instant::now();
    let days = day_index(dataset)?;

    let early_shutoff = run_early_shutoff(dataset, &days, settings.early_shutoff_window)?;
    let business_hours_only = run_business_hours_only(dataset, &days)?;

    metrics::counter!("scenario_computations_total").increment(1);
    metrics::histogram!("scenario_computation_seconds").record(started.elapsed().as_secs_f64());
    tracing::info!(
        readings = dataset.len(),
        days = days.len(),
        total_base_kwh = early_shutoff.total_base_kwh,
        early_shutoff_savings_kwh = early_shutoff.total_savings_kwh,
        business_hours_savings_kwh = business_hours_only.total_savings_kwh,
        "scenarios computed"
    );

    Ok(ScenarioSet {
        total_base_kwh: early_shutoff.total_base_kwh,
        early_shutoff,
        business_hours_only,
    })
}
