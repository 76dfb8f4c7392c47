use std::collections::BTreeMap;

use time::Date;

use super::filter::Selection;
use crate::domain::{Tariff, YearMonth};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DailyEnergy {
    pub date: Date,
    pub energy_kwh: f64,
    /// Mean of the day's `active_power_real` values; `None` if there are none.
    pub avg_power_kw: Option<f64>,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MonthlyEnergy {
    pub year_month: YearMonth,
    pub energy_kwh: f64,
    pub cost: f64,
}

/// Headline figures of the energy overview.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EnergyOverview {
    pub days: usize,
    pub total_energy_kwh: f64,
    pub total_cost: f64,
    pub mean_daily_energy_kwh: f64,
}

#[derive(Default)]
struct DayAccumulator {
    energy_kwh: f64,
    power_sum: f64,
    power_samples: usize,
}

impl Selection<'_> {
    pub fn daily_energy(&self, tariff: &Tariff) -> Vec<DailyEnergy> {
        let mut days: BTreeMap<Date, DayAccumulator> = BTreeMap::new();
        for r in &self.readings {
            let acc = days.entry(r.date).or_default();
            acc.energy_kwh += r.energy_kwh;
            if let Some(p) = r.active_power_real.filter(|p| p.is_finite()) {
                acc.power_sum += p;
                acc.power_samples += 1;
            }
        }

        days.into_iter()
            .map(|(date, acc)| DailyEnergy {
                date,
                energy_kwh: acc.energy_kwh,
                avg_power_kw: (acc.power_samples > 0)
                    .then(|| acc.power_sum / acc.power_samples as f64),
                cost: tariff.cost(acc.energy_kwh),
            })
            .collect()
    }

    pub fn monthly_energy(&self, tariff: &Tariff) -> Vec<MonthlyEnergy> {
        let mut months: BTreeMap<YearMonth, f64> = BTreeMap::new();
        for r in &self.readings {
            *months.entry(r.year_month).or_insert(0.0) += r.energy_kwh;
        }

        months
            .into_iter()
            .map(|(year_month, energy_kwh)| MonthlyEnergy {
                year_month,
                energy_kwh,
                cost: tariff.cost(energy_kwh),
            })
            .collect()
    }

    pub fn overview(&self, tariff: &Tariff) -> EnergyOverview {
        let daily = self.daily_energy(tariff);
        let total_energy_kwh: f64 = daily.iter().map(|d| d.energy_kwh).sum();
        let total_cost: f64 = daily.iter().map(|d| d.cost).sum();
        // A selection is never empty, so there is at least one day.
        let mean_daily_energy_kwh = total_energy_kwh / daily.len().max(1) as f64;

        EnergyOverview {
            days: daily.len(),
            total_energy_kwh,
            total_cost,
            mean_daily_energy_kwh,
        }
    }
}
