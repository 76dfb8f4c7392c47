use time::Date;

use super::tariff::Tariff;

/// Counterfactual shut-off policy applied retroactively to the whole dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "snake_case")
)]
pub enum ScenarioKind {
    /// Switch off one window (1h by default) before the last "on" reading of each day.
    EarlyShutoff,
    /// Run only while `is_business_hours = 1`.
    BusinessHoursOnly,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DailySavings {
    pub date: Date,
    pub base_kwh: f64,
    pub scenario_kwh: f64,
    pub savings_kwh: f64,
}

/// Totals and per-day breakdown of one scenario over the full dataset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScenarioResult {
    pub scenario: ScenarioKind,
    pub total_base_kwh: f64,
    pub total_scenario_kwh: f64,
    pub total_savings_kwh: f64,
    /// Mean of `daily[..].savings_kwh`; every day counts once.
    pub mean_daily_savings_kwh: f64,
    pub daily: Vec<DailySavings>,
}

impl ScenarioResult {
    /// Savings as a share of baseline, in percent. Zero when the baseline is zero.
    pub fn percentage_savings(&self) -> f64 {
        if self.total_base_kwh > 0.0 {
            self.total_savings_kwh / self.total_base_kwh * 100.0
        } else {
            0.0
        }
    }

    pub fn savings_cost(&self, tariff: &Tariff) -> f64 {
        tariff.cost(self.total_savings_kwh)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScenarioSet {
    pub total_base_kwh: f64,
    pub early_shutoff: ScenarioResult,
    pub business_hours_only: ScenarioResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(base: f64, savings: f64) -> ScenarioResult {
        ScenarioResult {
            scenario: ScenarioKind::BusinessHoursOnly,
            total_base_kwh: base,
            total_scenario_kwh: base - savings,
            total_savings_kwh: savings,
            mean_daily_savings_kwh: savings,
            daily: Vec::new(),
        }
    }

    #[test]
    fn percentage_is_share_of_baseline() {
        assert!((result(200.0, 50.0).percentage_savings() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn percentage_is_zero_for_zero_baseline() {
        assert_eq!(result(0.0, 0.0).percentage_savings(), 0.0);
    }

    #[test]
    fn savings_cost_uses_tariff() {
        let tariff = Tariff::new(0.80, "BRL");
        assert!((result(100.0, 10.0).savings_cost(&tariff) - 8.0).abs() < 1e-12);
    }
}
