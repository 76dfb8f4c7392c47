use hvac_domain::domain::{ScenarioResult, ScenarioSet, Tariff};
use serde::Serialize;

/// One scenario with its derived KPIs, as served to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioSummary {
    #[serde(flatten)]
    pub result: ScenarioResult,
    pub percentage_savings: f64,
    pub savings_cost: f64,
}

impl ScenarioSummary {
    pub fn new(result: &ScenarioResult, tariff: &Tariff) -> Self {
        Self {
            result: result.clone(),
            percentage_savings: result.percentage_savings(),
            savings_cost: result.savings_cost(tariff),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub currency: String,
    pub tariff_rate_per_kwh: f64,
    pub total_base_kwh: f64,
    pub total_base_cost: f64,
    pub early_shutoff: ScenarioSummary,
    pub business_hours_only: ScenarioSummary,
}

impl ScenarioReport {
    pub fn new(set: &ScenarioSet, tariff: &Tariff) -> Self {
        Self {
            currency: tariff.currency().to_string(),
            tariff_rate_per_kwh: tariff.rate_per_kwh(),
            total_base_kwh: set.total_base_kwh,
            total_base_cost: tariff.cost(set.total_base_kwh),
            early_shutoff: ScenarioSummary::new(&set.early_shutoff, tariff),
            business_hours_only: ScenarioSummary::new(&set.business_hours_only, tariff),
        }
    }
}
