use std::{path::Path, sync::Arc};

use hvac_domain::{domain::ScenarioSet, Dataset};
use once_cell::sync::OnceCell;

use crate::{
    load,
    pipeline::PipelineError,
    scenarios::{self, ScenarioError, ScenarioSettings},
};

/// Process-lifetime memo of the normalized dataset and its scenario results.
///
/// The source is static, so there is no invalidation: reloading the data
/// means building a new cache.
pub struct AnalyticsCache {
    dataset: Arc<Dataset>,
    settings: ScenarioSettings,
    fingerprint: OnceCell<String>,
    scenarios: OnceCell<Arc<ScenarioSet>>,
}

impl AnalyticsCache {
    pub fn new(dataset: Dataset, settings: ScenarioSettings) -> Self {
        Self {
            dataset: Arc::new(dataset),
            settings,
            fingerprint: OnceCell::new(),
            scenarios: OnceCell::new(),
        }
    }

    pub async fn load<P: AsRef<Path>>(path: P, settings: ScenarioSettings) -> Result<Self, PipelineError> {
        let dataset = load::load_csv_file(path).await?;
        Ok(Self::new(dataset, settings))
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Dataset fingerprint, hashed on first use.
    pub fn fingerprint(&self) -> &str {
        self.fingerprint.get_or_init(|| self.dataset.fingerprint())
    }

    pub fn settings(&self) -> &ScenarioSettings {
        &self.settings
    }

    /// Scenario results over the full dataset, computed on first use.
    pub fn scenarios(&self) -> Result<Arc<ScenarioSet>, ScenarioError> {
        self.scenarios
            .get_or_try_init(|| {
                scenarios::compute_scenarios(&self.dataset, &self.settings).map(Arc::new)
            })
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hvac_domain::{domain::Reading, Column, ColumnSet};
    use time::macros::datetime;

    #[test]
    fn scenarios_are_computed_once() {
        let ds = Dataset::new(
            vec![
                Reading::new(datetime!(2022-06-01 09:00), 1.0)
                    .with_on_off(true)
                    .with_business_hours(true),
                Reading::new(datetime!(2022-06-01 19:00), 1.0)
                    .with_on_off(false)
                    .with_business_hours(false),
            ],
            ColumnSet::base()
                .with(Column::OnOff)
                .with(Column::IsBusinessHours),
        )
        .unwrap();
        let cache = AnalyticsCache::new(ds, ScenarioSettings::default());

        let first = cache.scenarios().unwrap();
        let second = cache.scenarios().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.business_hours_only.total_savings_kwh, 1.0);
    }

    #[test]
    fn fingerprint_is_hashed_once() {
        let ds = Dataset::new(
            vec![Reading::new(datetime!(2022-06-01 09:00), 1.0)],
            ColumnSet::base(),
        )
        .unwrap();
        let expected = ds.fingerprint();
        let cache = AnalyticsCache::new(ds, ScenarioSettings::default());

        let first = cache.fingerprint();
        assert_eq!(first, expected);
        assert!(std::ptr::eq(first, cache.fingerprint()));
    }

    #[test]
    fn failed_computation_is_not_cached() {
        let cache = AnalyticsCache::new(
            Dataset::new(Vec::new(), ColumnSet::base()).unwrap(),
            ScenarioSettings::default(),
        );
        assert_eq!(cache.scenarios().unwrap_err(), ScenarioError::EmptyDataset);
        assert_eq!(cache.scenarios().unwrap_err(), ScenarioError::EmptyDataset);
    }
}
