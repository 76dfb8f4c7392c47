use std::{path::Path, sync::Arc};

use hvac_domain::{domain::Reading, Dataset};

use crate::{
    pipeline::{Pipeline, PipelineError},
    sinks::DatasetSink,
    sources::HvacCsvSource,
    transform,
};

/// Runs the load pipeline: CSV source, reading validation, dataset sink.
pub async fn load_dataset(source: HvacCsvSource) -> Result<Dataset, PipelineError> {
    let sink = DatasetSink::new(source.columns());
    let pipeline: Pipeline<_, Reading, _> = Pipeline {
        source,
        transforms: vec![Arc::new(transform::ReadingValidation)],
        sink,
    };
    pipeline.run().await
}

pub async fn load_csv_file<P: AsRef<Path>>(path: P) -> Result<Dataset, PipelineError> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), "loading HVAC dataset");
    load_dataset(HvacCsvSource::open(path)?).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use hvac_domain::{Column, DatasetError};

    const CSV: &str = "\
timestamp,date,year_month,energy_5min_real_kWh,active_power_real,active_power_pred,on_off,is_business_hours,is_weekend,outside_temp
2022-06-03 17:50:00,2022-06-03,2022-06,0.50,6.0,5.8,1,1,0,24.1
2022-06-03 17:55:00,2022-06-03,2022-06,0.45,5.4,5.5,1,1,0,24.0
2022-06-03 18:00:00,2022-06-03,2022-06,0.05,0.6,0.9,0,0,0,23.8
2022-06-04 09:00:00,2022-06-04,2022-06,0.30,3.6,3.1,1,0,1,
";

    async fn load(csv: &'static str) -> Result<Dataset, PipelineError> {
        load_dataset(HvacCsvSource::from_reader(csv.as_bytes())?).await
    }

    #[tokio::test]
    async fn loads_full_export() {
        let ds = load(CSV).await.unwrap();
        assert_eq!(ds.len(), 4);
        assert!(ds.has(Column::OutsideTemp));
        assert!(ds.has(Column::IsWeekend));
        assert_eq!(ds.readings()[3].outside_temp, None);
        assert_eq!(ds.readings()[3].is_weekend, Some(true));
    }

    #[tokio::test]
    async fn normalizing_twice_is_bit_identical() {
        let first = load(CSV).await.unwrap();
        let second = load(CSV).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[tokio::test]
    async fn midnight_row_labelled_with_previous_day_loads() {
        let csv = "\
timestamp,date,year_month,energy_5min_real_kWh
2022-06-01 23:55:00,2022-06-01,2022-06,0.1
2022-06-02 00:00:00,2022-06-01,2022-06,0.2
";
        let ds = load(csv).await.unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.readings()[1].date, time::macros::date!(2022 - 06 - 02));
    }

    #[tokio::test]
    async fn nan_measurements_load_as_missing() {
        let csv = "\
timestamp,energy_5min_real_kWh,active_power_real,active_power_pred,outside_temp
2022-06-01 10:00:00,0.1,NaN,1.0,nan
";
        let ds = load(csv).await.unwrap();
        let r = &ds.readings()[0];
        assert_eq!(r.active_power_real, None);
        assert_eq!(r.active_power_pred, Some(1.0));
        assert_eq!(r.outside_temp, None);
    }

    #[tokio::test]
    async fn negative_energy_aborts_load() {
        let csv = "timestamp,energy_5min_real_kWh\n2022-06-01 00:00:00,0.1\n2022-06-01 00:05:00,-0.2\n";
        let res = load(csv).await;
        assert!(matches!(res, Err(PipelineError::Transform { row: 2, .. })));
    }

    #[tokio::test]
    async fn out_of_order_rows_abort_load() {
        let csv = "timestamp,energy_5min_real_kWh\n2022-06-01 00:05:00,0.1\n2022-06-01 00:00:00,0.2\n";
        let res = load(csv).await;
        assert!(matches!(
            res,
            Err(PipelineError::Sink(DatasetError::UnorderedTimestamps { .. }))
        ));
    }

    #[tokio::test]
    async fn header_only_file_gives_empty_dataset() {
        let ds = load("timestamp,energy_5min_real_kWh\n").await.unwrap();
        assert!(ds.is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_a_source_error() {
        let res = load_csv_file("/nonexistent/hvac_dashboard_base.csv").await;
        assert!(matches!(res, Err(PipelineError::Source(_))));
    }
}
