use futures::StreamExt;
use hvac_domain::{domain::Reading, ColumnSet, Dataset};

use crate::pipeline::{Envelope, PipelineError, Sink};

/// Collects the stream into an immutable [`Dataset`].
///
/// Any upstream error aborts the load: no partial dataset is ever produced.
pub struct DatasetSink {
    columns: ColumnSet,
}

impl DatasetSink {
    pub fn new(columns: ColumnSet) -> Self {
        Self { columns }
    }
}

#[async_trait::async_trait]
impl Sink<Reading> for DatasetSink {
    type Output = Dataset;

    async fn run<S>(&self, mut input: S) -> Result<Dataset, PipelineError>
    where
        S: futures::Stream<Item = Result<Envelope<Reading>, PipelineError>> + Send + Unpin + 'static,
    {
        let mut readings: Vec<Reading> = Vec::new();

        while let Some(item) = input.next().await {
            match item {
                Ok(env) => readings.push(env.payload),
                Err(e) => {
                    tracing::error!(error = %e, loaded = readings.len(), "dataset load aborted");
                    return Err(e);
                }
            }
        }

        let dataset = Dataset::new(readings, self.columns.clone())?;

        metrics::counter!("dataset_readings_loaded_total").increment(dataset.len() as u64);
        tracing::info!(
            readings = dataset.len(),
            fingerprint = %dataset.fingerprint(),
            "dataset loaded"
        );

        Ok(dataset)
    }
}
