use std::{fs::File, io::Read, path::Path, sync::Arc};

use futures::Stream;
use hvac_domain::{domain::Reading, ColumnSet};

use crate::{
    normalize::ColumnPlan,
    pipeline::{Envelope, PipelineError, Source},
};

type CsvReader = csv::Reader<Box<dyn Read + Send>>;

/// CSV source for HVAC readings.
///
/// Required header columns (by name):
/// - timestamp
/// - energy_5min_real_kWh
///
/// Optional: date, year_month, on_off, is_business_hours, is_weekend,
/// active_power_real, active_power_pred, outside_temp. Unknown columns are
/// ignored.
///
/// The header is read when the source is opened, so the column plan (and the
/// resulting [`ColumnSet`]) is known before streaming starts.
pub struct HvacCsvSource {
    plan: ColumnPlan,
    reader: Arc<tokio::sync::Mutex<Option<CsvReader>>>,
}

impl HvacCsvSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            PipelineError::Source(format!("failed to open CSV file {}: {e}", path.display()))
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Result<Self, PipelineError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(Box::new(reader) as Box<dyn Read + Send>);
        let headers = rdr
            .headers()
            .map_err(|e| PipelineError::Source(format!("failed to read CSV headers: {e}")))?
            .clone();
        let plan = ColumnPlan::from_headers(&headers)?;

        tracing::debug!(?plan, "CSV column plan");

        Ok(Self {
            plan,
            reader: Arc::new(tokio::sync::Mutex::new(Some(rdr))),
        })
    }

    pub fn columns(&self) -> ColumnSet {
        self.plan.columns()
    }
}

#[async_trait::async_trait]
impl Source<Reading> for HvacCsvSource {
    async fn stream(
        &self,
    ) -> std::pin::Pin<Box<dyn Stream<Item = Result<Envelope<Reading>, PipelineError>> + Send>> {
        // Blocking CSV reader wrapped in a single async stream; the dataset is
        // read once at startup.
        let taken = self.reader.lock().await.take();
        let plan = self.plan.clone();
        let s = async_stream::try_stream! {
            let mut rdr = match taken {
                Some(rdr) => rdr,
                None => Err(PipelineError::Source("CSV source already consumed".to_string()))?,
            };

            for (idx, result) in rdr.records().enumerate() {
                let row = idx + 1;
                let record = result.map_err(|e| PipelineError::Source(format!(
                    "failed to read CSV record {row}: {e}"
                )))?;

                let reading = match plan.normalize(row, &record) {
                    Ok(r) => r,
                    Err(e) => {
                        metrics::counter!("hvac_csv_parse_errors_total").increment(1);
                        Err(PipelineError::from(e))?
                    }
                };

                yield Envelope {
                    payload: reading,
                    row,
                };
            }
        };

        Box::pin(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use hvac_domain::Column;

    const CSV: &str = "\
timestamp,energy_5min_real_kWh,on_off,is_business_hours
2022-06-01 08:00:00,0.4,1,1
2022-06-01 08:05:00,0.5,1,1
";

    #[tokio::test]
    async fn streams_normalized_readings() {
        let source = HvacCsvSource::from_reader(CSV.as_bytes()).unwrap();
        let columns = source.columns();
        assert!(columns.contains(Column::OnOff));
        assert!(!columns.contains(Column::IsWeekend));

        let items: Vec<_> = source.stream().await.collect().await;
        assert_eq!(items.len(), 2);
        let second = items[1].as_ref().unwrap();
        assert_eq!(second.row, 2);
        assert_eq!(second.payload.energy_kwh, 0.5);
        assert_eq!(second.payload.is_business_hours, Some(true));
    }

    #[tokio::test]
    async fn stream_can_only_be_taken_once() {
        let source = HvacCsvSource::from_reader(CSV.as_bytes()).unwrap();
        let _ = source.stream().await.collect::<Vec<_>>().await;

        let again: Vec<_> = source.stream().await.collect().await;
        assert!(matches!(again.as_slice(), [Err(PipelineError::Source(_))]));
    }

    #[test]
    fn open_fails_on_missing_energy_column() {
        let res = HvacCsvSource::from_reader("timestamp,on_off\n2022-06-01 08:00:00,1\n".as_bytes());
        assert!(matches!(
            res,
            Err(PipelineError::Normalize(crate::normalize::NormalizeError::MissingColumn(
                Column::Energy
            )))
        ));
    }

    #[tokio::test]
    async fn malformed_row_ends_stream_with_error() {
        let csv = "timestamp,energy_5min_real_kWh\n2022-06-01 08:00:00,0.4\nbad,0.1\n";
        let source = HvacCsvSource::from_reader(csv.as_bytes()).unwrap();
        let items: Vec<_> = source.stream().await.collect().await;
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(items[1], Err(PipelineError::Normalize(_))));
    }
}
