use crate::pipeline::{Envelope, PipelineError, Transform};
use hvac_domain::domain::Reading;

/// Pure validation of a normalized `Reading`.
///
/// Rules:
/// - energy must be finite and non-negative.
/// - date and year_month must be those of the timestamp.
pub fn validate_reading(env: Envelope<Reading>) -> Result<Envelope<Reading>, PipelineError> {
    match env.payload.validate() {
        Ok(()) => Ok(env),
        Err(source) => Err(PipelineError::Transform {
            row: env.row,
            source,
        }),
    }
}

#[derive(Clone, Default)]
pub struct ReadingValidation;

#[async_trait::async_trait]
impl Transform<Reading, Reading> for ReadingValidation {
    async fn apply(&self, input: Envelope<Reading>) -> Result<Envelope<Reading>, PipelineError> {
        match validate_reading(input) {
            Ok(env) => Ok(env),
            Err(e) => {
                metrics::counter!("validation_reading_rejected_total").increment(1);
                Err(e)
            }
        }
    }
}
