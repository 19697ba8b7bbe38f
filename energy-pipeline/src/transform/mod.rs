use energy_domain::ReadingRow;

use crate::pipeline::{Envelope, PipelineError, Transform};

/// Pure validation of a meter-reading row.
///
/// Rules:
/// - kWh must be finite and non-negative.
///
/// Validation is a filter: a surviving row passes through untouched, never
/// clamped or rounded.
pub fn validate_reading(env: Envelope<ReadingRow>) -> Result<Envelope<ReadingRow>, PipelineError> {
    let kwh = env.payload.reading.kwh;

    if !kwh.is_finite() {
        return Err(PipelineError::Transform(format!(
            "row {}: kwh is not a finite number",
            env.row
        )));
    }
    if kwh < 0.0 {
        return Err(PipelineError::Transform(format!(
            "row {}: kwh must be non-negative",
            env.row
        )));
    }

    Ok(env)
}

#[derive(Clone, Default)]
pub struct ReadingValidation;

#[async_trait::async_trait]
impl Transform<ReadingRow, ReadingRow> for ReadingValidation {
    async fn apply(
        &self,
        input: Envelope<ReadingRow>,
    ) -> Result<Envelope<ReadingRow>, PipelineError> {
        match validate_reading(input) {
            Ok(env) => Ok(env),
            Err(e) => {
                metrics::counter!("validation_rejected_total").increment(1);
                Err(e)
            }
        }
    }
}
