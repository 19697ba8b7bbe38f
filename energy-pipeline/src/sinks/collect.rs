use futures::StreamExt;

use crate::pipeline::{Envelope, PipelineError, Sink};

/// Everything one source pipeline produced: surviving payloads in original
/// row order, plus how many rows were dropped along the way.
#[derive(Debug)]
pub struct Collected<T> {
    pub rows: Vec<T>,
    pub dropped: u64,
}

/// Sink that gathers a source's stream into memory.
///
/// Error items are per-row drops: counted and traced at debug level, never
/// fatal. Downstream decides whether a source that kept nothing deserves a
/// diagnostic.
#[derive(Debug, Default)]
pub struct CollectSink;

#[async_trait::async_trait]
impl<T: Send + 'static> Sink<T> for CollectSink {
    type Output = Collected<T>;

    async fn run<S>(&self, mut input: S) -> Result<Collected<T>, PipelineError>
    where
        S: futures::Stream<Item = Result<Envelope<T>, PipelineError>> + Send + Unpin + 'static,
    {
        let mut rows: Vec<T> = Vec::new();
        let mut dropped: u64 = 0;

        while let Some(item) = input.next().await {
            match item {
                Ok(env) => rows.push(env.payload),
                Err(e) => {
                    tracing::debug!(error = %e, "dropping row");
                    dropped += 1;
                }
            }
        }

        Ok(Collected { rows, dropped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collects_ok_items_and_counts_errors() {
        let items: Vec<Result<Envelope<u32>, PipelineError>> = vec![
            Ok(Envelope { payload: 1, row: 1 }),
            Err(PipelineError::Source("row 2: bad".into())),
            Ok(Envelope { payload: 3, row: 3 }),
        ];
        let stream = futures::stream::iter(items);

        let collected = CollectSink.run(stream).await.unwrap();
        assert_eq!(collected.rows, vec![1, 3]);
        assert_eq!(collected.dropped, 1);
    }
}
