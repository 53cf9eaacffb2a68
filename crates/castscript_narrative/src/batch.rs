//! Sequential batch processing with per-item error isolation.

use crate::pipeline::{NoopStageObserver, ScriptPipeline};
use castscript_core::BatchResultItem;
use castscript_error::{CastscriptError, ValidationError, ValidationErrorKind};
use castscript_interface::TextGenerator;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Receives batch progress.
pub trait BatchObserver: Send + Sync {
    /// Percentage of items handled so far, 0..=100.
    fn on_progress(&self, _percent: u8) {}

    /// Snapshot of every item after one was processed.
    fn on_item_complete(&self, _items: &[BatchResultItem]) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBatchObserver;

impl BatchObserver for NoopBatchObserver {}

/// Adapts a pair of closures into a [`BatchObserver`].
///
/// # Examples
///
/// ```
/// use castscript_narrative::{BatchObserver, FnBatchObserver};
/// use std::sync::Mutex;
///
/// let seen = Mutex::new(Vec::new());
/// let observer = FnBatchObserver::new(|p| seen.lock().unwrap().push(p), |_items| {});
/// observer.on_progress(50);
/// assert_eq!(*seen.lock().unwrap(), vec![50]);
/// ```
pub struct FnBatchObserver<P, C> {
    on_progress: P,
    on_item_complete: C,
}

impl<P, C> FnBatchObserver<P, C>
where
    P: Fn(u8) + Send + Sync,
    C: Fn(&[BatchResultItem]) + Send + Sync,
{
    /// Wrap the progress and item-complete callbacks.
    pub fn new(on_progress: P, on_item_complete: C) -> Self {
        Self {
            on_progress,
            on_item_complete,
        }
    }
}

impl<P, C> BatchObserver for FnBatchObserver<P, C>
where
    P: Fn(u8) + Send + Sync,
    C: Fn(&[BatchResultItem]) + Send + Sync,
{
    fn on_progress(&self, percent: u8) {
        (self.on_progress)(percent)
    }

    fn on_item_complete(&self, items: &[BatchResultItem]) {
        (self.on_item_complete)(items)
    }
}

/// `round(done / total * 100)`.
fn percent_complete(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((done as f64 / total as f64) * 100.0).round() as u8
}

/// Runs a pipeline over many transcripts, one at a time.
pub struct BatchRunner<G: TextGenerator + ?Sized> {
    pipeline: ScriptPipeline<G>,
}

impl<G: TextGenerator + ?Sized> BatchRunner<G> {
    /// Create a runner; the pipeline's config supplies the item delay.
    pub fn new(pipeline: ScriptPipeline<G>) -> Self {
        Self { pipeline }
    }

    /// Process every pending item in order and return the updated items.
    ///
    /// - Items already processed are skipped but still count toward progress.
    /// - A pending item that succeeds gets its sections, `processed = true`
    ///   and no error; one that fails keeps `processed = false` and records
    ///   the error. Failures never stop the batch.
    /// - After each pending item the observer gets the progress and then a
    ///   snapshot, followed by the configured pause unless it was the last item.
    #[instrument(skip(self, items, observer), fields(items = items.len(), profile = %self.pipeline.profile().name()))]
    pub async fn run(
        &self,
        mut items: Vec<BatchResultItem>,
        observer: &dyn BatchObserver,
    ) -> Vec<BatchResultItem> {
        let total = items.len();
        let delay = Duration::from_millis(*self.pipeline.config().batch_delay_ms());
        let mut succeeded = 0usize;
        let mut failed = 0usize;

        for index in 0..total {
            let percent = percent_complete(index + 1, total);

            if items[index].processed() {
                info!(item = index + 1, "Already processed, skipping");
                observer.on_progress(percent);
                continue;
            }

            info!(item = index + 1, of = total, "Processing transcript");
            match self.process_item(items[index].transcript()).await {
                Ok(sections) => {
                    items[index].record_success(sections);
                    succeeded += 1;
                }
                Err(message) => {
                    warn!(item = index + 1, error = %message, "Transcript failed");
                    items[index].record_failure(message);
                    failed += 1;
                }
            }

            observer.on_progress(percent);
            observer.on_item_complete(&items);

            if index + 1 < total {
                tokio::time::sleep(delay).await;
            }
        }

        info!(succeeded, failed, skipped = total - succeeded - failed, "Batch complete");
        items
    }

    async fn process_item(&self, transcript: &str) -> Result<castscript_core::ScriptSections, String> {
        if transcript.trim().is_empty() {
            let err: CastscriptError = ValidationError::new(ValidationErrorKind::MissingTranscript).into();
            return Err(err.user_message());
        }
        self.pipeline
            .process_with(transcript, &NoopStageObserver)
            .await
            .into_sections()
    }
}
