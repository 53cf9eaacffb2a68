//! Spreadsheet batch command handler.

use super::pipeline_for;
use castscript::{
    BatchResultItem, BatchRunner, CastscriptResult, FnBatchObserver, Settings, TextGenerator,
    ValidationError, ValidationErrorKind, batch_report_docx, export_items, import_items,
    write_file,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// Handle the `batch` command.
///
/// Every pending row is processed in order; a failed row keeps its error and
/// the batch carries on. Results are written once the batch finishes.
#[instrument(skip(settings, generator), fields(input = %input.display()))]
pub async fn run_batch(
    settings: &Settings,
    generator: Arc<dyn TextGenerator>,
    input: &Path,
    output: &Path,
    docx: Option<&Path>,
    profile: Option<&str>,
) -> CastscriptResult<()> {
    let bytes = tokio::fs::read(input).await.map_err(|e| {
        ValidationError::new(ValidationErrorKind::UnreadableInput {
            path: input.display().to_string(),
            message: e.to_string(),
        })
    })?;
    let items = import_items(&bytes)?;
    info!(items = items.len(), "Imported transcripts");

    let runner = BatchRunner::new(pipeline_for(settings, generator, profile)?);
    let observer = FnBatchObserver::new(
        |percent| eprintln!("Progress: {}%", percent),
        |items: &[BatchResultItem]| {
            let done = items.iter().filter(|item| item.processed()).count();
            eprintln!("{}/{} processed", done, items.len());
        },
    );
    let items = runner.run(items, &observer).await;

    write_file(output, &export_items(&items)?)?;
    if let Some(path) = docx {
        write_file(path, &batch_report_docx(&items)?)?;
    }

    let failed = items.iter().filter(|item| item.error().is_some()).count();
    eprintln!(
        "Wrote {} ({} items, {} failed)",
        output.display(),
        items.len(),
        failed
    );
    Ok(())
}
