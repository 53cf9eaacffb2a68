//! Single transcript command handler.

use super::pipeline_for;
use castscript::{
    CastscriptResult, PipelineStage, ScriptSections, Settings, TextGenerator, ValidationError,
    ValidationErrorKind, script_docx, script_text, write_file,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{info, instrument};

/// Files to write besides printing the script.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutputs {
    /// Plain text copy
    pub txt: Option<PathBuf>,
    /// Word document
    pub docx: Option<PathBuf>,
}

/// Handle the `process` command.
///
/// Prints the script to stdout and stage progress to stderr.
#[instrument(skip(settings, generator, outputs), fields(input = %input.display()))]
pub async fn process_transcript(
    settings: &Settings,
    generator: Arc<dyn TextGenerator>,
    input: &Path,
    profile: Option<&str>,
    outputs: &ProcessOutputs,
) -> CastscriptResult<()> {
    let transcript = read_input(input).await?;
    if transcript.trim().is_empty() {
        return Err(ValidationError::new(ValidationErrorKind::MissingTranscript).into());
    }

    let pipeline = pipeline_for(settings, generator, profile)?;
    info!(profile = %pipeline.profile().name(), "Processing transcript");

    let report = |stage: &PipelineStage| eprintln!("[{}]", stage);
    let sections = pipeline.run(&transcript, &report).await?;

    println!("{}", script_text(&sections));
    write_outputs(&sections, outputs)
}

async fn read_input(input: &Path) -> CastscriptResult<String> {
    let unreadable = |e: std::io::Error| {
        ValidationError::new(ValidationErrorKind::UnreadableInput {
            path: input.display().to_string(),
            message: e.to_string(),
        })
    };

    if input == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .map_err(unreadable)?;
        Ok(text)
    } else {
        Ok(tokio::fs::read_to_string(input).await.map_err(unreadable)?)
    }
}

fn write_outputs(sections: &ScriptSections, outputs: &ProcessOutputs) -> CastscriptResult<()> {
    if let Some(path) = &outputs.txt {
        write_file(path, script_text(sections).as_bytes())?;
    }
    if let Some(path) = &outputs.docx {
        write_file(path, &script_docx(sections)?)?;
    }
    Ok(())
}
