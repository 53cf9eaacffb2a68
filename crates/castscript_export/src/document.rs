//! Word-processing document export.

use crate::{Block, MarkupParser, Span};
use castscript_core::{BatchResultItem, ScriptSections};
use castscript_error::{
    CastscriptResult, ExportError, ExportErrorKind, ValidationError, ValidationErrorKind,
};
use docx_rs::{Docx, Paragraph, Run, RunFonts};
use std::io::Cursor;

/// MIME type of `.docx` files.
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Download name for the generic data report.
pub const DATA_REPORT_FILENAME: &str = "generated-report.docx";

/// Download name for a batch report.
pub const BATCH_REPORT_FILENAME: &str = "processed_transcripts.docx";

/// Title of the generic data report.
pub const DATA_REPORT_TITLE: &str = "Generated Data Report";

/// Title of a batch report.
pub const BATCH_REPORT_TITLE: &str = "Kết Quả Xử Lý Kịch Bản";

// Sizes are in half-points
const BODY_SIZE: usize = 24;
const HEADING_SIZES: [usize; 6] = [32, 28, 26, 24, 24, 24];
const CODE_FONT: &str = "Courier New";

/// Encode blocks as a `.docx` file.
pub fn render_docx(blocks: &[Block]) -> Result<Vec<u8>, ExportError> {
    let docx = blocks
        .iter()
        .flat_map(block_paragraphs)
        .fold(Docx::new(), |docx, paragraph| docx.add_paragraph(paragraph));

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| ExportError::new(ExportErrorKind::Document(e.to_string())))?;

    let bytes = buffer.into_inner();
    tracing::debug!(blocks = blocks.len(), bytes = bytes.len(), "Rendered document");
    Ok(bytes)
}

fn block_paragraphs(block: &Block) -> Vec<Paragraph> {
    match block {
        Block::Heading { level, spans } => {
            let index = usize::from(level.saturating_sub(1)).min(HEADING_SIZES.len() - 1);
            let size = HEADING_SIZES[index];
            vec![spans.iter().fold(Paragraph::new(), |p, span| {
                p.add_run(styled_run(span, size).bold())
            })]
        }
        Block::Paragraph(spans) => vec![span_paragraph(None, spans)],
        Block::Bullet(spans) => vec![span_paragraph(Some("• ".to_string()), spans)],
        Block::Numbered { number, spans } => {
            vec![span_paragraph(Some(format!("{}. ", number)), spans)]
        }
        Block::Quote(spans) => vec![spans.iter().fold(Paragraph::new(), |p, span| {
            p.add_run(styled_run(span, BODY_SIZE).italic())
        })],
        Block::Code(lines) => lines
            .iter()
            .map(|line| {
                Paragraph::new().add_run(
                    Run::new()
                        .add_text(line)
                        .size(BODY_SIZE)
                        .fonts(RunFonts::new().ascii(CODE_FONT)),
                )
            })
            .collect(),
    }
}

fn span_paragraph(prefix: Option<String>, spans: &[Span]) -> Paragraph {
    let paragraph = match prefix {
        Some(prefix) => Paragraph::new().add_run(Run::new().add_text(prefix).size(BODY_SIZE)),
        None => Paragraph::new(),
    };
    spans
        .iter()
        .fold(paragraph, |p, span| p.add_run(styled_run(span, BODY_SIZE)))
}

fn styled_run(span: &Span, size: usize) -> Run {
    let mut run = Run::new().add_text(&span.text).size(size);
    if span.bold {
        run = run.bold();
    }
    if span.italic {
        run = run.italic();
    }
    run
}

/// Blocks for a single finished script.
pub fn script_blocks(sections: &ScriptSections, parser: &MarkupParser) -> Vec<Block> {
    let mut blocks = vec![Block::heading(1, "Đề Cương Kịch Bản")];
    blocks.extend(parser.parse(sections.outline()));
    blocks.push(Block::heading(1, "Kịch Bản Đầy Đủ"));
    blocks.extend(parser.parse(sections.first_sections()));
    blocks.extend(parser.parse(sections.last_sections()));
    blocks
}

/// Blocks for a batch report: a title, then one section per item.
///
/// Done items list their transcript, outline and both halves; failed items
/// list their transcript and error.
pub fn batch_report_blocks(items: &[BatchResultItem], parser: &MarkupParser) -> Vec<Block> {
    let mut blocks = vec![Block::heading(1, BATCH_REPORT_TITLE)];

    for (index, item) in items.iter().enumerate() {
        blocks.push(Block::heading(2, format!("Kịch Bản {}", index + 1)));
        blocks.push(Block::heading(3, "Transcript:"));
        blocks.extend(item.transcript().lines().filter(|l| !l.trim().is_empty()).map(Block::text));

        let labeled = [
            ("Đề Cương:", item.outline()),
            ("Phần Đầu:", item.first_sections()),
            ("Phần Cuối:", item.last_sections()),
        ];
        for (label, content) in labeled {
            if let Some(content) = content {
                blocks.push(Block::heading(3, label));
                blocks.extend(parser.parse(content));
            }
        }

        if let Some(error) = item.error() {
            blocks.push(Block::heading(3, "Lỗi:"));
            blocks.push(Block::text(error));
        }
    }
    blocks
}

/// Blocks for the generic data report.
///
/// String data is rendered as markup; any other JSON value is pretty-printed.
pub fn data_report_blocks(
    data: &serde_json::Value,
    generated_at: &str,
    parser: &MarkupParser,
) -> Vec<Block> {
    let mut blocks = vec![Block::heading(1, DATA_REPORT_TITLE), Block::text(generated_at)];
    match data {
        serde_json::Value::String(text) => blocks.extend(parser.parse(text)),
        other => {
            let pretty = serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string());
            blocks.push(Block::Code(pretty.lines().map(str::to_string).collect()));
        }
    }
    blocks
}

/// Whether a request's `data` counts as absent.
///
/// Null, `false`, zero and the empty string are all absent.
pub fn is_missing_data(data: &serde_json::Value) -> bool {
    match data {
        serde_json::Value::Null => true,
        serde_json::Value::Bool(b) => !b,
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        serde_json::Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Render one finished script as a `.docx` file.
pub fn script_docx(sections: &ScriptSections) -> CastscriptResult<Vec<u8>> {
    let parser = MarkupParser::new()?;
    Ok(render_docx(&script_blocks(sections, &parser))?)
}

/// Render a batch report as a `.docx` file.
///
/// # Errors
///
/// `NothingToExport` when `items` is empty.
#[tracing::instrument(skip_all, fields(items = items.len()))]
pub fn batch_report_docx(items: &[BatchResultItem]) -> CastscriptResult<Vec<u8>> {
    if items.is_empty() {
        return Err(ValidationError::new(ValidationErrorKind::NothingToExport).into());
    }
    let parser = MarkupParser::new()?;
    Ok(render_docx(&batch_report_blocks(items, &parser))?)
}

/// Render the generic data report, stamped with the current local time.
///
/// # Errors
///
/// `MissingData` when [`is_missing_data`] holds.
pub fn data_report_docx(data: &serde_json::Value) -> CastscriptResult<Vec<u8>> {
    if is_missing_data(data) {
        return Err(ValidationError::new(ValidationErrorKind::MissingData).into());
    }
    let parser = MarkupParser::new()?;
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    Ok(render_docx(&data_report_blocks(data, &generated_at, &parser))?)
}
