//! Spreadsheet import and export of batch items.

use crate::MarkdownStripper;
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use castscript_core::BatchResultItem;
use castscript_error::{
    CastscriptResult, ExportError, ExportErrorKind, ValidationError, ValidationErrorKind,
};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::io::Cursor;

/// Header that marks the transcript column of an uploaded sheet.
pub const TRANSCRIPT_COLUMN: &str = "transcript";

/// Name of the exported worksheet.
pub const SHEET_NAME: &str = "Processed Transcripts";

/// Default download name for exported results.
pub const XLSX_FILENAME: &str = "processed_transcripts.xlsx";

/// MIME type of `.xlsx` files.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Longest text a spreadsheet cell can hold.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Exported column headers, in order.
pub const EXPORT_COLUMNS: [&str; 7] = [
    "transcript",
    "outline",
    "firstSections",
    "lastSections",
    "fullContent",
    "processed",
    "error",
];

/// Read transcripts from an uploaded workbook.
///
/// The first sheet is used and its first row is the header. Rows whose
/// One pending item per data row, in sheet order; a row with a blank
/// transcript cell yields an item with an empty transcript.
///
/// # Errors
///
/// Validation errors, shown to the user as-is:
/// - the bytes are not a readable `.xlsx`/`.xls`/`.ods` workbook
/// - the first sheet has no header or no data rows
/// - no header cell is exactly `transcript`
#[tracing::instrument(skip_all, fields(bytes = bytes.len()))]
pub fn import_items(bytes: &[u8]) -> CastscriptResult<Vec<BatchResultItem>> {
    let unreadable =
        |e: calamine::Error| ValidationError::new(ValidationErrorKind::UnreadableWorkbook(e.to_string()));

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(unreadable)?;
    let Some(first_sheet) = workbook.sheet_names().first().cloned() else {
        return Err(ValidationError::new(ValidationErrorKind::EmptyWorkbook).into());
    };
    let range = workbook.worksheet_range(&first_sheet).map_err(unreadable)?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| ValidationError::new(ValidationErrorKind::EmptyWorkbook))?;
    let data_rows: Vec<&[Data]> = rows.collect();
    if data_rows.is_empty() {
        return Err(ValidationError::new(ValidationErrorKind::EmptyWorkbook).into());
    }

    let column = header
        .iter()
        .position(|cell| cell_text(cell).trim() == TRANSCRIPT_COLUMN)
        .ok_or_else(|| ValidationError::new(ValidationErrorKind::MissingTranscriptColumn))?;

    let items: Vec<BatchResultItem> = data_rows
        .into_iter()
        .map(|row| row.get(column).map(cell_text).unwrap_or_default())
        .map(BatchResultItem::pending)
        .collect();
    let blank = items.iter().filter(|i| i.transcript().trim().is_empty()).count();
    if blank > 0 {
        tracing::debug!(blank, "Imported rows with blank transcripts");
    }

    tracing::info!(sheet = %first_sheet, items = items.len(), "Imported transcripts");
    Ok(items)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Encode batch items as an `.xlsx` workbook.
///
/// Outline and sections are stripped of markup; `fullContent` joins all
/// three before stripping. Cells longer than [`MAX_CELL_CHARS`] are cut.
///
/// # Errors
///
/// `NothingToExport` for an empty slice; `Spreadsheet` when encoding fails.
#[tracing::instrument(skip_all, fields(items = items.len()))]
pub fn export_items(items: &[BatchResultItem]) -> CastscriptResult<Vec<u8>> {
    if items.is_empty() {
        return Err(ValidationError::new(ValidationErrorKind::NothingToExport).into());
    }

    let stripper = MarkdownStripper::new()?;
    let buffer = write_workbook(items, &stripper).map_err(|e| {
        ExportError::new(ExportErrorKind::Spreadsheet(e.to_string()))
    })?;

    tracing::debug!(bytes = buffer.len(), "Encoded workbook");
    Ok(buffer)
}

fn write_workbook(items: &[BatchResultItem], stripper: &MarkdownStripper) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, name) in (0u16..).zip(EXPORT_COLUMNS) {
        sheet.write_string_with_format(0, col, name, &header_format)?;
    }

    for (row, item) in (1u32..).zip(items) {
        for (col, value) in (0u16..).zip(export_row(item, stripper)) {
            sheet.write_string(row, col, truncate_cell(&value))?;
        }
    }

    workbook.save_to_buffer()
}

/// Cell values for one item, in [`EXPORT_COLUMNS`] order.
pub fn export_row(item: &BatchResultItem, stripper: &MarkdownStripper) -> [String; 7] {
    let outline = item.outline().unwrap_or_default();
    let first = item.first_sections().unwrap_or_default();
    let last = item.last_sections().unwrap_or_default();

    [
        item.transcript().to_string(),
        stripper.strip(outline),
        stripper.strip(first),
        stripper.strip(last),
        stripper.strip(&format!("{}\n\n{}\n\n{}", outline, first, last)),
        if item.processed() { "Yes" } else { "No" }.to_string(),
        item.error().unwrap_or_default().to_string(),
    ]
}

/// Cut `value` to at most [`MAX_CELL_CHARS`] characters.
pub fn truncate_cell(value: &str) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}
