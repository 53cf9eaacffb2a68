//! Export formats for castscript.
//!
//! - [`import_items`] / [`export_items`]: batch items from and to `.xlsx`
//! - [`render_docx`] and the report builders: `.docx` documents from
//!   lightweight markup
//! - [`TextDownload`]: the plain-text script download
//! - [`MarkdownStripper`]: markup removal used before spreadsheet and
//!   clipboard output
//!
//! The spreadsheet and document encoders are third-party crates; this crate
//! only decides what goes into them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod markup;
mod plain_text;
mod spreadsheet;
mod text;

pub use document::{
    BATCH_REPORT_FILENAME, BATCH_REPORT_TITLE, DATA_REPORT_FILENAME, DATA_REPORT_TITLE,
    DOCX_CONTENT_TYPE, batch_report_blocks, batch_report_docx, data_report_blocks,
    data_report_docx, is_missing_data, render_docx, script_blocks, script_docx,
};
pub use markup::{Block, MarkupParser, Span, parse_markup};
pub use plain_text::{MarkdownStripper, markdown_to_plain_text};
pub use spreadsheet::{
    EXPORT_COLUMNS, MAX_CELL_CHARS, SHEET_NAME, TRANSCRIPT_COLUMN, XLSX_CONTENT_TYPE,
    XLSX_FILENAME, export_items, export_row, import_items, truncate_cell,
};
pub use text::{TEXT_CONTENT_TYPE, TextDownload, clipboard_text, script_filename, script_text};

use castscript_error::{ExportError, ExportErrorKind};
use std::path::Path;

/// Write encoded bytes to `path`.
pub fn write_file(path: impl AsRef<Path>, bytes: &[u8]) -> Result<(), ExportError> {
    let path = path.as_ref();
    std::fs::write(path, bytes).map_err(|e| {
        ExportError::new(ExportErrorKind::FileWrite {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    })?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Wrote file");
    Ok(())
}
