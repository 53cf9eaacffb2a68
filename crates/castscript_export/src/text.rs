//! Plain-text script download.

use crate::MarkdownStripper;
use castscript_core::ScriptSections;
use chrono::NaiveDate;
use derive_getters::Getters;

/// MIME type of the text download.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// A named text file ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct TextDownload {
    filename: String,
    content: String,
}

impl TextDownload {
    /// The full script, named for `date`.
    ///
    /// # Examples
    ///
    /// ```
    /// use castscript_core::ScriptSections;
    /// use castscript_export::TextDownload;
    /// use chrono::NaiveDate;
    ///
    /// let sections = ScriptSections::new("Plan", "Opening", "Ending");
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    /// let download = TextDownload::for_script(&sections, date);
    ///
    /// assert_eq!(download.filename(), "kich_ban_2024-03-09.txt");
    /// assert!(download.content().starts_with("ĐỀ CƯƠNG KỊCH BẢN:\n\nPlan"));
    /// ```
    pub fn for_script(sections: &ScriptSections, date: NaiveDate) -> Self {
        Self {
            filename: script_filename(date),
            content: script_text(sections),
        }
    }

    /// The full script, named for today's UTC date.
    pub fn for_script_today(sections: &ScriptSections) -> Self {
        Self::for_script(sections, chrono::Utc::now().date_naive())
    }
}

/// Outline followed by the whole script body.
pub fn script_text(sections: &ScriptSections) -> String {
    format!(
        "ĐỀ CƯƠNG KỊCH BẢN:\n\n{}\n\n\nKỊCH BẢN ĐẦY ĐỦ:\n\n{}\n\n{}",
        sections.outline(),
        sections.first_sections(),
        sections.last_sections()
    )
}

/// [`script_text`] with markup stripped, for pasting elsewhere.
pub fn clipboard_text(sections: &ScriptSections, stripper: &MarkdownStripper) -> String {
    stripper.strip(&script_text(sections))
}

/// `kich_ban_YYYY-MM-DD.txt`
pub fn script_filename(date: NaiveDate) -> String {
    format!("kich_ban_{}.txt", date.format("%Y-%m-%d"))
}
