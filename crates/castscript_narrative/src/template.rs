//! `{{name}}` placeholder substitution for prompt templates.

use castscript_error::{PipelineError, PipelineErrorKind};
use regex::Regex;
use std::collections::HashMap;

const PLACEHOLDER_PATTERN: &str = r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}";

fn placeholder_regex() -> Result<Regex, PipelineError> {
    Regex::new(PLACEHOLDER_PATTERN).map_err(|e| {
        PipelineError::new(PipelineErrorKind::TemplateError(format!(
            "Invalid template regex: {}",
            e
        )))
    })
}

/// Named values available to a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    values: HashMap<String, String>,
}

impl TemplateContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any earlier one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Look up a value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Names referenced by a template, in order of first appearance.
pub fn placeholders(template: &str) -> Result<Vec<String>, PipelineError> {
    let re = placeholder_regex()?;
    let mut names: Vec<String> = Vec::new();
    for cap in re.captures_iter(template) {
        let name = &cap[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Substitute every placeholder in `template`.
///
/// Only the template is scanned, so substituted values that happen to contain
/// `{{...}}` are left alone.
///
/// # Errors
///
/// `TemplateError` when the template names a value the context lacks.
///
/// # Examples
///
/// ```
/// use castscript_narrative::{TemplateContext, render_template};
///
/// let mut ctx = TemplateContext::new();
/// ctx.insert("part_number", "2");
/// ctx.insert("total_parts", "5");
///
/// let prompt = render_template("Write part {{part_number}} of {{ total_parts }}.", &ctx).unwrap();
/// assert_eq!(prompt, "Write part 2 of 5.");
///
/// assert!(render_template("{{missing}}", &ctx).is_err());
/// ```
pub fn render_template(template: &str, context: &TemplateContext) -> Result<String, PipelineError> {
    let re = placeholder_regex()?;
    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;

    for cap in re.captures_iter(template) {
        let Some(whole) = cap.get(0) else { continue };
        let name = &cap[1];
        let value = context.get(name).ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::TemplateError(format!(
                "Unknown placeholder '{{{{{}}}}}'",
                name
            )))
        })?;

        rendered.push_str(&template[last..whole.start()]);
        rendered.push_str(value);
        last = whole.end();
    }

    rendered.push_str(&template[last..]);
    Ok(rendered)
}
