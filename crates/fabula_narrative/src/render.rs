//! Prompt rendering: filling a stage template with named field values.

use crate::{Stage, TemplateField};
use fabula_error::{TemplateError, TemplateErrorKind};
use regex::Regex;
use std::collections::HashMap;
use std::str::FromStr;

/// Matches `{{ name }}` placeholders.
const PLACEHOLDER_PATTERN: &str = r"\{\{\s*([^{}\s]+)\s*\}\}";

/// Field values for one render.
///
/// # Examples
///
/// ```
/// use fabula_narrative::{PromptFields, TemplateField};
///
/// let fields = PromptFields::new()
///     .with(TemplateField::Theme, "友情")
///     .with(TemplateField::Genre, "冒險");
/// assert_eq!(fields.get(TemplateField::Theme), Some("友情"));
/// assert_eq!(fields.get(TemplateField::Plan), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptFields {
    values: HashMap<TemplateField, String>,
}

impl PromptFields {
    /// No fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any earlier value.
    pub fn with(mut self, field: TemplateField, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field in place.
    pub fn insert(&mut self, field: TemplateField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Value of a field.
    pub fn get(&self, field: TemplateField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Number of fields set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Compile the placeholder matcher.
pub(crate) fn placeholder_regex() -> Result<Regex, TemplateError> {
    Regex::new(PLACEHOLDER_PATTERN)
        .map_err(|e| TemplateError::new(TemplateErrorKind::InvalidPattern(e.to_string())))
}

/// Check that every placeholder in `template` is a field `stage` declares.
pub(crate) fn check_placeholders(
    pattern: &Regex,
    stage: Stage,
    template: &str,
) -> Result<(), TemplateError> {
    for cap in pattern.captures_iter(template) {
        resolve_field(stage, &cap[1])?;
    }
    Ok(())
}

/// Render `template` for `stage`.
///
/// # Errors
///
/// - [`TemplateErrorKind::UnknownPlaceholder`] for a placeholder the stage
///   does not declare
/// - [`TemplateErrorKind::MissingField`] for a referenced field with no value
pub(crate) fn render_template(
    pattern: &Regex,
    stage: Stage,
    template: &str,
    fields: &PromptFields,
) -> Result<String, TemplateError> {
    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;

    for cap in pattern.captures_iter(template) {
        let Some(whole) = cap.get(0) else { continue };
        let field = resolve_field(stage, &cap[1])?;
        let value = fields.get(field).ok_or_else(|| {
            TemplateError::new(TemplateErrorKind::MissingField {
                stage: stage.to_string(),
                field: field.to_string(),
            })
        })?;
        rendered.push_str(&template[last..whole.start()]);
        rendered.push_str(value);
        last = whole.end();
    }
    rendered.push_str(&template[last..]);

    Ok(rendered.trim().to_string())
}

fn resolve_field(stage: Stage, name: &str) -> Result<TemplateField, TemplateError> {
    let unknown = || {
        TemplateError::new(TemplateErrorKind::UnknownPlaceholder {
            stage: stage.to_string(),
            placeholder: name.to_string(),
        })
    };
    let field = TemplateField::from_str(name).map_err(|_| unknown())?;
    if stage.fields().contains(&field) {
        Ok(field)
    } else {
        Err(unknown())
    }
}
