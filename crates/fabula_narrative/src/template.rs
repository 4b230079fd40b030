//! Prompt template store.
//!
//! Templates are data: a TOML table mapping each stage name to its prompt
//! text. A bundled set ships with the crate; a user file can replace any
//! subset of it. Every template is checked against its stage's declared
//! fields when it is loaded, so a typo in a placeholder fails at startup
//! rather than mid-pipeline.

use crate::render::{check_placeholders, placeholder_regex, render_template};
use crate::{PromptFields, Stage};
use fabula_error::{TemplateError, TemplateErrorKind};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

const BUNDLED_TEMPLATES: &str = include_str!("../data/prompts.toml");

/// Stage templates, validated against each stage's fields.
///
/// # Examples
///
/// ```
/// use fabula_narrative::{PromptFields, PromptTemplates, Stage, TemplateField};
///
/// let mut templates = PromptTemplates::bundled().unwrap();
/// templates
///     .merge_toml_str(r#"clarify = "Ask about {{focus_creature}} in {{story_context}}""#)
///     .unwrap();
///
/// let prompt = templates
///     .render(
///         Stage::Clarify,
///         &PromptFields::new()
///             .with(TemplateField::FocusCreature, "伊布")
///             .with(TemplateField::StoryContext, "森林裡"),
///     )
///     .unwrap();
/// assert_eq!(prompt, "Ask about 伊布 in 森林裡");
/// ```
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    templates: HashMap<Stage, String>,
    pattern: Regex,
}

impl PromptTemplates {
    /// The templates shipped with the crate.
    pub fn bundled() -> Result<Self, TemplateError> {
        Self::from_toml_str(BUNDLED_TEMPLATES)
    }

    /// Parse a complete template set.
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML, unknown stage names, unknown placeholders or
    /// a stage without a template.
    #[instrument(skip(text), fields(len = text.len()))]
    pub fn from_toml_str(text: &str) -> Result<Self, TemplateError> {
        let mut store = Self {
            templates: HashMap::new(),
            pattern: placeholder_regex()?,
        };
        store.merge_toml_str(text)?;

        if let Some(missing) = Stage::iter().find(|s| !store.templates.contains_key(s)) {
            return Err(TemplateError::new(TemplateErrorKind::MissingTemplate(
                missing.to_string(),
            )));
        }
        Ok(store)
    }

    /// Replace the templates named in `text`, keeping the rest.
    ///
    /// Nothing is replaced unless every template in `text` is valid.
    pub fn merge_toml_str(&mut self, text: &str) -> Result<(), TemplateError> {
        let table: BTreeMap<String, String> = toml::from_str(text)
            .map_err(|e| TemplateError::new(TemplateErrorKind::TomlParse(e.to_string())))?;

        let mut parsed = Vec::with_capacity(table.len());
        for (name, template) in table {
            let stage = Stage::from_str(&name)
                .map_err(|_| TemplateError::new(TemplateErrorKind::UnknownStage(name.clone())))?;
            check_placeholders(&self.pattern, stage, &template)?;
            parsed.push((stage, template));
        }

        for (stage, template) in parsed {
            debug!(stage = %stage, "Loaded template");
            self.templates.insert(stage, template);
        }
        Ok(())
    }

    /// Replace templates with those in a TOML file.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn merge_file(&mut self, path: impl AsRef<Path>) -> Result<(), TemplateError> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            TemplateError::new(TemplateErrorKind::FileRead(format!(
                "{}: {}",
                path.as_ref().display(),
                e
            )))
        })?;
        self.merge_toml_str(&text)
    }

    /// Raw template text for a stage.
    pub fn get(&self, stage: Stage) -> Option<&str> {
        self.templates.get(&stage).map(String::as_str)
    }

    /// Render a stage's template.
    pub fn render(&self, stage: Stage, fields: &PromptFields) -> Result<String, TemplateError> {
        let template = self.get(stage).ok_or_else(|| {
            TemplateError::new(TemplateErrorKind::MissingTemplate(stage.to_string()))
        })?;
        render_template(&self.pattern, stage, template, fields)
    }
}
