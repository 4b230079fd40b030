//! Creature roster used to label names in prompts.

use derive_getters::Getters;
use fabula_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, instrument};

const BUNDLED_ROSTER: &str = include_str!("../data/creatures.toml");

/// One roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct CreatureEntry {
    /// National index number
    #[serde(default)]
    id: Option<u32>,
    /// Localized name, the lookup key
    zh_name: String,
    /// English name
    en_name: String,
    /// Japanese name
    #[serde(default)]
    ja_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    creature: Vec<CreatureEntry>,
}

/// Lookup from creature name to roster entry.
///
/// # Examples
///
/// ```
/// use fabula_narrative::CreatureRoster;
///
/// let roster = CreatureRoster::bundled().unwrap();
/// assert_eq!(roster.display_name("皮卡丘"), "皮卡丘 (Pikachu)");
/// assert_eq!(roster.display_name("不存在寶可夢"), "不存在寶可夢");
/// assert_eq!(
///     roster.format_list(&["伊布", "超夢"]),
///     "伊布 (Eevee), 超夢 (Mewtwo)"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatureRoster {
    by_zh: HashMap<String, CreatureEntry>,
    zh_by_en: HashMap<String, String>,
}

impl CreatureRoster {
    /// The roster shipped with the crate.
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_toml_str(BUNDLED_ROSTER)
    }

    /// Parse a roster file's contents.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: RosterFile = toml::from_str(text)
            .map_err(|e| ConfigError::new(format!("Failed to parse creature roster: {}", e)))?;
        let mut roster = Self::default();
        for entry in file.creature {
            roster.insert(entry);
        }
        debug!(entries = roster.len(), "Loaded creature roster");
        Ok(roster)
    }

    /// Load a roster from a file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!(
                "Failed to read creature roster {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&text)
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, entry: CreatureEntry) {
        self.zh_by_en
            .insert(entry.en_name.to_lowercase(), entry.zh_name.clone());
        self.by_zh.insert(entry.zh_name.clone(), entry);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.by_zh.len()
    }

    /// True when the roster has no entries.
    pub fn is_empty(&self) -> bool {
        self.by_zh.is_empty()
    }

    /// Entry for a localized or English name.
    pub fn lookup(&self, name: &str) -> Option<&CreatureEntry> {
        let name = name.trim();
        self.by_zh.get(name).or_else(|| {
            self.zh_by_en
                .get(&name.to_lowercase())
                .and_then(|zh| self.by_zh.get(zh))
        })
    }

    /// `zh (en)` for known creatures, the trimmed name otherwise.
    pub fn display_name(&self, name: &str) -> String {
        match self.lookup(name) {
            Some(entry) => format!("{} ({})", entry.zh_name, entry.en_name),
            None => name.trim().to_string(),
        }
    }

    /// Comma-separated display names.
    pub fn format_list<S: AsRef<str>>(&self, names: &[S]) -> String {
        names
            .iter()
            .map(|n| self.display_name(n.as_ref()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Names a model might use for `name`: the name itself plus its roster
    /// counterparts.
    pub(crate) fn aliases(&self, name: &str) -> Vec<String> {
        let name = name.trim();
        let mut aliases = vec![name.to_string()];
        if let Some(entry) = self.lookup(name) {
            for alias in [&entry.zh_name, &entry.en_name] {
                if !aliases.iter().any(|a| a == alias) {
                    aliases.push(alias.clone());
                }
            }
        }
        aliases
    }
}
