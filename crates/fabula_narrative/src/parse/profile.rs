//! Character profile parser.

use super::{clean_value, split_label, strip_decoration};
use crate::CreatureRoster;
use fabula_core::CharacterProfile;
use fabula_error::{ParseError, ParseErrorKind};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProfileField {
    Name,
    Personality,
    Motivation,
    InnerConflict,
    Relationships,
    Monologue,
}

const LABELS: [(&str, ProfileField); 6] = [
    ("名稱", ProfileField::Name),
    ("性格特點", ProfileField::Personality),
    ("核心動機", ProfileField::Motivation),
    ("潛在內心衝突", ProfileField::InnerConflict),
    ("與其他角色可能的關係", ProfileField::Relationships),
    ("一句代表性的內心獨白", ProfileField::Monologue),
];

#[derive(Debug, Default)]
struct Block {
    name: String,
    fields: Vec<(ProfileField, String)>,
    raw: Vec<String>,
    /// Opened by a heading line rather than a `名稱:` line
    from_heading: bool,
}

impl Block {
    fn append(&mut self, field: ProfileField, text: &str) {
        match self.fields.iter_mut().find(|(f, _)| *f == field) {
            Some((_, value)) if !text.is_empty() => {
                if !value.is_empty() {
                    value.push('\n');
                }
                value.push_str(text);
            }
            Some(_) => {}
            None => self.fields.push((field, text.to_string())),
        }
    }

    fn get(&self, field: ProfileField) -> Option<String> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn into_profile(self, creature: &str) -> CharacterProfile {
        let mut builder = CharacterProfile::builder();
        builder.creature(creature).raw(self.raw.join("\n"));
        if let Some(value) = self.get(ProfileField::Personality) {
            builder.personality(value);
        }
        if let Some(value) = self.get(ProfileField::Motivation) {
            builder.motivation(value);
        }
        if let Some(value) = self.get(ProfileField::InnerConflict) {
            builder.inner_conflict(value);
        }
        if let Some(value) = self.get(ProfileField::Relationships) {
            builder.relationships(value);
        }
        if let Some(value) = self.get(ProfileField::Monologue) {
            builder.monologue(value);
        }
        builder.build().unwrap_or_default()
    }

    /// The name without a trailing parenthetical, lowercased.
    fn base_name(&self) -> String {
        self.name
            .split(['(', '（'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    }
}

/// Parse character profiles and align them with the requested creatures.
///
/// The answer is split into blocks at each `名稱:` line, and at each
/// markdown heading that names a requested creature. Each requested
/// creature takes the first unused block whose name mentions it (or its
/// roster counterpart), so the result has one profile per creature in the
/// requested order regardless of the order the model wrote them in.
///
/// # Errors
///
/// [`ParseErrorKind::MissingProfile`] for the first creature without a block.
pub fn parse_profiles(
    raw: &str,
    creatures: &[&str],
    roster: &CreatureRoster,
) -> Result<Vec<CharacterProfile>, ParseError> {
    let alias_sets: Vec<Vec<String>> = creatures
        .iter()
        .map(|creature| {
            roster
                .aliases(creature)
                .into_iter()
                .map(|a| a.to_lowercase())
                .collect()
        })
        .collect();
    let mut blocks = split_blocks(raw, &alias_sets);
    debug!(blocks = blocks.len(), requested = creatures.len(), "Split profile blocks");

    let mut profiles = Vec::with_capacity(creatures.len());
    for (creature, aliases) in creatures.iter().zip(&alias_sets) {
        let exact = blocks
            .iter()
            .position(|block| aliases.contains(&block.base_name()));
        let position = exact.or_else(|| {
            blocks.iter().position(|block| {
                let name = block.name.to_lowercase();
                aliases.iter().any(|alias| name.contains(alias.as_str()))
            })
        });
        match position {
            Some(index) => profiles.push(blocks.remove(index).into_profile(creature.trim())),
            None => {
                return Err(ParseError::new(ParseErrorKind::MissingProfile(
                    creature.trim().to_string(),
                )));
            }
        }
    }
    Ok(profiles)
}

fn split_blocks(raw: &str, alias_sets: &[Vec<String>]) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut field: Option<ProfileField> = None;

    for line in raw.lines() {
        if let Some(name) = heading_name(line, alias_sets) {
            blocks.push(Block {
                name,
                raw: vec![line.trim().to_string()],
                from_heading: true,
                ..Block::default()
            });
            field = None;
            continue;
        }
        match label_of(line) {
            Some((ProfileField::Name, value)) => {
                match blocks.last_mut() {
                    Some(block) if block.from_heading && block.fields.is_empty() => {
                        block.name = value;
                        block.from_heading = false;
                        block.raw.push(line.trim().to_string());
                    }
                    _ => blocks.push(Block {
                        name: value,
                        raw: vec![line.trim().to_string()],
                        ..Block::default()
                    }),
                }
                field = Some(ProfileField::Name);
            }
            Some((label, value)) => {
                if let Some(block) = blocks.last_mut() {
                    block.append(label, &value);
                    block.raw.push(line.trim().to_string());
                    field = Some(label);
                }
            }
            None => {
                let Some(block) = blocks.last_mut() else { continue };
                let text = line.trim();
                if text.is_empty() {
                    continue;
                }
                block.raw.push(text.to_string());
                if let Some(current) = field.filter(|f| *f != ProfileField::Name) {
                    block.append(current, text);
                }
            }
        }
    }
    blocks
}

/// The heading text when `line` is a markdown heading naming a requested
/// creature.
fn heading_name(line: &str, alias_sets: &[Vec<String>]) -> Option<String> {
    if !line.trim_start().starts_with('#') || label_of(line).is_some() {
        return None;
    }
    let name = clean_value(strip_decoration(line))
        .trim_end_matches([':', '：'])
        .trim()
        .to_string();
    let lowered = name.to_lowercase();
    alias_sets
        .iter()
        .flatten()
        .any(|alias| lowered.contains(alias.as_str()))
        .then_some(name)
}

fn label_of(line: &str) -> Option<(ProfileField, String)> {
    let (label, value) = split_label(strip_decoration(line))?;
    let label = label
        .trim()
        .trim_end_matches("**")
        .split(['(', '（'])
        .next()
        .unwrap_or_default()
        .trim();
    LABELS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, field)| (*field, clean_value(value)))
}
