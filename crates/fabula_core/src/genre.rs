//! Story genres.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The genre a story should be written in.
///
/// Preset genres parse from either their localized label or their English
/// name (case-insensitive); anything else is kept verbatim as
/// [`Genre::Custom`]. Display always yields the localized label so the value
/// can be dropped straight into a prompt.
///
/// # Examples
///
/// ```
/// use fabula_core::Genre;
///
/// assert_eq!("冒險".parse::<Genre>().unwrap(), Genre::Adventure);
/// assert_eq!("Sci-Fi".parse::<Genre>().unwrap(), Genre::SciFi);
/// assert_eq!(Genre::Adventure.to_string(), "冒險");
///
/// let custom: Genre = "蒸汽龐克".parse().unwrap();
/// assert_eq!(custom, Genre::Custom("蒸汽龐克".to_string()));
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumString,
)]
#[serde(from = "String", into = "String")]
#[strum(ascii_case_insensitive)]
pub enum Genre {
    /// Journeys, quests and exploration
    #[display("冒險")]
    #[strum(serialize = "冒險", serialize = "adventure")]
    Adventure,
    /// Humor first
    #[display("喜劇")]
    #[strum(serialize = "喜劇", serialize = "comedy")]
    Comedy,
    /// Puzzles, clues and reveals
    #[display("懸疑")]
    #[strum(serialize = "懸疑", serialize = "mystery")]
    Mystery,
    /// Magic and legend
    #[display("奇幻")]
    #[strum(serialize = "奇幻", serialize = "fantasy")]
    Fantasy,
    /// Technology and the future
    #[display("科幻")]
    #[strum(serialize = "科幻", serialize = "sci-fi", serialize = "scifi")]
    SciFi,
    /// Character-driven drama
    #[display("劇情")]
    #[strum(serialize = "劇情", serialize = "drama")]
    Drama,
    /// Fear and suspense
    #[display("恐怖")]
    #[strum(serialize = "恐怖", serialize = "horror")]
    Horror,
    /// Everyday life
    #[display("日常")]
    #[strum(serialize = "日常", serialize = "slice-of-life")]
    SliceOfLife,
    /// Any other free-text genre
    #[display("{}", _0)]
    #[strum(default)]
    Custom(String),
}

impl Genre {
    /// The preset genres, in menu order.
    pub const PRESETS: [Genre; 8] = [
        Genre::Adventure,
        Genre::Comedy,
        Genre::Mystery,
        Genre::Fantasy,
        Genre::SciFi,
        Genre::Drama,
        Genre::Horror,
        Genre::SliceOfLife,
    ];

    /// Parse a user-entered genre, trimming surrounding whitespace.
    pub fn parse_label(label: &str) -> Self {
        let trimmed = label.trim();
        match Genre::from_str(trimmed) {
            Ok(genre) => genre,
            Err(_) => Genre::Custom(trimmed.to_string()),
        }
    }

    /// True when the genre carries no text at all.
    pub fn is_blank(&self) -> bool {
        matches!(self, Genre::Custom(label) if label.trim().is_empty())
    }
}

impl Default for Genre {
    fn default() -> Self {
        Genre::Adventure
    }
}

impl From<String> for Genre {
    fn from(label: String) -> Self {
        Genre::parse_label(&label)
    }
}

impl From<Genre> for String {
    fn from(genre: Genre) -> Self {
        genre.to_string()
    }
}
