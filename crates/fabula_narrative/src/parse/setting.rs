//! Setting description parser.

use super::{clean_value, split_label, strip_decoration};
use fabula_core::SettingDescription;

/// Pull the location name out of a setting description.
///
/// The name comes from the first `設定名稱:` line, with any bracket or
/// parenthetical hint removed. The description is always the whole answer.
///
/// # Examples
///
/// ```
/// use fabula_narrative::parse_setting;
///
/// let setting = parse_setting("-   **設定名稱 (可自創):** 星晶洞穴\n洞裡閃爍著微光。");
/// assert_eq!(setting.name().as_deref(), Some("星晶洞穴"));
/// assert!(setting.description().ends_with("微光。"));
///
/// assert_eq!(parse_setting("一片寧靜的湖畔。").name(), &None);
/// ```
pub fn parse_setting(raw: &str) -> SettingDescription {
    let name = raw.lines().find_map(|line| {
        let (label, value) = split_label(strip_decoration(line))?;
        if !label.trim().starts_with("設定名稱") {
            return None;
        }
        let value = clean_value(value);
        let value = value
            .trim_start_matches(['[', '「', '【'])
            .trim_end_matches([']', '」', '】', '。'])
            .trim();
        (!value.is_empty()).then(|| value.to_string())
    });
    SettingDescription::new(name, raw.trim())
}
