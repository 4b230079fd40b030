//! Numbered suggestion list parser.

use super::{split_list_number, strip_marks};
use fabula_core::{SuggestionItem, SuggestionList};

/// Parse a numbered list such as elaborations, twists or branches.
///
/// An item starts at a line beginning with a number followed by `.`, `)`,
/// `、` or `．`, optionally behind heading hashes, a bullet or emphasis. A
/// leading `**title**` becomes the item's title; the rest of the line, minus
/// a separating dash or colon, starts its body. Unnumbered lines, and
/// numbered lines indented deeper than the first item, continue the current
/// item. Text before the first item is ignored.
///
/// # Examples
///
/// ```
/// use fabula_narrative::parse_numbered_list;
///
/// let list = parse_numbered_list(
///     "以下是建議：\n1.  **驚天逆轉：盟友背叛** - 原以為的盟友其實是幕後黑手。\n2. 意外的援手出現。",
/// );
/// assert_eq!(list.len(), 2);
/// assert_eq!(list.items()[0].title().as_deref(), Some("驚天逆轉：盟友背叛"));
/// assert_eq!(list.items()[0].body(), "原以為的盟友其實是幕後黑手。");
/// assert_eq!(list.items()[1].title(), &None);
/// ```
pub fn parse_numbered_list(raw: &str) -> SuggestionList {
    let mut items = Vec::new();
    let mut current: Option<(u32, Option<String>, Vec<String>)> = None;
    let mut item_indent: Option<usize> = None;

    for line in raw.lines() {
        let indent = indent_of(line);
        let nested = item_indent.is_some_and(|base| indent > base);
        match split_number(line).filter(|_| !nested) {
            Some((number, rest)) => {
                if let Some((n, title, body)) = current.take() {
                    items.push(SuggestionItem::new(n, title, body.join("\n")));
                }
                item_indent.get_or_insert(indent);
                let (title, first) = split_title(rest);
                let body = if first.is_empty() { Vec::new() } else { vec![first] };
                current = Some((number, title, body));
            }
            None => {
                if let Some((_, _, body)) = current.as_mut() {
                    let text = line.trim();
                    if !text.is_empty() {
                        body.push(text.to_string());
                    }
                }
            }
        }
    }
    if let Some((n, title, body)) = current {
        items.push(SuggestionItem::new(n, title, body.join("\n")));
    }

    SuggestionList::new(items, raw.trim())
}

fn split_number(line: &str) -> Option<(u32, &str)> {
    split_list_number(strip_marks(line))
}

/// Leading whitespace width, with a tab counted as four columns.
fn indent_of(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

fn split_title(rest: &str) -> (Option<String>, String) {
    let Some(after_open) = rest.strip_prefix("**") else {
        return (None, rest.trim().to_string());
    };
    let Some(close) = after_open.find("**") else {
        return (None, after_open.trim().to_string());
    };
    let title = after_open[..close]
        .trim()
        .trim_end_matches([':', '：'])
        .trim()
        .to_string();
    let body = after_open[close + 2..]
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '–' | '—' | ':' | '：'))
        .trim()
        .to_string();
    let title = if title.is_empty() { None } else { Some(title) };
    (title, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabula_core::ItemBounds;

    #[test]
    fn continuation_lines_join_the_body() {
        let list = parse_numbered_list(
            "1. **方向一：秘密**\n   伊布藏著一個秘密。\n   牠不敢說出口。\n\n2) **方向二：試煉** - 一場試煉。",
        );
        assert_eq!(list.len(), 2);
        assert_eq!(list.items()[0].body(), "伊布藏著一個秘密。\n牠不敢說出口。");
        assert_eq!(*list.items()[1].number(), 2);
        assert_eq!(list.items()[1].body(), "一場試煉。");
    }

    #[test]
    fn years_and_plain_prose_are_not_items() {
        let list = parse_numbered_list("在2024年，一切開始了。\n沒有編號的段落。");
        assert!(list.is_empty());
    }

    #[test]
    fn bold_number_prefix_is_recognized() {
        let list = parse_numbered_list("**1. 選項一：正面對決** - 直接開戰。");
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn colon_inside_bold_title_is_trimmed() {
        let list = parse_numbered_list("1. **選項一：** 直接開戰。");
        assert_eq!(list.items()[0].title().as_deref(), Some("選項一"));
        assert_eq!(list.items()[0].body(), "直接開戰。");
    }

    #[test]
    fn four_items_violate_twist_bounds() {
        let list = parse_numbered_list("1. a\n2. b\n3. c\n4. d");
        assert!(list.check_bounds("twists", ItemBounds::new(2, 3)).is_err());
        assert!(list.check_bounds("elaboration", ItemBounds::new(3, 4)).is_ok());
    }

    #[test]
    fn raw_text_is_kept() {
        let list = parse_numbered_list("  1. a\n");
        assert_eq!(list.raw(), "1. a");
    }

    #[test]
    fn indented_sub_steps_stay_in_their_item() {
        let list = parse_numbered_list(
            "1. **逆轉** - 盟友背叛。\n   1. 第一步\n   2. 第二步\n2. **援手** - 敵人相助。",
        );
        assert_eq!(list.len(), 2);
        assert_eq!(list.items()[0].body(), "盟友背叛。\n1. 第一步\n2. 第二步");
        assert_eq!(list.items()[1].title().as_deref(), Some("援手"));
        assert!(list.check_bounds("twists", ItemBounds::new(2, 3)).is_ok());
    }

    #[test]
    fn markdown_heading_items_are_recognized() {
        let list = parse_numbered_list(
            "### 1. 方向一：秘密\n伊布藏著秘密。\n\n### 2. 方向二：試煉\n一場試煉。\n\n### 3. 方向三：重逢\n老友歸來。",
        );
        assert_eq!(list.len(), 3);
        assert_eq!(list.items()[0].body(), "方向一：秘密\n伊布藏著秘密。");
        assert_eq!(*list.items()[2].number(), 3);
    }

    #[test]
    fn bulleted_numbers_are_recognized() {
        let list = parse_numbered_list("- 1. 正面對決\n- 2. 暗中調查");
        assert_eq!(list.len(), 2);
    }
}
