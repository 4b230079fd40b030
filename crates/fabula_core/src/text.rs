//! Text measurement helpers.

/// Approximate word count for mixed CJK and Latin text.
///
/// Each CJK ideograph or kana counts as one word; everything else is split
/// on whitespace. CJK punctuation separates words but is not counted.
///
/// # Examples
///
/// ```
/// use fabula_core::estimate_word_count;
///
/// assert_eq!(estimate_word_count("皮卡丘 used Thunderbolt"), 5);
/// assert_eq!(estimate_word_count("你好，世界。"), 4);
/// assert_eq!(estimate_word_count(""), 0);
/// ```
pub fn estimate_word_count(text: &str) -> usize {
    let mut count = 0;
    let mut in_word = false;
    for ch in text.chars() {
        if is_cjk(ch) {
            count += 1;
            in_word = false;
        } else if ch.is_whitespace() || is_cjk_punctuation(ch) {
            in_word = false;
        } else if !in_word {
            count += 1;
            in_word = true;
        }
    }
    count
}

fn is_cjk(ch: char) -> bool {
    matches!(ch,
        '\u{3040}'..='\u{30FF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{AC00}'..='\u{D7AF}')
}

fn is_cjk_punctuation(ch: char) -> bool {
    matches!(ch, '\u{3000}'..='\u{303F}' | '\u{FF00}'..='\u{FF65}' | '\u{2014}' | '\u{2026}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fullwidth_punctuation_separates_latin_words() {
        assert_eq!(estimate_word_count("Pikachu，Eevee"), 2);
    }

    #[test]
    fn ellipsis_is_not_a_word() {
        assert_eq!(estimate_word_count("……"), 0);
    }
}
