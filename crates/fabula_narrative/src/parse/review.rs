//! Reviewer answer parser.

use fabula_core::ReviewResult;

/// Feedback substituted when the reviewer approves without comment.
pub const APPROVAL_FEEDBACK: &str = "審閱者認為內容已達標，無需修訂。";

/// Feedback substituted when the feedback section is present but blank.
pub const BLANK_FEEDBACK: &str = "審閱者未提供具體回饋。";

/// The fixed labels a review answer is split on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewMarkers {
    /// Introduces the assessment
    pub feedback: &'static str,
    /// Introduces the revised artifact
    pub revised: &'static str,
    /// Revised-section opener meaning "no revision needed"
    pub approval: &'static str,
}

impl ReviewMarkers {
    /// Markers of a plan review.
    pub const PLAN: ReviewMarkers = ReviewMarkers {
        feedback: "評估回饋",
        revised: "修訂後故事大綱",
        approval: "原故事大綱已達標",
    };

    /// Markers of a full-story review.
    pub const STORY: ReviewMarkers = ReviewMarkers {
        feedback: "評估回饋",
        revised: "修訂後完整故事",
        approval: "原故完整事已達標",
    };
}

/// Split a reviewer answer into feedback and revised artifact.
///
/// Labels may be bolded and followed by an ASCII or full-width colon. When
/// the revised section opens with the approval sentence, the revision is
/// `original` echoed back and the feedback is guaranteed non-empty.
///
/// # Examples
///
/// ```
/// use fabula_core::ReviewResult;
/// use fabula_narrative::{ReviewMarkers, parse_review};
///
/// let raw = "評估回饋: 結構完整。\n修訂後故事大綱:\n1. 開端\n2. 結局";
/// assert_eq!(
///     parse_review(raw, &ReviewMarkers::PLAN, "舊大綱"),
///     ReviewResult::Parsed {
///         feedback: "結構完整。".into(),
///         revised: "1. 開端\n2. 結局".into(),
///     }
/// );
///
/// let echo = parse_review("評估回饋:\n修訂後故事大綱: 原故事大綱已達標，無需修訂。", &ReviewMarkers::PLAN, "舊大綱");
/// assert!(matches!(echo, ReviewResult::Parsed { ref revised, .. } if revised == "舊大綱"));
///
/// assert!(!parse_review("看起來不錯", &ReviewMarkers::PLAN, "舊大綱").is_parsed());
/// ```
pub fn parse_review(raw: &str, markers: &ReviewMarkers, original: &str) -> ReviewResult {
    let Some(revised_at) = find_marker(raw, markers.revised) else {
        return malformed(format!("missing '{}' section", markers.revised));
    };
    let revised = raw[revised_at.content..].trim();
    let approved = revised.starts_with(markers.approval);

    let feedback = match find_marker(&raw[..revised_at.line_start], markers.feedback) {
        Some(at) => trim_section(&raw[at.content..revised_at.line_start]),
        None if approved => String::new(),
        None => return malformed(format!("missing '{}' section", markers.feedback)),
    };

    if approved {
        let feedback = if feedback.is_empty() {
            APPROVAL_FEEDBACK.to_string()
        } else {
            feedback
        };
        return ReviewResult::Parsed {
            feedback,
            revised: original.trim().to_string(),
        };
    }

    if revised.is_empty() {
        return malformed(format!("'{}' section is empty", markers.revised));
    }
    let feedback = if feedback.is_empty() {
        BLANK_FEEDBACK.to_string()
    } else {
        feedback
    };
    ReviewResult::Parsed {
        feedback,
        revised: revised.to_string(),
    }
}

fn malformed(reason: String) -> ReviewResult {
    ReviewResult::MalformedResponse { reason }
}

struct MarkerPosition {
    /// Start of the line holding the label, when only list numbering or
    /// emphasis precedes it; otherwise the label's own start
    line_start: usize,
    /// First byte after the label and its colon
    content: usize,
    /// The label is followed by a colon or ends its line
    heading: bool,
}

/// Locate `label`, preferring an occurrence that is a heading of its own.
///
/// A heading occurrence opens its line (after list numbering or emphasis)
/// and is followed by a colon or the end of the line. Without one, the first
/// occurrence anywhere is used.
fn find_marker(text: &str, label: &str) -> Option<MarkerPosition> {
    let mut first = None;
    for (start, _) in text.match_indices(label) {
        let line_begin = text[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let opens_line = only_decoration(&text[line_begin..start]);
        let line_start = if opens_line { line_begin } else { start };
        let position = marker_at(text, label, start, line_start);
        if opens_line && position.heading {
            return Some(position);
        }
        if first.is_none() {
            first = Some(position);
        }
    }
    first
}

fn only_decoration(prefix: &str) -> bool {
    prefix
        .chars()
        .all(|c| c.is_whitespace() || c.is_ascii_digit() || matches!(c, '.' | ')' | '*' | '#' | '-'))
}

fn marker_at(text: &str, label: &str, start: usize, line_start: usize) -> MarkerPosition {
    let mut content = start + label.len();
    let mut heading = false;
    for ch in text[content..].chars() {
        match ch {
            ':' | '：' => heading = true,
            '*' | ' ' => {}
            _ => break,
        }
        content += ch.len_utf8();
    }
    let rest = &text[content..];
    if rest.is_empty() || rest.starts_with(['\n', '\r']) {
        heading = true;
    }
    MarkerPosition {
        line_start,
        content,
        heading,
    }
}

fn trim_section(section: &str) -> String {
    section
        .trim()
        .trim_end_matches('*')
        .trim()
        .to_string()
}
