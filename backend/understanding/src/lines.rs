//! Recognized text → playable items.

use serde::{Deserialize, Serialize};

/// One non-blank line of recognized text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextItem {
    pub id: String,
    pub content: String,
}

/// Split recognized text on newlines and drop blank lines.
///
/// Ids are `text-<index>-<stamp>`; `stamp` is the recognition time in
/// milliseconds, so ids stay unique across repeated scans.
pub fn split_recognized_text(content: &str, stamp: i64) -> Vec<TextItem> {
    content
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| TextItem {
            id: format!("text-{index}-{stamp}"),
            content: line.trim_end_matches('\r').to_string(),
        })
        .collect()
}

/// Strip periods and commas, lowercase, and trim.
pub fn trim_text(text: &str) -> String {
    text.replace(['.', ','], "").to_lowercase().trim().to_string()
}
