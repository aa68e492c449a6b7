/*!
 * Inline markup removal for SubRip text.
 *
 * Two entry points: `clean_to_lines` strips every tag and returns the plain
 * text of each entry (used for language detection and translation), while
 * `clean_entries` removes only the selected tag pairs and keeps timing.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::subtitle_processor::Entries;

/// Catch-all tag pattern
static ANY_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").unwrap());

static BOLD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<b>|</b>").unwrap());
static ITALIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<i>|</i>").unwrap());
static UNDERLINE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<u>|</u>").unwrap());
static STRIKETHROUGH_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<s>|</s>").unwrap());

static FONT_COLOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<font\s+color=["'].*?["'].*?>|</font>"#).unwrap()
});

static FONT_FACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<font\s+face=["'].*?["'].*?>|</font>"#).unwrap()
});

/// Selection of tag families to strip; all-false means "strip everything"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanFlags {
    /// `<b>` / `</b>`
    #[serde(default)]
    pub bold: bool,
    /// `<i>` / `</i>`
    #[serde(default)]
    pub italic: bool,
    /// `<u>` / `</u>`
    #[serde(default)]
    pub underline: bool,
    /// `<s>` / `</s>`
    #[serde(default)]
    pub strikethrough: bool,
    /// `<font color=...>` / `</font>`
    #[serde(default)]
    pub color: bool,
    /// `<font face=...>` / `</font>`
    #[serde(default)]
    pub font: bool,
}

impl CleanFlags {
    /// Flags that strip every tag
    pub fn all_markup() -> Self {
        Self::default()
    }

    /// True when no family is selected
    pub fn is_empty(&self) -> bool {
        !(self.bold || self.italic || self.underline || self.strikethrough || self.color || self.font)
    }
}

/// Remove every `<...>` tag
pub fn strip_all(text: &str) -> String {
    ANY_TAG_REGEX.replace_all(text, "").into_owned()
}

/// Remove the tag families selected in `flags` from one text
pub fn clean_text(text: &str, flags: &CleanFlags) -> String {
    if flags.is_empty() {
        return strip_all(text);
    }

    let mut cleaned = text.to_string();
    let selected: [(bool, &Regex); 4] = [
        (flags.bold, &*BOLD_REGEX),
        (flags.italic, &*ITALIC_REGEX),
        (flags.underline, &*UNDERLINE_REGEX),
        (flags.strikethrough, &*STRIKETHROUGH_REGEX),
    ];
    for (enabled, regex) in selected {
        if enabled {
            cleaned = regex.replace_all(&cleaned, "").into_owned();
        }
    }

    // Only touch </font> when the matching opener family is really there
    if flags.color && cleaned.contains("<font color=") {
        cleaned = FONT_COLOR_REGEX.replace_all(&cleaned, "").into_owned();
    }
    if flags.font && cleaned.contains("<font face=") {
        cleaned = FONT_FACE_REGEX.replace_all(&cleaned, "").into_owned();
    }

    cleaned
}

/// Markup-free text of every entry, in ascending index order
pub fn clean_to_lines(entries: &Entries) -> Vec<String> {
    entries.values().map(|entry| strip_all(&entry.text)).collect()
}

/// Copy of `entries` with the selected markup removed; timing is untouched
pub fn clean_entries(entries: &Entries, flags: &CleanFlags) -> Entries {
    entries
        .iter()
        .map(|(index, entry)| {
            let mut cleaned = entry.clone();
            cleaned.text = clean_text(&entry.text, flags);
            (*index, cleaned)
        })
        .collect()
}
