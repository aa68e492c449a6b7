/*!
 * Line preparation before translation.
 *
 * Subtitles are usually soft-wrapped sentences, which translators handle
 * better as one line. Real dialogue (two or more dash-led turns) keeps its
 * line breaks.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::markup;
use crate::subtitle_processor::Entries;

/// Sub-line opening a dialogue turn
static DIALOGUE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[-–—]").unwrap());

/// Join soft-wrapped lines with a space, keep dialogue line breaks
pub fn process_newlines(lines: &[String]) -> Vec<String> {
    lines.iter().map(|line| process_line(line)).collect()
}

fn process_line(line: &str) -> String {
    let sub_lines: Vec<&str> = line.split('\n').collect();
    let dialogue_turns = sub_lines.iter().filter(|sub| DIALOGUE_REGEX.is_match(sub)).count();

    if dialogue_turns >= 2 {
        sub_lines.join("\n")
    } else {
        sub_lines.join(" ")
    }
}

/// Markup-free, newline-processed text of every entry in index order
pub fn prepare_lines(entries: &Entries) -> Vec<String> {
    process_newlines(&markup::clean_to_lines(entries))
}
