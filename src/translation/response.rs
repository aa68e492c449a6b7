/*!
 * LLM response reassembly.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TranslationError;

/// `%N@` followed by one whitespace character
static MARKER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"%(\d+)@\s").unwrap());

/// Map a raw response onto the prepared lines it answers.
///
/// Returns one translated text per line, in position order. Every position
/// must be answered; text before the first marker is ignored and a repeated
/// marker overrides the earlier answer.
pub fn parse_llm_response(response: &str, lines: &[String]) -> Result<Vec<String>, TranslationError> {
    let markers: Vec<_> = MARKER_REGEX.captures_iter(response).collect();
    if markers.is_empty() {
        return Err(TranslationError::ResponseFormat(
            "response does not contain any %N@ marker".to_string(),
        ));
    }

    let mut answers: Vec<Option<String>> = vec![None; lines.len()];
    for (marker_idx, caps) in markers.iter().enumerate() {
        let whole = caps.get(0).ok_or_else(|| TranslationError::ResponseFormat("empty marker match".to_string()))?;
        let number = &caps[1];
        let position: usize = number
            .parse()
            .map_err(|_| TranslationError::ResponseFormat(format!("marker number {} is not a valid position", number)))?;
        if position == 0 || position > lines.len() {
            return Err(TranslationError::ResponseFormat(format!(
                "marker %{}@ is outside 1..={}",
                position,
                lines.len()
            )));
        }

        let text_end = markers
            .get(marker_idx + 1)
            .and_then(|next| next.get(0))
            .map(|next| next.start())
            .unwrap_or(response.len());
        let text = response[whole.end()..text_end].trim();
        if text.is_empty() && !lines[position - 1].trim().is_empty() {
            return Err(TranslationError::ResponseFormat(format!("marker %{}@ has no text", position)));
        }

        answers[position - 1] = Some(text.to_string());
    }

    answers
        .into_iter()
        .enumerate()
        .map(|(idx, answer)| {
            answer.ok_or_else(|| TranslationError::ResponseFormat(format!("missing marker %{}@", idx + 1)))
        })
        .collect()
}
