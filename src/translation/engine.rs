/*!
 * Character-limited engine chunking.
 *
 * Lines travel joined by blank lines, so each one costs its length plus two
 * separator characters against the engine limit. Blank lines are never sent.
 */

use log::{debug, warn};

use crate::errors::TranslationError;

/// Text written in place of a line too long for the engine
pub const NOT_TRANSLATED_PLACEHOLDER: &str = "[not translated: line exceeds the engine character limit]";

const SEPARATOR: &str = "\n\n";
const SEPARATOR_COST: usize = 2;

/// One engine request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineChunk {
    /// 0-based positions of the lines carried, in order
    pub positions: Vec<usize>,
    /// Lines joined by a blank line
    pub text: String,
}

/// Chunking result for a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnginePlan {
    pub chunks: Vec<EngineChunk>,
    /// 0-based positions of lines replaced by the placeholder
    pub not_translated: Vec<usize>,
    /// Total characters of the prepared lines
    pub total_chars: usize,
}

fn close_chunk(lines: &[String], positions: &mut Vec<usize>, chunks: &mut Vec<EngineChunk>) {
    if positions.is_empty() {
        return;
    }
    let text = positions
        .iter()
        .map(|position| lines[*position].as_str())
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    chunks.push(EngineChunk { positions: std::mem::take(positions), text });
}

/// Pack prepared lines into chunks under `char_limit`
pub fn build_engine_chunks(lines: &[String], char_limit: usize) -> EnginePlan {
    let mut plan = EnginePlan::default();
    let mut current: Vec<usize> = Vec::new();
    let mut running = 0;

    for (position, line) in lines.iter().enumerate() {
        let len = line.chars().count();
        plan.total_chars += len;
        let cost = len + SEPARATOR_COST;

        // Blank lines would vanish from the joined response; they stay empty
        if line.trim().is_empty() {
            continue;
        }

        if cost > char_limit {
            warn!("Line {} has {} characters, above the engine limit of {}", position + 1, len, char_limit);
            plan.not_translated.push(position);
            continue;
        }

        if running + cost > char_limit {
            close_chunk(lines, &mut current, &mut plan.chunks);
            running = 0;
        }
        current.push(position);
        running += cost;
    }
    close_chunk(lines, &mut current, &mut plan.chunks);

    debug!(
        "Packed {} lines into {} engine chunks ({} skipped)",
        lines.len(),
        plan.chunks.len(),
        plan.not_translated.len()
    );
    plan
}

/// Split an engine response back into one piece per line sent
pub fn split_engine_response(response: &str, expected: usize) -> Result<Vec<String>, TranslationError> {
    let pieces: Vec<String> = response
        .trim()
        .split(SEPARATOR)
        .map(|piece| piece.trim().to_string())
        .collect();

    if pieces.len() != expected {
        return Err(TranslationError::Format { expected, actual: pieces.len() });
    }
    Ok(pieces)
}
