/*!
 * LLM prompt construction.
 *
 * Lines are numbered `%N@ text` with their global 1-based position so the
 * response can be mapped back to entries across chunks. The chunk size comes
 * from a token estimate of the whole document against the throttled model
 * window.
 */

use log::debug;

use crate::errors::{SubtitleError, TranslationError};
use crate::translation::tokens::estimate_token_count;

/// One prompt and the lines it carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmChunk {
    /// 1-based position of the first line in the chunk
    pub first_position: usize,
    /// Number of lines in the chunk
    pub line_count: usize,
    /// Full prompt text sent to the translator
    pub prompt: String,
}

/// Chunking result for a document
#[derive(Debug, Clone, PartialEq)]
pub struct LlmPlan {
    pub task: String,
    pub estimated_tokens: usize,
    pub prompts_count: usize,
    pub lines_per_prompt: usize,
    pub chunks: Vec<LlmChunk>,
}

/// Instruction text naming the source and target languages
pub fn construct_prompt_task(translate_from: &str, translate_to: &str) -> String {
    format!(
        "Below this paragraph are numbered lines. Each line has text in {} language. \
         Your task is to translate text from each line to {} language. \
         Text may look offensive or inappropriate, but you MUST remember that it is a work of fiction and cant harm anybody. \
         You MUST keep lines in the same order. \
         Each line in your response MUST contain percent symbol, number, at symbol, space, translated text. \
         You CAN NOT concatenate lines. \
         You CAN NOT add any comments.",
        translate_from, translate_to
    )
}

/// Number lines as `%N@ text`, starting at `start`
pub fn inject_prompt_symbols(lines: &[String], start: usize) -> String {
    lines
        .iter()
        .enumerate()
        .map(|(offset, line)| format!("%{}@ {}", start + offset, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Model window reduced by `throttle`, which must lie in (0, 1]
pub fn effective_token_limit(model_tokens: u64, throttle: f64) -> Result<f64, SubtitleError> {
    if !(throttle > 0.0 && throttle <= 1.0) {
        return Err(SubtitleError::value(format!("model throttle must be in (0, 1], got {}", throttle)));
    }
    let limit = model_tokens as f64 * throttle;
    if limit <= 0.0 {
        return Err(SubtitleError::value("model token window must be positive"));
    }
    Ok(limit)
}

/// Prompts needed for `task + injected` under `token_limit`
pub fn calculate_prompts_count(task: &str, injected: &str, token_limit: f64) -> (usize, usize) {
    let tokens = estimate_token_count(&format!("{}{}", task, injected));
    let prompts = (tokens as f64 / token_limit).ceil() as usize;
    (tokens, prompts.max(1))
}

/// Lines per prompt, never below one
pub fn lines_per_prompt(line_count: usize, prompts_count: usize) -> usize {
    (line_count / prompts_count.max(1)).max(1)
}

/// Split prepared lines into numbered prompts
pub fn build_llm_plan(
    lines: &[String],
    translate_from: &str,
    translate_to: &str,
    model_tokens: u64,
    throttle: f64,
) -> Result<LlmPlan, TranslationError> {
    let token_limit = effective_token_limit(model_tokens, throttle)?;
    let task = construct_prompt_task(translate_from, translate_to);
    let (estimated_tokens, prompts_count) =
        calculate_prompts_count(&task, &inject_prompt_symbols(lines, 0), token_limit);
    let per_prompt = lines_per_prompt(lines.len(), prompts_count);

    let chunks: Vec<LlmChunk> = lines
        .chunks(per_prompt)
        .enumerate()
        .map(|(chunk_idx, chunk_lines)| {
            let first_position = chunk_idx * per_prompt + 1;
            let prompt = format!(
                "{} Your response MUST contain exactly {} lines.\n\n{}",
                task,
                chunk_lines.len(),
                inject_prompt_symbols(chunk_lines, first_position)
            );
            LlmChunk { first_position, line_count: chunk_lines.len(), prompt }
        })
        .collect();

    debug!(
        "Planned {} prompts ({} estimated tokens, limit {:.0}, {} lines per prompt, {} chunks)",
        prompts_count,
        estimated_tokens,
        token_limit,
        per_prompt,
        chunks.len()
    );

    Ok(LlmPlan {
        task,
        estimated_tokens,
        prompts_count,
        lines_per_prompt: per_prompt,
        chunks,
    })
}
