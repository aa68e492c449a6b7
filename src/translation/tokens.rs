/*!
 * Prompt size heuristic.
 *
 * Counts are not a real tokenizer. CJK ideographs, kana and hangul weigh 1.5,
 * every word run and punctuation mark weighs 1, and the remaining characters
 * weigh a quarter each. Chunk counts depend on this exact arithmetic.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static CJK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x{4e00}-\x{9fff}\x{3040}-\x{30ff}\x{31f0}-\x{31ff}\x{ac00}-\x{d7af}]").unwrap()
});

static WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").unwrap());

static PUNCTUATION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Estimated token count of a prompt, truncated toward zero
pub fn estimate_token_count(text: &str) -> usize {
    let cjk = CJK_REGEX.find_iter(text).count() as f64;
    let words = WORD_REGEX.find_iter(text).count() as f64;
    let punctuation = PUNCTUATION_REGEX.find_iter(text).count() as f64;
    let other = text.chars().count() as f64 - cjk - words - punctuation;

    let estimate = cjk * 1.5 + words + punctuation + other / 4.0;
    estimate.max(0.0) as usize
}
