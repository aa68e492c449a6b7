//! Advisory translation time estimates, in seconds.

/// `prompts * (request wait + whole seconds of the average response time)`
pub fn llm_eta(prompts_count: usize, request_timeout_secs: u64, average_response_secs: f64) -> u64 {
    let per_prompt = request_timeout_secs + average_response_secs.max(0.0).trunc() as u64;
    prompts_count as u64 * per_prompt
}

/// `ceil(total_chars / char_limit * per_request_secs)`
pub fn engine_eta(total_chars: usize, char_limit: usize, per_request_secs: u64) -> u64 {
    if char_limit == 0 {
        return 0;
    }
    (total_chars as f64 / char_limit as f64 * per_request_secs as f64).ceil() as u64
}
