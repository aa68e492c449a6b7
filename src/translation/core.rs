/*!
 * Core translation service implementation.
 *
 * `TranslationService` sends prepared requests to a translator strictly one
 * after another, waits between them, bounds every response and stops at a
 * chunk boundary when cancellation is requested. On top of the dispatch loop
 * it runs both translation paths and returns one text per prepared line.
 */

use std::time::{Duration, Instant};

use log::{debug, info};
use tokio_util::sync::CancellationToken;

use crate::app_config::{EngineConfig, LlmConfig};
use crate::errors::TranslationError;
use crate::providers::Translator;
use crate::translation::engine::{self, EnginePlan, NOT_TRANSLATED_PLACEHOLDER};
use crate::translation::prompts::LlmPlan;
use crate::translation::response;

/// Result of a completed dispatch run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    /// Raw responses, in request order
    pub responses: Vec<String>,
    /// Mean time spent waiting on one response, in seconds
    pub mean_response_secs: f64,
}

/// Translated text per prepared line plus the dispatch report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslatedLines {
    pub lines: Vec<String>,
    /// 0-based positions that were replaced by a placeholder instead of sent
    pub not_translated: Vec<usize>,
    pub report: DispatchReport,
}

/// Sequential request/wait loop around a translator
#[derive(Debug)]
pub struct TranslationService<'a> {
    translator: &'a dyn Translator,
    request_timeout: Duration,
    response_timeout: Duration,
}

impl<'a> TranslationService<'a> {
    /// Create a service with explicit timing
    pub fn new(translator: &'a dyn Translator, request_timeout: Duration, response_timeout: Duration) -> Self {
        Self { translator, request_timeout, response_timeout }
    }

    /// Service timed by the LLM settings
    pub fn for_llm(translator: &'a dyn Translator, config: &LlmConfig) -> Self {
        Self::new(
            translator,
            Duration::from_secs(config.request_timeout_secs),
            Duration::from_secs(config.response_timeout_secs),
        )
    }

    /// Service timed by the engine settings
    pub fn for_engine(translator: &'a dyn Translator, config: &EngineConfig) -> Self {
        Self::new(
            translator,
            Duration::from_secs(config.request_timeout_secs),
            Duration::from_secs(config.response_timeout_secs),
        )
    }

    /// Send every request in order and collect the raw responses
    pub async fn dispatch(
        &self,
        requests: &[String],
        cancel: &CancellationToken,
    ) -> Result<DispatchReport, TranslationError> {
        let total = requests.len();
        let mut responses = Vec::with_capacity(total);
        let mut waited = Duration::ZERO;

        for (idx, request) in requests.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(TranslationError::Cancelled { completed: idx, total });
            }

            let started = Instant::now();
            let answer = tokio::time::timeout(self.response_timeout, self.translator.translate(request))
                .await
                .map_err(|_| TranslationError::Timeout(self.response_timeout.as_secs()))??;
            waited += started.elapsed();
            responses.push(answer);

            info!("Translated chunk {} of {} with {}", idx + 1, total, self.translator.name());

            if idx + 1 < total {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        return Err(TranslationError::Cancelled { completed: idx + 1, total });
                    }
                    _ = tokio::time::sleep(self.request_timeout) => {}
                }
            }
        }

        let mean_response_secs = if total == 0 { 0.0 } else { waited.as_secs_f64() / total as f64 };
        debug!("Dispatched {} requests, mean response {:.3}s", total, mean_response_secs);

        Ok(DispatchReport { responses, mean_response_secs })
    }

    /// Run the numbered-prompt protocol over `lines`
    pub async fn translate_llm(
        &self,
        lines: &[String],
        plan: &LlmPlan,
        cancel: &CancellationToken,
    ) -> Result<TranslatedLines, TranslationError> {
        let prompts: Vec<String> = plan.chunks.iter().map(|chunk| chunk.prompt.clone()).collect();
        let report = self.dispatch(&prompts, cancel).await?;

        let translated = response::parse_llm_response(&report.responses.join("\n"), lines)?;
        Ok(TranslatedLines { lines: translated, not_translated: Vec::new(), report })
    }

    /// Run the blank-line-joined engine protocol over `lines`
    pub async fn translate_engine(
        &self,
        lines: &[String],
        plan: &EnginePlan,
        cancel: &CancellationToken,
    ) -> Result<TranslatedLines, TranslationError> {
        let requests: Vec<String> = plan.chunks.iter().map(|chunk| chunk.text.clone()).collect();
        let report = self.dispatch(&requests, cancel).await?;

        let mut translated = lines.to_vec();
        for position in &plan.not_translated {
            translated[*position] = NOT_TRANSLATED_PLACEHOLDER.to_string();
        }
        for (chunk, answer) in plan.chunks.iter().zip(&report.responses) {
            let pieces = engine::split_engine_response(answer, chunk.positions.len())?;
            for (position, piece) in chunk.positions.iter().zip(pieces) {
                translated[*position] = piece;
            }
        }

        Ok(TranslatedLines {
            lines: translated,
            not_translated: plan.not_translated.clone(),
            report,
        })
    }
}
