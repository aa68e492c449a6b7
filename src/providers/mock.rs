/*!
 * Mock translator implementations for testing.
 *
 * The working behavior understands both request shapes: numbered `%N@ text`
 * prompt lines are answered line by line, anything else is treated as an
 * engine chunk and answered piece by piece.
 */

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::Translator;

static NUMBERED_LINE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^%(\d+)@ (.*)$").unwrap());

/// Prefix added to every translated line or piece
pub const TRANSLATED_PREFIX: &str = "[TRANSLATED] ";

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always answers following the request protocol
    Working,
    /// Answers with prose that carries no `%N@` marker
    MissingMarkers,
    /// Answers with a single piece whatever was sent
    SinglePiece,
    /// Fails every Nth request
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns an empty response
    Empty,
    /// Answers like `Working` after a delay (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock translator that records every request it receives
#[derive(Debug, Clone)]
pub struct MockTranslator {
    behavior: MockBehavior,
    request_count: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
    custom_response: Option<fn(&str) -> String>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn missing_markers() -> Self {
        Self::new(MockBehavior::MissingMarkers)
    }

    pub fn single_piece() -> Self {
        Self::new(MockBehavior::SinglePiece)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Answer working requests with a custom generator instead
    pub fn with_custom_response(mut self, generator: fn(&str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received so far, shared between clones
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copy of every request text received so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|requests| requests.clone()).unwrap_or_default()
    }

    /// Protocol-following answer for a request
    pub fn generate_response(text: &str) -> String {
        let numbered: Vec<String> = NUMBERED_LINE_REGEX
            .captures_iter(text)
            .map(|caps| format!("%{}@ {}{}", &caps[1], TRANSLATED_PREFIX, &caps[2]))
            .collect();
        if !numbered.is_empty() {
            return numbered.join("\n");
        }

        text.split("\n\n")
            .map(|piece| format!("{}{}", TRANSLATED_PREFIX, piece))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn working_response(&self, text: &str) -> String {
        match self.custom_response {
            Some(generator) => generator(text),
            None => Self::generate_response(text),
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(text.to_string());
        }

        match self.behavior {
            MockBehavior::Working => Ok(self.working_response(text)),

            MockBehavior::MissingMarkers => {
                Ok("I am sorry, here is the translation without numbering.".to_string())
            }

            MockBehavior::SinglePiece => Ok(format!("{}everything at once", TRANSLATED_PREFIX)),

            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.working_response(text))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Empty => Ok(String::new()),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.working_response(text))
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
