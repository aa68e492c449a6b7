/*!
 * Translator capability.
 *
 * A translator turns one request text into one response text. Chat-style LLMs
 * and character-limited engines share this single interface; the translation
 * pipeline decides what the text looks like. Concrete network clients live
 * outside this crate, only the `mock` implementation ships here.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translators
///
/// Implementations are called strictly sequentially by the dispatch loop, one
/// request per chunk.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Send one request and return the raw response text
    ///
    /// # Arguments
    /// * `text` - Complete request text (prompt or joined engine chunk)
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The response text or an error
    async fn translate(&self, text: &str) -> Result<String, ProviderError>;

    /// Short name used in logs
    fn name(&self) -> &str {
        "translator"
    }
}

pub mod mock;
