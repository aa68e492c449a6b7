/*!
 * Translation pipeline for subtitle documents.
 *
 * The pipeline is split into several submodules:
 *
 * - `tokens`: Prompt size heuristic
 * - `formatting`: Markup stripping and dialogue-aware line joining
 * - `prompts`: Numbered LLM prompt construction and chunking
 * - `engine`: Character-limited engine chunking
 * - `response`: LLM response reassembly
 * - `eta`: Advisory time estimates
 * - `core`: Sequential dispatch through a translator
 */

// Re-export main types for easier usage
pub use self::core::{DispatchReport, TranslatedLines, TranslationService};
pub use self::engine::{EngineChunk, EnginePlan, NOT_TRANSLATED_PLACEHOLDER};
pub use self::prompts::{LlmChunk, LlmPlan};

// Submodules
pub mod core;
pub mod engine;
pub mod eta;
pub mod formatting;
pub mod prompts;
pub mod response;
pub mod tokens;
