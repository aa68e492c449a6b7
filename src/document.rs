/*!
 * Subtitle document: the named variants of one editing session.
 *
 * A document owns the source variant, an optional example variant used as the
 * alignment reference, and every variant derived from them. Each operation
 * builds a new variant from an already finalized parent and inserts it under a
 * deterministic key derived from the source path; nothing is inserted when an
 * operation fails.
 */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::app_config::{CapabilityTables, EngineConfig, LlmConfig};
use crate::errors::{SubtitleError, TranslationError};
use crate::file_utils::FileManager;
use crate::markup::{self, CleanFlags};
use crate::providers::Translator;
use crate::statistics::{MemoryStatisticsStore, Operation, Statistics, StatisticsStore};
use crate::subtitle_processor::{self, Entries, SubtitleMetadata};
use crate::timing::{self, Slice, Trim};
use crate::translation::{TranslationService, eta, formatting, prompts, engine};

/// Immutable result of one operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    pub metadata: SubtitleMetadata,

    #[serde(skip)]
    pub entries: Entries,

    /// Estimated translation time in seconds; 0 for non-translated variants
    pub eta: u64,

    /// Entry indices left untranslated because they exceeded the engine limit
    pub not_translated: Vec<u32>,
}

impl Variant {
    /// Root variant as loaded from a file
    pub fn new(metadata: SubtitleMetadata, entries: Entries) -> Self {
        Self { metadata, entries, eta: 0, not_translated: Vec::new() }
    }

    /// Copy of this variant's metadata with new entries
    fn derive(&self, entries: Entries) -> Self {
        Self::new(self.metadata.clone(), entries)
    }
}

/// Target and settings of an LLM translation
#[derive(Debug, Clone)]
pub struct LlmTranslation {
    /// Language code of the source; the detected language when `None`
    pub source_language: Option<String>,
    pub target_language: String,
    pub settings: LlmConfig,
}

impl LlmTranslation {
    pub fn new(target_language: impl Into<String>, settings: LlmConfig) -> Self {
        Self { source_language: None, target_language: target_language.into(), settings }
    }

    pub fn with_source_language(mut self, code: impl Into<String>) -> Self {
        self.source_language = Some(code.into());
        self
    }
}

/// Target and settings of an engine translation
#[derive(Debug, Clone)]
pub struct EngineTranslation {
    pub target_language: String,
    pub settings: EngineConfig,
}

impl EngineTranslation {
    pub fn new(target_language: impl Into<String>, settings: EngineConfig) -> Self {
        Self { target_language: target_language.into(), settings }
    }
}

/// Session-scoped set of subtitle variants
pub struct SubtitleDocument {
    source_key: String,
    example_key: Option<String>,
    variants: BTreeMap<String, Variant>,
    statistics: Arc<dyn StatisticsStore>,
}

impl std::fmt::Debug for SubtitleDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubtitleDocument")
            .field("source_key", &self.source_key)
            .field("example_key", &self.example_key)
            .field("variants", &self.variants.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SubtitleDocument {
    /// Load a source file and an optional alignment example
    pub fn load<P: AsRef<Path>>(source: P, example: Option<P>) -> Result<Self, SubtitleError> {
        let source_key = source.as_ref().to_string_lossy().to_string();
        let (metadata, entries) = subtitle_processor::load_srt_file(&source)?;
        let mut document = Self::from_variant(source_key, Variant::new(metadata, entries));

        if let Some(example) = example {
            let example_key = example.as_ref().to_string_lossy().to_string();
            let (metadata, entries) = subtitle_processor::load_srt_file(&example)?;
            document.variants.insert(example_key.clone(), Variant::new(metadata, entries));
            document.example_key = Some(example_key);
        }

        info!("Loaded {} ({} variants)", document.source_key, document.variants.len());
        Ok(document)
    }

    /// Build a document from already parsed entries
    pub fn from_entries(source_key: impl Into<String>, entries: Entries) -> Self {
        Self::from_variant(source_key.into(), Variant::new(SubtitleMetadata::default(), entries))
    }

    /// Attach an alignment example from already parsed entries
    pub fn with_example(mut self, example_key: impl Into<String>, entries: Entries) -> Self {
        let example_key = example_key.into();
        self.variants.insert(example_key.clone(), Variant::new(SubtitleMetadata::default(), entries));
        self.example_key = Some(example_key);
        self
    }

    /// Override the metadata of the source variant before any operation runs
    pub fn with_source_metadata(mut self, metadata: SubtitleMetadata) -> Self {
        if let Some(source) = self.variants.get_mut(&self.source_key) {
            source.metadata = metadata;
        }
        self
    }

    /// Use `store` for usage statistics instead of an in-memory store
    pub fn with_statistics(mut self, store: Arc<dyn StatisticsStore>) -> Self {
        self.statistics = store;
        self
    }

    fn from_variant(source_key: String, source: Variant) -> Self {
        let mut variants = BTreeMap::new();
        variants.insert(source_key.clone(), source);
        Self {
            source_key,
            example_key: None,
            variants,
            statistics: Arc::new(MemoryStatisticsStore::new()),
        }
    }

    pub fn source_key(&self) -> &str {
        &self.source_key
    }

    pub fn example_key(&self) -> Option<&str> {
        self.example_key.as_deref()
    }

    /// Every variant key, sorted
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    pub fn variant(&self, key: &str) -> Option<&Variant> {
        self.variants.get(key)
    }

    pub fn source(&self) -> &Variant {
        // The source variant is inserted at construction and never removed
        &self.variants[&self.source_key]
    }

    fn example(&self) -> Result<&Variant, SubtitleError> {
        self.example_key
            .as_ref()
            .and_then(|key| self.variants.get(key))
            .ok_or_else(|| SubtitleError::value("alignment requires an example subtitle file"))
    }

    fn variant_or_err(&self, key: &str) -> Result<&Variant, SubtitleError> {
        self.variants
            .get(key)
            .ok_or_else(|| SubtitleError::value(format!("no variant named {}", key)))
    }

    fn insert(&mut self, key: String, variant: Variant) -> String {
        info!("Created variant {} ({} entries)", key, variant.entries.len());
        self.variants.insert(key.clone(), variant);
        key
    }

    fn load_statistics(&self) -> Statistics {
        self.statistics.load().unwrap_or_else(|e| {
            warn!("Could not read statistics, using defaults: {}", e);
            Statistics::default()
        })
    }

    fn save_statistics(&self, statistics: &Statistics) {
        if let Err(e) = self.statistics.save(statistics) {
            warn!("Could not write statistics: {}", e);
        }
    }

    fn count_operation(&self, operation: Operation) {
        let mut statistics = self.load_statistics();
        statistics.record_operation(operation);
        self.save_statistics(&statistics);
    }

    /// Shift the source by `delta_ms`, optionally only the entries at positions `targets`
    pub fn shift(&mut self, delta_ms: i64, targets: Option<Slice>) -> Result<String, SubtitleError> {
        let source = self.source();
        let entries = timing::shift(&source.entries, delta_ms, targets)?;
        let variant = source.derive(entries);

        let suffix = match targets {
            Some(slice) => format!("-shifted-by-{}-ms-from-{}-to-{}", delta_ms, slice.first, slice.last),
            None => format!("-shifted-by-{}-ms", delta_ms),
        };
        let key = FileManager::variant_path(&self.source_key, &suffix);

        self.count_operation(Operation::Shift);
        Ok(self.insert(key, variant))
    }

    /// Re-time the source against the example
    pub fn align(
        &mut self,
        source_slice: Option<Slice>,
        example_slice: Option<Slice>,
        trim: Trim,
    ) -> Result<String, SubtitleError> {
        let example = self.example()?;
        let source = self.source();
        let entries = timing::align(&source.entries, &example.entries, source_slice, example_slice, trim)?;
        let variant = source.derive(entries);

        let mut suffix = String::from("-aligned");
        if let Some(slice) = source_slice {
            suffix.push_str(&format!("-src-{}-{}", slice.first, slice.last));
        }
        if let Some(slice) = example_slice {
            suffix.push_str(&format!("-by-exm-{}-{}", slice.first, slice.last));
        }
        let key = FileManager::variant_path(&self.source_key, &suffix);

        self.count_operation(Operation::Align);
        Ok(self.insert(key, variant))
    }

    /// Markup-free text of every source entry, in index order
    pub fn clean_to_lines(&self) -> Vec<String> {
        markup::clean_to_lines(&self.source().entries)
    }

    /// New variant with the selected markup removed
    pub fn clean_to_variant(&mut self, flags: CleanFlags) -> Result<String, SubtitleError> {
        let source = self.source();
        let variant = source.derive(markup::clean_entries(&source.entries, &flags));
        let key = FileManager::variant_path(&self.source_key, "-cleaned");

        self.count_operation(Operation::Clean);
        Ok(self.insert(key, variant))
    }

    fn source_language(&self, requested: Option<&str>) -> Result<String, SubtitleError> {
        requested
            .map(str::to_string)
            .or_else(|| self.source().metadata.language.clone())
            .ok_or_else(|| SubtitleError::value("source language was not detected, set it explicitly"))
    }

    fn plan_llm(&self, request: &LlmTranslation, tables: &CapabilityTables) -> Result<(Vec<String>, prompts::LlmPlan), TranslationError> {
        let model = tables.model(&request.settings.model)?;
        let source_language = self.source_language(request.source_language.as_deref())?;
        let lines = formatting::prepare_lines(&self.source().entries);
        let plan = prompts::build_llm_plan(
            &lines,
            &tables.language_name(&source_language),
            &tables.language_name(&request.target_language),
            model.tokens,
            request.settings.throttle,
        )?;
        Ok((lines, plan))
    }

    /// Seconds an LLM translation of the source is expected to take
    pub fn estimate_llm_eta(&self, request: &LlmTranslation, tables: &CapabilityTables) -> Result<u64, TranslationError> {
        let (_, plan) = self.plan_llm(request, tables)?;
        let statistics = self.load_statistics();
        Ok(eta::llm_eta(
            plan.prompts_count,
            request.settings.request_timeout_secs,
            statistics.llm_statistics.average_response_duration,
        ))
    }

    /// Seconds an engine translation of the source is expected to take
    pub fn estimate_engine_eta(&self, request: &EngineTranslation, tables: &CapabilityTables) -> Result<u64, TranslationError> {
        let char_limit = tables.engine_limit(&request.settings.engine)?;
        let lines = formatting::prepare_lines(&self.source().entries);
        let total_chars = lines.iter().map(|line| line.chars().count()).sum();
        Ok(eta::engine_eta(total_chars, char_limit, request.settings.request_timeout_secs))
    }

    /// Rebuild source entries from one text per position
    fn translated_variant(&self, target_language: &str, texts: Vec<String>, eta: u64, not_translated: &[usize]) -> Variant {
        let source = self.source();
        let keys: Vec<u32> = source.entries.keys().copied().collect();
        let entries: Entries = source
            .entries
            .iter()
            .zip(texts)
            .map(|((index, entry), text)| {
                let mut translated = entry.clone();
                translated.text = text;
                (*index, translated)
            })
            .collect();

        let mut variant = source.derive(entries);
        variant.metadata.language = Some(target_language.to_string());
        variant.eta = eta;
        variant.not_translated = not_translated.iter().map(|position| keys[*position]).collect();
        variant
    }

    /// Translate the source with a chat-style LLM
    pub async fn translate_llm(
        &mut self,
        translator: &dyn Translator,
        request: &LlmTranslation,
        tables: &CapabilityTables,
        cancel: &CancellationToken,
    ) -> Result<String, TranslationError> {
        let (lines, plan) = self.plan_llm(request, tables)?;
        let mut statistics = self.load_statistics();
        let eta = eta::llm_eta(
            plan.prompts_count,
            request.settings.request_timeout_secs,
            statistics.llm_statistics.average_response_duration,
        );
        info!(
            "Translating {} lines to {} in {} prompts (ETA {}s)",
            lines.len(),
            request.target_language,
            plan.chunks.len(),
            eta
        );

        let service = TranslationService::for_llm(translator, &request.settings);
        let translated = service.translate_llm(&lines, &plan, cancel).await?;

        let variant = self.translated_variant(&request.target_language, translated.lines, eta, &[]);
        let key = FileManager::variant_path(
            &self.source_key,
            &format!("-translated-to-{}-with-{}", request.target_language, request.settings.model),
        );

        statistics.record_response_duration(translated.report.mean_response_secs);
        statistics.record_operation(Operation::Translate);
        self.save_statistics(&statistics);

        Ok(self.insert(key, variant))
    }

    /// Translate the source with a character-limited engine
    pub async fn translate_engine(
        &mut self,
        translator: &dyn Translator,
        request: &EngineTranslation,
        tables: &CapabilityTables,
        cancel: &CancellationToken,
    ) -> Result<String, TranslationError> {
        let char_limit = tables.engine_limit(&request.settings.engine)?;
        let lines = formatting::prepare_lines(&self.source().entries);
        let plan = engine::build_engine_chunks(&lines, char_limit);
        let eta = eta::engine_eta(plan.total_chars, char_limit, request.settings.request_timeout_secs);
        info!(
            "Translating {} lines to {} in {} engine requests (ETA {}s)",
            lines.len(),
            request.target_language,
            plan.chunks.len(),
            eta
        );

        let service = TranslationService::for_engine(translator, &request.settings);
        let translated = service.translate_engine(&lines, &plan, cancel).await?;

        let variant =
            self.translated_variant(&request.target_language, translated.lines, eta, &translated.not_translated);
        let key = FileManager::variant_path(
            &self.source_key,
            &format!("-translated-to-{}-with-{}", request.target_language, request.settings.engine),
        );

        self.count_operation(Operation::Translate);
        Ok(self.insert(key, variant))
    }

    /// SubRip text of a variant
    pub fn to_srt(&self, key: &str) -> Result<String, SubtitleError> {
        Ok(subtitle_processor::to_srt_string(&self.variant_or_err(key)?.entries))
    }

    /// Write a variant as UTF-8, next to its key or inside `output_dir`
    pub fn save(&self, key: &str, output_dir: Option<&Path>) -> Result<PathBuf, SubtitleError> {
        let variant = self.variant_or_err(key)?;
        let path = FileManager::output_path(output_dir, key);
        subtitle_processor::write_srt_file(&path, &variant.entries)?;
        info!("Saved {}", path.display());
        Ok(path)
    }
}
