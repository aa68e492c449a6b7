/*!
 * Persistent usage statistics.
 *
 * Holds per-operation counters and the running average LLM response time that
 * feeds the translation ETA. Stores are read once when an operation starts and
 * written once when it finishes.
 */

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::file_utils::FileManager;

/// Operations that bump a `files_processed` counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Shift,
    Align,
    Clean,
    Translate,
}

/// Number of documents produced by each operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesProcessed {
    #[serde(default)]
    pub shift: u64,
    #[serde(default)]
    pub align: u64,
    #[serde(default)]
    pub clean: u64,
    #[serde(default)]
    pub translate: u64,
}

/// Aggregated provider response timings, in seconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseStatistics {
    #[serde(default)]
    pub total_count_of_responses: u64,
    #[serde(default)]
    pub total_responses_duration: f64,
    #[serde(default)]
    pub average_response_duration: f64,
}

impl ResponseStatistics {
    /// Fold one duration into the running average
    pub fn record(&mut self, duration_secs: f64) {
        let count = self.total_count_of_responses as f64;
        self.average_response_duration = (self.average_response_duration * count + duration_secs) / (count + 1.0);
        self.total_count_of_responses += 1;
        self.total_responses_duration += duration_secs;
    }
}

/// Statistics document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Unix time of the last write, in seconds
    #[serde(default)]
    pub last_update: f64,

    #[serde(default)]
    pub files_processed: FilesProcessed,

    #[serde(default)]
    pub llm_statistics: ResponseStatistics,
}

impl Statistics {
    /// Count one produced document
    pub fn record_operation(&mut self, operation: Operation) {
        let counter = match operation {
            Operation::Shift => &mut self.files_processed.shift,
            Operation::Align => &mut self.files_processed.align,
            Operation::Clean => &mut self.files_processed.clean,
            Operation::Translate => &mut self.files_processed.translate,
        };
        *counter += 1;
        self.touch();
    }

    /// Fold a completed translation's mean response duration into the average
    pub fn record_response_duration(&mut self, duration_secs: f64) {
        self.llm_statistics.record(duration_secs);
        self.touch();
    }

    fn touch(&mut self) {
        self.last_update = Utc::now().timestamp_millis() as f64 / 1000.0;
    }
}

/// Persistence for the statistics document
pub trait StatisticsStore: Send + Sync {
    /// Current statistics; defaults when nothing was stored yet
    fn load(&self) -> Result<Statistics>;

    /// Replace the stored statistics
    fn save(&self, statistics: &Statistics) -> Result<()>;
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct JsonStatisticsStore {
    path: PathBuf,
}

impl JsonStatisticsStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatisticsStore for JsonStatisticsStore {
    fn load(&self) -> Result<Statistics> {
        if !FileManager::file_exists(&self.path) {
            debug!("No statistics file at {:?}, using defaults", self.path);
            return Ok(Statistics::default());
        }

        let content = FileManager::read_to_string(&self.path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse statistics file: {:?}", self.path))
    }

    fn save(&self, statistics: &Statistics) -> Result<()> {
        let content = serde_json::to_string_pretty(statistics)
            .context("Failed to serialize statistics")?;
        FileManager::write_to_file(&self.path, &content)
    }
}

/// In-process store, used by tests and when no file is configured
#[derive(Debug, Default)]
pub struct MemoryStatisticsStore {
    statistics: Mutex<Statistics>,
}

impl MemoryStatisticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_statistics(statistics: Statistics) -> Self {
        Self { statistics: Mutex::new(statistics) }
    }
}

impl StatisticsStore for MemoryStatisticsStore {
    fn load(&self) -> Result<Statistics> {
        self.statistics
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| anyhow!("statistics lock poisoned"))
    }

    fn save(&self, statistics: &Statistics) -> Result<()> {
        let mut guard = self.statistics.lock().map_err(|_| anyhow!("statistics lock poisoned"))?;
        *guard = statistics.clone();
        Ok(())
    }
}
