// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use subedit::app_config::{Config, LogLevel};
use subedit::statistics::JsonStatisticsStore;
use subedit::{CleanFlags, EngineTranslation, LlmTranslation, Slice, SubtitleDocument, Trim};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// Translator kind used for estimates
#[derive(Debug, Clone, Copy, ValueEnum)]
enum TranslatorKind {
    Llm,
    Engine,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Directory for the produced file (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show detected encoding, language and entry count
    Info {
        /// Subtitle file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Shift timing by a number of milliseconds
    Shift {
        /// Subtitle file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Delta in milliseconds, may be negative
        #[arg(short, long, allow_hyphen_values = true)]
        delta: i64,

        /// Only shift entries at these 1-based positions (inclusive)
        #[arg(long, num_args = 2, value_names = ["FIRST", "LAST"])]
        items: Option<Vec<u32>>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Re-time a subtitle proportionally against an example file
    Align {
        /// Subtitle file to re-time
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Reference subtitle file
        #[arg(short, long)]
        example: PathBuf,

        /// Source entry indices anchoring the alignment
        #[arg(long, num_args = 2, value_names = ["FIRST", "LAST"])]
        source_slice: Option<Vec<u32>>,

        /// Example entry indices the source slice is mapped onto
        #[arg(long, num_args = 2, value_names = ["FIRST", "LAST"])]
        example_slice: Option<Vec<u32>>,

        /// Drop entries before the source slice
        #[arg(long)]
        trim_start: bool,

        /// Drop entries after the source slice
        #[arg(long)]
        trim_end: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Remove markup tags (all of them when no tag flag is given)
    Clean {
        /// Subtitle file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(long)]
        bold: bool,
        #[arg(long)]
        italic: bool,
        #[arg(long)]
        underline: bool,
        #[arg(long)]
        strikethrough: bool,
        #[arg(long)]
        color: bool,
        #[arg(long)]
        font: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Estimate how long a translation would take
    Eta {
        /// Subtitle file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Target language code
        #[arg(short, long)]
        target_language: String,

        /// Source language code (detected when omitted)
        #[arg(short, long)]
        source_language: Option<String>,

        /// Translator kind
        #[arg(short, long, value_enum, default_value = "llm")]
        kind: TranslatorKind,
    },

    /// Generate shell completions for subedit
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subedit - SubRip subtitle editor
///
/// Shift, align, clean and estimate translation of .srt files.
#[derive(Parser, Debug)]
#[command(name = "subedit")]
#[command(version)]
#[command(about = "SubRip subtitle editing tool")]
#[command(long_about = "subedit shifts, aligns and cleans SubRip subtitle files.

EXAMPLES:
    subedit info movie.srt
    subedit shift movie.srt --delta 2468
    subedit shift movie.srt --delta -500 --items 3 16
    subedit align movie.srt --example reference.srt --source-slice 3 16 --example-slice 2 19
    subedit clean movie.srt --italic --color
    subedit eta movie.srt --target-language fr
    subedit completions bash > subedit.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(level)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Accept everything; the effective level is set through set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subedit", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)
        .with_context(|| format!("Failed to load config file: {}", cli.config_path))?;
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    run_command(cli.command, &config)
}

fn open_document(file: &Path, example: Option<&Path>, config: &Config) -> Result<SubtitleDocument> {
    let document = SubtitleDocument::load(file, example)
        .with_context(|| format!("Failed to load subtitle file: {:?}", file))?;

    Ok(document.with_statistics(Arc::new(JsonStatisticsStore::new(&config.statistics_file))))
}

fn save_variant(document: &SubtitleDocument, key: &str, output: &OutputArgs) -> Result<()> {
    let path = document
        .save(key, output.output_dir.as_deref())
        .with_context(|| format!("Failed to write {}", key))?;
    println!("{}", path.display());
    Ok(())
}

fn slice_arg(values: Option<Vec<u32>>) -> Result<Option<Slice>> {
    values
        .map(|values| Slice::from_values(&values))
        .transpose()
        .context("Invalid slice")
}

fn run_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Info { file } => {
            let document = open_document(&file, None, config)?;
            let source = document.source();
            println!("{}", serde_json::to_string_pretty(&source.metadata)?);
            println!("entries: {}", source.entries.len());
        }

        Commands::Shift { file, delta, items, output } => {
            let mut document = open_document(&file, None, config)?;
            let key = document.shift(delta, slice_arg(items)?)?;
            save_variant(&document, &key, &output)?;
        }

        Commands::Align { file, example, source_slice, example_slice, trim_start, trim_end, output } => {
            let mut document = open_document(&file, Some(&example), config)?;
            let trim = Trim { start: trim_start, end: trim_end };
            let key = document.align(slice_arg(source_slice)?, slice_arg(example_slice)?, trim)?;
            save_variant(&document, &key, &output)?;
        }

        Commands::Clean { file, bold, italic, underline, strikethrough, color, font, output } => {
            let mut document = open_document(&file, None, config)?;
            let flags = CleanFlags { bold, italic, underline, strikethrough, color, font };
            let key = document.clean_to_variant(flags)?;
            save_variant(&document, &key, &output)?;
        }

        Commands::Eta { file, target_language, source_language, kind } => {
            let document = open_document(&file, None, config)?;
            let tables = config.capabilities()?;
            let seconds = match kind {
                TranslatorKind::Llm => {
                    let mut request = LlmTranslation::new(&target_language, config.translation.llm.clone());
                    if let Some(source_language) = source_language {
                        request = request.with_source_language(source_language);
                    }
                    document.estimate_llm_eta(&request, &tables)?
                }
                TranslatorKind::Engine => {
                    let request = EngineTranslation::new(&target_language, config.translation.engine.clone());
                    document.estimate_engine_eta(&request, &tables)?
                }
            };
            info!("Estimated translation time to {}: {}s", target_language, seconds);
            println!("{}", seconds);
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}
