// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};

use crate::app_config::Config;
use crate::store::{DatabaseConnection, FieldPlan, RecordKind, Repository};
use crate::translation::{BatchOptions, BatchRunner, TextDirection, TranslationService};

mod app_config;
mod assistant;
mod errors;
mod language_utils;
mod providers;
mod server;
mod store;
mod translation;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the admin HTTP server for the dashboard
    Serve {
        /// Bind address, e.g. 127.0.0.1:8787
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Translate records with blank target-language fields
    Batch {
        /// Record kind to process (all, schedule, task, note)
        #[arg(short, long, default_value = "all")]
        kind: String,

        /// Source language code (defaults to config)
        #[arg(short, long)]
        source: Option<String>,

        /// Target language code (defaults to config)
        #[arg(short, long)]
        target: Option<String>,

        /// Re-translate records whose target fields are already filled
        #[arg(short, long)]
        force: bool,

        /// Delay between provider calls in milliseconds (defaults to config)
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Translate a single phrase (vi2ko or ko2vi)
    Translate {
        /// Translation direction
        #[arg(short, long)]
        direction: String,

        /// Text to translate
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Generate shell completions for tripdash
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// tripdash - Trip Dashboard Translation Service
///
/// Backend for a team itinerary dashboard: translates schedule entries,
/// tasks and info notes via a generative-language API, serves the admin
/// batch endpoints and answers itinerary-aware chat questions.
#[derive(Parser, Debug)]
#[command(name = "tripdash")]
#[command(version = "0.4.0")]
#[command(about = "AI-assisted translation backend for a trip dashboard")]
#[command(long_about = "tripdash keeps the multilingual columns of a trip dashboard in sync.

EXAMPLES:
    tripdash serve                               # Run the admin API server
    tripdash batch                               # Translate all kinds with blank targets
    tripdash batch -k schedule -t zh             # Translate schedule entries to Chinese
    tripdash batch --force --delay-ms 1000       # Re-translate everything, slower pacing
    tripdash translate -d vi2ko \"Xin chào\"       # Phrasebook translation
    tripdash completions bash > tripdash.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. The provider API key comes from the config
    file or the GOOGLE_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Database file path (defaults to config, then the per-user data dir)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
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
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
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
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    // Completions need no config or database
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "tripdash", &mut std::io::stdout());
        return Ok(());
    }

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let mut config = Config::load_or_create(&cli.config_path)
        .with_context(|| format!("Failed to load config from {}", cli.config_path))?;

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(database) = &cli.database {
        config.database.path = database.to_string_lossy().to_string();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let repository = open_repository(&config)?;

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            server::serve(config, repository).await
        }
        Commands::Batch {
            kind,
            source,
            target,
            force,
            delay_ms,
        } => {
            run_batch_command(&config, repository, &kind, source, target, force, delay_ms).await
        }
        Commands::Translate { direction, text } => {
            let direction: TextDirection = direction.parse()?;
            let service = TranslationService::from_config(&config)?;
            let translation = service.translate_text(&text, direction).await?;
            println!("{}", translation);
            Ok(())
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    }
}

fn open_repository(config: &Config) -> Result<Repository> {
    let db = if config.database.path.trim().is_empty() {
        DatabaseConnection::new_default()?
    } else {
        DatabaseConnection::new(&config.database.path)?
    };
    Ok(Repository::new(db))
}

async fn run_batch_command(
    config: &Config,
    repository: Repository,
    kind: &str,
    source: Option<String>,
    target: Option<String>,
    force: bool,
    delay_ms: Option<u64>,
) -> Result<()> {
    let service = TranslationService::from_config(config)?;

    let source = source.unwrap_or_else(|| config.source_language.clone());
    let target = target.unwrap_or_else(|| config.target_language.clone());
    let options = BatchOptions {
        inter_item_delay: Duration::from_millis(
            delay_ms.unwrap_or(config.batch.inter_item_delay_ms),
        ),
        force,
    };
    let runner = BatchRunner::new(service, repository, options);

    let kinds: Vec<RecordKind> = if kind.eq_ignore_ascii_case("all") {
        RecordKind::all().to_vec()
    } else {
        vec![kind.parse()?]
    };

    let mut total_processed = 0;
    let mut total_updated = 0;
    let mut total_errors = 0;

    for kind in kinds {
        let plan = FieldPlan::new(kind, &source, &target)?;

        let progress = ProgressBar::new(0);
        progress.set_style(
            ProgressStyle::with_template("{msg:12} [{bar:40}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        progress.set_message(kind.to_string());

        let report = runner
            .run_batch_with_progress(&plan, |done, total| {
                progress.set_length(total as u64);
                progress.set_position(done as u64);
            })
            .await?;
        progress.finish_and_clear();

        info!("{}: {}", kind, report.summary());
        for (id, message) in &report.errors {
            info!("  {}: {}", id, message);
        }

        total_processed += report.processed;
        total_updated += report.updated;
        total_errors += report.errors.len();
    }

    info!(
        "Batch complete. Processed: {}, Updated: {}, Errors: {}",
        total_processed, total_updated, total_errors
    );

    Ok(())
}
