// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{Context, Result, anyhow};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod audio;
mod corpus;
mod errors;
mod file_utils;
mod matching;
mod separator;
mod transcriber;
mod transcript;

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
    /// Rebuild a song's voice from the donor corpus (default command)
    #[command(alias = "rebuild")]
    Rebuild(RebuildArgs),

    /// Generate shell completions for resung
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct RebuildArgs {
    /// Song file to reconstruct
    #[arg(value_name = "SONG_PATH")]
    song_path: PathBuf,

    /// Output file for the remixed song
    #[arg(short, long, default_value = "output.mp3")]
    output: PathBuf,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,

    /// Whisper model name to use for transcription
    #[arg(short, long)]
    model: Option<String>,

    /// Folder of donor recordings (overrides config)
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Resung - sing a song with someone else's voice
///
/// Rebuilds a song's vocal track word by word from a corpus of donor
/// recordings and remixes it against the original accompaniment.
#[derive(Parser, Debug)]
#[command(name = "resung")]
#[command(version = "0.1.0")]
#[command(about = "Word-level song voice reconstruction")]
#[command(long_about = "Resung transcribes a folder of donor recordings into a word corpus, \
splits a song into vocals and accompaniment, then rebuilds the vocal track by replacing \
every sung word with its closest-fitting donor occurrence, stretched to the original timing.

EXAMPLES:
    resung song.mp3                        # Rebuild using default config
    resung -f song.mp3                     # Force overwrite existing output
    resung -m base.en song.mp3             # Use a specific whisper model
    resung -i recordings/ song.mp3         # Take donors from another folder
    resung --log-level debug song.mp3      # Verbose run
    resung completions bash > resung.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Song file to reconstruct
    #[arg(value_name = "SONG_PATH")]
    song_path: Option<PathBuf>,

    /// Output file for the remixed song
    #[arg(short, long, default_value = "output.mp3")]
    output: PathBuf,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,

    /// Whisper model name to use for transcription
    #[arg(short, long)]
    model: Option<String>,

    /// Folder of donor recordings (overrides config)
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

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

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
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

            let mut stderr = std::io::stderr();
            let emoji = Self::get_emoji_for_level(record.level());
            let color = match record.level() {
                Level::Error => "\x1B[1;31m",
                Level::Warn => "\x1B[1;33m",
                Level::Info => "\x1B[1;32m",
                Level::Debug => "\x1B[1;36m",
                Level::Trace => "\x1B[1;35m",
            };
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color,
                now,
                emoji,
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

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "resung", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Rebuild(args)) => run_rebuild(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let song_path = cli
                .song_path
                .ok_or_else(|| anyhow!("SONG_PATH is required when no subcommand is specified"))?;

            let rebuild_args = RebuildArgs {
                song_path,
                output: cli.output,
                force_overwrite: cli.force_overwrite,
                model: cli.model,
                input_dir: cli.input_dir,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_rebuild(rebuild_args).await
        }
    }
}

async fn run_rebuild(options: RebuildArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        // Override config with CLI options if provided
        if let Some(model) = &options.model {
            config.whisper.model = model.clone();
        }

        if let Some(input_dir) = &options.input_dir {
            config.folders.input_dir = input_dir.clone();
        }

        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();

        if let Some(model) = &options.model {
            config.whisper.model = model.clone();
        }
        if let Some(input_dir) = &options.input_dir {
            config.folders.input_dir = input_dir.clone();
        }
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    // Create controller and run the reconstruction
    let controller = Controller::with_config(config)?;
    controller
        .run(options.song_path, options.output, options.force_overwrite)
        .await
}
