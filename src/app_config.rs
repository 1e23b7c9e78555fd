use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Matching parameters
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Transcription config
    #[serde(default)]
    pub whisper: WhisperConfig,

    /// Source separation config
    #[serde(default)]
    pub separation: SeparationConfig,

    /// Folder layout for a run
    #[serde(default)]
    pub folders: FolderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Parameters governing donor selection and the rate transform
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchingConfig {
    /// Minimum acceptable clip duration in milliseconds, before and after
    /// the rate transform. Candidates that would collapse below this floor
    /// are discarded.
    #[serde(default = "default_min_clip_ms")]
    pub min_clip_ms: u64,

    /// Loudness compensation offset in dB applied on top of the target
    /// vocal track's measured level when equalizing the donor corpus.
    #[serde(default = "default_loudness_offset_db")]
    pub loudness_offset_db: f64,

    /// Lowest magnitude a single elementary tempo step may take
    #[serde(default = "default_tempo_low")]
    pub tempo_low: f64,

    /// Highest magnitude a single elementary tempo step may take
    #[serde(default = "default_tempo_high")]
    pub tempo_high: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_clip_ms: default_min_clip_ms(),
            loudness_offset_db: default_loudness_offset_db(),
            tempo_low: default_tempo_low(),
            tempo_high: default_tempo_high(),
        }
    }
}

/// Whisper transcription configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WhisperConfig {
    /// Model name (e.g., "tiny.en", "base.en")
    #[serde(default = "default_whisper_model")]
    pub model: String,

    /// Transcription language code
    #[serde(default = "default_whisper_language")]
    pub language: String,

    /// Transcription timeout in seconds per file
    #[serde(default = "default_whisper_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model: default_whisper_model(),
            language: default_whisper_language(),
            timeout_secs: default_whisper_timeout_secs(),
        }
    }
}

/// Source separation (Spleeter via docker) configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SeparationConfig {
    /// Docker image used to split the song into stems
    #[serde(default = "default_spleeter_image")]
    pub docker_image: String,

    /// Separation timeout in seconds
    #[serde(default = "default_separation_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SeparationConfig {
    fn default() -> Self {
        Self {
            docker_image: default_spleeter_image(),
            timeout_secs: default_separation_timeout_secs(),
        }
    }
}

/// Folder layout used during a reconstruction run
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FolderConfig {
    /// Folder containing raw donor recordings
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Folder for wav-converted, loudness-equalized donor files
    #[serde(default = "default_prep_dir")]
    pub prep_dir: PathBuf,

    /// Working folder for stems, intermediate clips and the concat list
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Path to the corpus database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            prep_dir: default_prep_dir(),
            work_dir: default_work_dir(),
            database_path: default_database_path(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_min_clip_ms() -> u64 {
    200
}

fn default_loudness_offset_db() -> f64 {
    // Tempo-shifted clips read quieter than their measured level; push the
    // corpus slightly above the vocal reference to compensate.
    10.0
}

fn default_tempo_low() -> f64 {
    0.5
}

fn default_tempo_high() -> f64 {
    // ffmpeg's atempo accepts [0.5, 100.0] per step since 4.2
    100.0
}

fn default_whisper_model() -> String {
    "tiny.en".to_string()
}

fn default_whisper_language() -> String {
    "en".to_string()
}

fn default_whisper_timeout_secs() -> u64 {
    1800
}

fn default_spleeter_image() -> String {
    "deezer/spleeter:3.6-5stems".to_string()
}

fn default_separation_timeout_secs() -> u64 {
    1800
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("input")
}

fn default_prep_dir() -> PathBuf {
    PathBuf::from("prep")
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("work")
}

fn default_database_path() -> PathBuf {
    PathBuf::from("corpus.db")
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.matching.min_clip_ms == 0 {
            return Err(anyhow!("matching.min_clip_ms must be positive"));
        }

        let low = self.matching.tempo_low;
        let high = self.matching.tempo_high;
        if !(low.is_finite() && high.is_finite()) {
            return Err(anyhow!("Tempo step bounds must be finite"));
        }
        if low <= 0.0 || low > 1.0 || high < 1.0 {
            return Err(anyhow!(
                "Tempo step bounds must satisfy 0 < low <= 1 <= high (got {} / {})",
                low,
                high
            ));
        }

        if !self.matching.loudness_offset_db.is_finite() {
            return Err(anyhow!("matching.loudness_offset_db must be finite"));
        }

        if self.whisper.model.is_empty() {
            return Err(anyhow!("whisper.model must not be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            matching: MatchingConfig::default(),
            whisper: WhisperConfig::default(),
            separation: SeparationConfig::default(),
            folders: FolderConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
