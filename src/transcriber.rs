/*!
 * Word-level transcription boundary.
 *
 * The pipeline only needs word text with start/end timestamps; where they
 * come from is behind the `TranscriptionProvider` trait. The shipped
 * implementation shells out to the whisper CLI with word timestamps and
 * JSON output enabled.
 */

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use tokio::process::Command;

use crate::errors::TranscriptError;
use crate::transcript::Transcript;

/// Common trait for all transcription providers
///
/// Implementations produce a word-timestamped transcript for a single
/// audio file, allowing them to be used interchangeably in the pipeline.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync + Debug {
    /// Transcribe one audio file to a word-timestamped transcript
    ///
    /// # Arguments
    /// * `audio_file` - Path to the audio file to transcribe
    ///
    /// # Returns
    /// * `Result<Transcript, TranscriptError>` - The transcript or an error
    async fn transcribe(&self, audio_file: &Path) -> Result<Transcript, TranscriptError>;
}

/// Transcription provider shelling out to the whisper CLI
#[derive(Debug)]
pub struct WhisperCli {
    model: String,
    language: String,
    timeout: Duration,
    /// Directory where whisper drops its JSON output
    output_dir: PathBuf,
}

impl WhisperCli {
    /// Create a provider for the given model and language
    pub fn new(model: &str, language: &str, timeout: Duration, output_dir: PathBuf) -> Self {
        Self {
            model: model.to_string(),
            language: language.to_string(),
            timeout,
            output_dir,
        }
    }

    /// Path of the JSON file whisper writes for `audio_file`
    fn json_output_path(&self, audio_file: &Path) -> PathBuf {
        let stem = audio_file.file_stem().unwrap_or_default();
        self.output_dir
            .join(format!("{}.json", stem.to_string_lossy()))
    }
}

#[async_trait]
impl TranscriptionProvider for WhisperCli {
    async fn transcribe(&self, audio_file: &Path) -> Result<Transcript, TranscriptError> {
        info!("Transcribing {:?} with model {}", audio_file, self.model);

        let args = [
            audio_file.to_str().unwrap_or_default(),
            "--model",
            &self.model,
            "--language",
            &self.language,
            "--word_timestamps",
            "True",
            "--output_format",
            "json",
            "--output_dir",
            self.output_dir.to_str().unwrap_or_default(),
        ];

        debug!("whisper {}", args.join(" "));

        let future = Command::new("whisper").args(args).output();

        let output = tokio::select! {
            result = future => {
                result.map_err(|e| {
                    TranscriptError::TranscriptionFailed(format!("Failed to execute whisper: {}", e))
                })?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(TranscriptError::TranscriptionFailed(format!(
                    "whisper timed out after {:?}",
                    self.timeout
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscriptError::TranscriptionFailed(format!(
                "whisper exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let json_path = self.json_output_path(audio_file);
        Transcript::from_json_file(&json_path)
            .map_err(|e| TranscriptError::ParseError(format!("{:#}", e)))
    }
}
