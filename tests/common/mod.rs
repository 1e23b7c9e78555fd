/*!
 * Common test utilities for the resung test suite
 */

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use resung::errors::TranscriptError;
use resung::transcriber::TranscriptionProvider;
use resung::transcript::{Transcript, TranscriptSegment, TranscriptWord};

// Re-export the mock audio backend module
pub mod mock_audio;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds a transcript from (raw_token, start, end) triples in one segment
pub fn transcript_of(words: &[(&str, f64, f64)]) -> Transcript {
    Transcript {
        segments: vec![TranscriptSegment {
            words: words
                .iter()
                .map(|(text, start, end)| TranscriptWord {
                    text: text.to_string(),
                    start: *start,
                    end: *end,
                })
                .collect(),
        }],
    }
}

/// Transcription provider serving canned transcripts keyed by file name
#[derive(Debug, Default)]
pub struct StubTranscriber {
    transcripts: HashMap<String, Transcript>,
}

impl StubTranscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transcript(mut self, file_name: &str, transcript: Transcript) -> Self {
        self.transcripts.insert(file_name.to_string(), transcript);
        self
    }
}

#[async_trait]
impl TranscriptionProvider for StubTranscriber {
    async fn transcribe(&self, audio_file: &Path) -> Result<Transcript, TranscriptError> {
        let name = audio_file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        self.transcripts.get(&name).cloned().ok_or_else(|| {
            TranscriptError::TranscriptionFailed(format!("No canned transcript for {}", name))
        })
    }
}

/// A whisper-shaped JSON document for a short two-word clip
pub fn sample_whisper_json() -> &'static str {
    r#"{
        "text": " Hello world",
        "segments": [
            {
                "id": 0,
                "seek": 0,
                "words": [
                    {"word": " Hello", "start": 0.0, "end": 0.42, "probability": 0.97},
                    {"word": " world.", "start": 0.42, "end": 0.95, "probability": 0.93}
                ]
            }
        ],
        "language": "en"
    }"#
}
