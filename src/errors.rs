/*!
 * Error types for the resung application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with the word corpus
#[derive(Error, Debug)]
pub enum CorpusError {
    /// Error opening or initializing the corpus database
    #[error("Failed to open corpus database: {0}")]
    OpenFailed(String),

    /// Error executing a corpus query
    #[error("Corpus query failed: {0}")]
    QueryFailed(String),

    /// A stored record could not be interpreted (bad timestamps, empty word)
    #[error("Malformed corpus record: {0}")]
    MalformedRecord(String),
}

/// Errors that can occur while loading or normalizing transcripts
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// Error parsing a transcript document
    #[error("Failed to parse transcript: {0}")]
    ParseError(String),

    /// The transcription tool failed or produced no output
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),
}

/// Errors that can occur at the audio processing boundary
#[derive(Error, Debug)]
pub enum AudioError {
    /// An external audio command could not be executed
    #[error("Audio command failed to start: {0}")]
    CommandFailed(String),

    /// An elementary rate/slice/concat operation reported an error.
    /// Recovered locally with silence substitution; never fatal to a run.
    #[error("Audio transform failed: {0}")]
    TransformFailure(String),

    /// Loudness of a clip could not be measured
    #[error("Loudness measurement failed: {0}")]
    LoudnessFailed(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the word corpus
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    /// Error from transcript handling
    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    /// Error from the audio boundary
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
