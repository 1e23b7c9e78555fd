/*!
 * # Resung - rebuild a song's voice from someone else's words
 *
 * A Rust library that reconstructs a song's vocal track by replacing every
 * transcribed word with a time-aligned clip of the same word taken from a
 * corpus of donor recordings, then remixes the result against the song's
 * accompaniment.
 *
 * ## Features
 *
 * - Build a word corpus from a folder of donor recordings via whisper
 *   word-level transcription
 * - Split the target song into vocal and accompaniment stems (spleeter)
 * - Pick, for each sung word, the donor occurrence needing the least tempo
 *   change, and stretch it to fit the slot exactly
 * - Equalize donor loudness against the vocal stem
 * - Assemble a gap-faithful timeline and render it with ffmpeg
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `transcript`: Transcript parsing and token normalization
 * - `transcriber`: Word-level transcription providers (whisper CLI)
 * - `corpus`: SQLite-backed word corpus:
 *   - `corpus::store`: Repository over the words table
 *   - `corpus::connection`: Connection handling and schema setup
 * - `matching`: The pure matching engine:
 *   - `matching::selector`: Best-fit donor selection
 *   - `matching::tempo`: Tempo step planning within transform bounds
 *   - `matching::timeline`: Timeline assembly with gap preservation
 * - `audio`: The audio boundary:
 *   - `audio::backend`: Injected audio-transform port
 *   - `audio::ffmpeg`: ffmpeg implementation of the port
 *   - `audio::equalizer`: Corpus loudness pre-pass
 *   - `audio::render`: Timeline rendering and concatenation
 * - `separator`: Dockerized source separation of the song
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod audio;
pub mod corpus;
pub mod errors;
pub mod file_utils;
pub mod matching;
pub mod separator;
pub mod transcriber;
pub mod transcript;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use corpus::{CorpusEntry, WordCorpus};
pub use matching::{build_timeline, match_words, Match, TimelineSegment};
pub use transcript::{normalize_token, TargetWord, Transcript};
pub use errors::{AppError, AudioError, CorpusError, TranscriptError};
