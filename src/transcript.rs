/*!
 * Transcript handling and token normalization.
 *
 * Transcripts arrive as whisper-style JSON documents: a list of segments,
 * each carrying word-level timestamps. Both corpus recordings and the target
 * vocal track go through the identical normalization so matching stays
 * consistent.
 */

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Characters stripped from raw tokens before matching: ASCII punctuation
/// plus the full-width CJK marks and typographic quotes whisper emits.
static PUNCTUATION: Lazy<HashSet<char>> = Lazy::new(|| {
    let mut set: HashSet<char> = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##.chars().collect();
    for c in [
        ' ', '“', '”', '¿', '¡', '。', '，', '！', '？', '：', '、', '；', '．',
    ] {
        set.insert(c);
    }
    set
});

/// Normalize a raw transcript token into a matchable word.
///
/// Strips punctuation and whitespace, rejects tokens that equal their own
/// upper-cased form (transcription artifacts like `[APPLAUSE]` or bare
/// numbers; the check has to run before case folding), then lower-cases.
/// Returns `None` for rejected tokens. Pure and idempotent.
pub fn normalize_token(raw: &str) -> Option<String> {
    let stripped: String = raw.chars().filter(|c| !PUNCTUATION.contains(c)).collect();

    // An empty remainder equals its own uppercase form, so this also
    // rejects tokens that were pure punctuation.
    if stripped == stripped.to_uppercase() {
        return None;
    }

    let word = stripped.to_lowercase();
    if word.is_empty() {
        return None;
    }

    Some(word)
}

/// One word with timestamps, as produced by the transcription collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptWord {
    /// Raw token text, untouched by normalization
    #[serde(rename = "word")]
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,
}

/// One transcript segment holding word-level timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Words within the segment
    #[serde(default)]
    pub words: Vec<TranscriptWord>,
}

/// A full transcript document for one audio file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Ordered segments
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
}

/// A normalized target word occupying a slot on the output timeline
#[derive(Debug, Clone, PartialEq)]
pub struct TargetWord {
    /// Normalized word text
    pub word: String,

    /// Slot start in seconds
    pub start: f64,

    /// Slot end in seconds
    pub end: f64,
}

impl TargetWord {
    /// Slot duration in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl Transcript {
    /// Parse a transcript from a whisper JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse transcript JSON")
    }

    /// Load a transcript from a whisper JSON file on disk
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read transcript file: {:?}", path.as_ref()))?;
        Self::from_json(&content)
    }

    /// Flatten the transcript into ordered, normalized target words.
    ///
    /// Tokens rejected by normalization and words with a duration below
    /// `min_duration_s` (or non-positive) are filtered out here so they
    /// never reach matching.
    pub fn target_words(&self, min_duration_s: f64) -> Vec<TargetWord> {
        let mut words = Vec::new();

        for segment in &self.segments {
            for w in &segment.words {
                let Some(normalized) = normalize_token(&w.text) else {
                    debug!("Rejected non-lexical token {:?}", w.text);
                    continue;
                };

                let duration = w.end - w.start;
                if !(duration > 0.0) || duration < min_duration_s {
                    debug!(
                        "Dropping word {:?} with degenerate duration {:.3}s",
                        normalized, duration
                    );
                    continue;
                }

                words.push(TargetWord {
                    word: normalized,
                    start: w.start,
                    end: w.end,
                });
            }
        }

        words
    }
}
