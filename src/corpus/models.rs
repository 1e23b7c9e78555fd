/*!
 * Value types stored in the word corpus.
 */

use crate::transcript::TargetWord;

/// One donor word occurrence: a `(word, file, start, end)` slice of a
/// prepared source recording. Immutable once inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusEntry {
    /// Database rowid; doubles as the deterministic tie-break key
    pub id: i64,

    /// Normalized word text
    pub word: String,

    /// Path to the prepared donor audio file
    pub source_file: String,

    /// Clip start in seconds
    pub start: f64,

    /// Clip end in seconds (invariant: end > start)
    pub end: f64,
}

impl CorpusEntry {
    /// Clip duration in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Ratio of this clip's duration to the target slot's duration.
    /// 1.0 means the donor already fits without any tempo change.
    pub fn speed_factor_for(&self, target: &TargetWord) -> f64 {
        self.duration() / target.duration()
    }
}

/// A donor occurrence pending insertion (no rowid yet)
#[derive(Debug, Clone)]
pub struct NewCorpusEntry {
    /// Normalized word text
    pub word: String,

    /// Path to the prepared donor audio file
    pub source_file: String,

    /// Clip start in seconds
    pub start: f64,

    /// Clip end in seconds
    pub end: f64,
}
