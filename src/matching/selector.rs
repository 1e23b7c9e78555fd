/*!
 * Donor candidate selection.
 *
 * For a target word and its corpus candidates, discard candidates that
 * would become inaudible after the rate transform and pick the one whose
 * natural duration is closest to the target slot. Smaller tempo changes
 * sound more natural, so the ranking key is distance of the speed factor
 * from 1.0.
 */

use log::debug;

use crate::corpus::{CorpusEntry, WordCorpus};
use crate::transcript::TargetWord;

/// One target word bound to its chosen donor occurrence
#[derive(Debug, Clone)]
pub struct Match {
    /// The target slot being replaced
    pub target: TargetWord,

    /// The donor occurrence that fills it
    pub donor: CorpusEntry,

    /// Ratio of donor duration to target slot duration
    pub speed_factor: f64,
}

impl Match {
    /// Output duration of the donor body once the rate transform is
    /// applied, in seconds. This is the duration a silence substitute
    /// must take if the transform fails.
    pub fn intended_duration(&self) -> f64 {
        self.donor.duration() / self.speed_factor
    }
}

/// Pick the best donor occurrence for a target word, or `None`.
///
/// A candidate is valid iff its speed factor is finite and non-zero, its
/// own duration clears the audibility floor, and so does its effective
/// duration after the rate transform. Invalid candidates are discarded
/// entirely. Ties on the ranking key keep the earliest-inserted candidate
/// so runs are reproducible.
pub fn select_donor<'a>(
    target: &TargetWord,
    candidates: &'a [CorpusEntry],
    min_clip_ms: u64,
) -> Option<&'a CorpusEntry> {
    let min_clip_s = min_clip_ms as f64 / 1000.0;

    let mut best: Option<(&CorpusEntry, f64)> = None;

    for candidate in candidates {
        let speed_factor = candidate.speed_factor_for(target);

        if !speed_factor.is_finite() || speed_factor == 0.0 {
            debug!(
                "Discarding donor {} for {:?}: degenerate speed factor {}",
                candidate.id, target.word, speed_factor
            );
            continue;
        }

        let effective_duration = candidate.duration() / speed_factor;
        if candidate.duration() < min_clip_s || effective_duration < min_clip_s {
            debug!(
                "Discarding donor {} for {:?}: below {}ms audibility floor",
                candidate.id, target.word, min_clip_ms
            );
            continue;
        }

        let fit = (speed_factor - 1.0).abs();
        // Strict comparison keeps the first-inserted candidate on ties
        if best.map_or(true, |(_, best_fit)| fit < best_fit) {
            best = Some((candidate, fit));
        }
    }

    best.map(|(candidate, _)| candidate)
}

/// Match an ordered list of target words against the corpus.
///
/// Target words with no valid donor yield no match at all (the timeline
/// later treats those slots as silence-fill regions); this is a local,
/// non-fatal condition.
pub fn match_words(
    targets: &[TargetWord],
    corpus: &WordCorpus,
    min_clip_ms: u64,
) -> anyhow::Result<Vec<Match>> {
    let mut matches = Vec::new();

    for target in targets {
        let candidates = corpus.lookup(&target.word)?;
        if candidates.is_empty() {
            debug!("No corpus entry for {:?}", target.word);
            continue;
        }

        match select_donor(target, &candidates, min_clip_ms) {
            Some(donor) => {
                let speed_factor = donor.speed_factor_for(target);
                debug!(
                    "Matched {:?} with {} [{:.2}s..{:.2}s], speed factor {:.3}",
                    target.word, donor.source_file, donor.start, donor.end, speed_factor
                );
                matches.push(Match {
                    target: target.clone(),
                    donor: donor.clone(),
                    speed_factor,
                });
            }
            None => {
                debug!("No valid donor for {:?} among {} candidates", target.word, candidates.len());
            }
        }
    }

    Ok(matches)
}
