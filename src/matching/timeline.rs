/*!
 * Output timeline assembly.
 *
 * Walks the ordered matches and produces a gapless sequence of segments:
 * a lead-in slice of the original vocals, one tempo-transformed donor body
 * per match, silence spanning the region between consecutive matches, and
 * a trail-out slice to the end of the track. Target words that found no
 * donor are silence-fill regions; their original audio is dropped rather
 * than copied through, so no untransformed vocal bleeds into the output.
 */

use super::selector::Match;
use super::tempo::plan_tempo_steps;

/// One segment of the assembled output timeline
#[derive(Debug, Clone)]
pub enum TimelineSegment {
    /// A raw slice of the original vocal track. `end == None` means
    /// "to the end of the audio" (the trail-out).
    OriginalSlice {
        /// Slice start in seconds
        start: f64,
        /// Slice end in seconds, or None for end-of-track
        end: Option<f64>,
    },

    /// A donor clip, rate-transformed to fit its target slot
    Donor {
        /// The match being rendered
        matched: Match,
        /// Elementary tempo steps realizing the speed factor
        steps: Vec<f64>,
    },

    /// A span of silence
    Silence {
        /// Duration in seconds
        duration: f64,
    },
}

/// Assemble the output timeline from ordered matches.
///
/// The walk is bounded by virtual start and end matches (at time zero and
/// end-of-track), so lead-in, inter-match connectors and trail-out fall
/// out of one general connector rule: the connector adjacent to a virtual
/// boundary is original audio, every connector between two real matches is
/// silence. With no matches at all this degrades to a single copy-through
/// of the whole track.
pub fn build_timeline(matches: &[Match], tempo_low: f64, tempo_high: f64) -> Vec<TimelineSegment> {
    let mut segments = Vec::new();

    let Some(first) = matches.first() else {
        segments.push(TimelineSegment::OriginalSlice {
            start: 0.0,
            end: None,
        });
        return segments;
    };

    // Lead-in: virtual start match ends at time zero
    if first.target.start > 0.0 {
        segments.push(TimelineSegment::OriginalSlice {
            start: 0.0,
            end: Some(first.target.start),
        });
    }

    for (i, matched) in matches.iter().enumerate() {
        segments.push(TimelineSegment::Donor {
            matched: matched.clone(),
            steps: plan_tempo_steps(matched.speed_factor, tempo_low, tempo_high),
        });

        // Connector to the next real match is silence, regardless of any
        // unmatched target words inside the span
        if let Some(next) = matches.get(i + 1) {
            let gap = next.target.start - matched.target.end;
            if gap > 0.0 {
                segments.push(TimelineSegment::Silence { duration: gap });
            }
        }
    }

    // Trail-out: virtual end match starts at end-of-track
    let last = matches.last().unwrap_or(first);
    segments.push(TimelineSegment::OriginalSlice {
        start: last.target.end,
        end: None,
    });

    segments
}
