/*!
 * Word-matching and timeline-reconstruction engine.
 *
 * This is the synchronous core of the application:
 * - `selector`: pick one donor occurrence per target word under audibility
 *   and duration constraints
 * - `tempo`: decompose a speed factor into bounded elementary tempo steps
 * - `timeline`: assemble the ordered output timeline from the matches
 *
 * Everything in here is pure; audio I/O happens behind the port in
 * `crate::audio`.
 */

pub mod selector;
pub mod tempo;
pub mod timeline;

// Re-export main types
pub use selector::{match_words, select_donor, Match};
pub use tempo::plan_tempo_steps;
pub use timeline::{build_timeline, TimelineSegment};
