/*!
 * Corpus loudness equalization pre-pass.
 *
 * Donor recordings come from wildly different capture conditions, so each
 * prepared file's gain is rewritten to the reference level before any clip
 * is sliced for matching. The reference is the target vocal track's mean
 * volume plus a fixed positive offset compensating for the perceived
 * loudness drop after tempo manipulation.
 */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use super::backend::AudioBackend;

/// Gain deltas below this are inaudible and skipped; this also makes the
/// pass idempotent, since re-running recomputes the delta against the
/// already-adjusted level.
const GAIN_EPSILON_DB: f64 = 0.5;

/// Loudness equalizer over the audio port
pub struct VolumeEqualizer<'a> {
    backend: &'a dyn AudioBackend,
    offset_db: f64,
}

impl<'a> VolumeEqualizer<'a> {
    /// Create an equalizer with the given compensation offset
    pub fn new(backend: &'a dyn AudioBackend, offset_db: f64) -> Self {
        Self { backend, offset_db }
    }

    /// Compute the reference level from the target vocal track
    pub async fn reference_from(&self, target_vocals: &Path) -> Result<f64> {
        let measured = self
            .backend
            .measure_mean_volume(target_vocals)
            .await
            .with_context(|| format!("Failed to measure loudness of {:?}", target_vocals))?;

        let reference = measured + self.offset_db;
        info!(
            "Loudness reference: {:.1} dB (vocals {:.1} dB + {:.1} dB offset)",
            reference, measured, self.offset_db
        );
        Ok(reference)
    }

    /// Rewrite each file's gain so its mean volume equals `reference_db`.
    ///
    /// Returns the number of files actually adjusted.
    pub async fn equalize_files(&self, files: &[PathBuf], reference_db: f64) -> Result<usize> {
        let mut adjusted = 0;

        for file in files {
            let measured = self
                .backend
                .measure_mean_volume(file)
                .await
                .with_context(|| format!("Failed to measure loudness of {:?}", file))?;

            let delta = reference_db - measured;
            if delta.abs() < GAIN_EPSILON_DB {
                debug!("{:?} already at reference ({:.1} dB)", file, measured);
                continue;
            }

            let tmp = file.with_extension("gain.wav");
            self.backend
                .apply_gain(file, delta, &tmp)
                .await
                .with_context(|| format!("Failed to apply {:+.1} dB to {:?}", delta, file))?;

            tokio::fs::rename(&tmp, file)
                .await
                .with_context(|| format!("Failed to replace {:?} after gain rewrite", file))?;

            debug!("Adjusted {:?} by {:+.1} dB", file, delta);
            adjusted += 1;
        }

        info!("Equalized {} of {} corpus files", adjusted, files.len());
        Ok(adjusted)
    }
}
