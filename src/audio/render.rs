/*!
 * Timeline rendering.
 *
 * Walks an assembled timeline in order, materializes each segment as a
 * numbered clip in the working folder, and concatenates the clips into the
 * reconstructed vocal track. A failed donor transform is substituted with
 * silence of the intended output duration; the run never aborts over a
 * single clip.
 */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};

use super::backend::AudioBackend;
use crate::file_utils::FileManager;
use crate::matching::TimelineSegment;

/// Filename of the concat demuxer list inside the working folder
const CONCAT_LIST_FILE: &str = "concat_list.txt";

/// Renders an assembled timeline through the audio port
pub struct TimelineRenderer<'a> {
    backend: &'a dyn AudioBackend,
    work_dir: PathBuf,
}

impl<'a> TimelineRenderer<'a> {
    /// Create a renderer writing intermediate clips under `work_dir`
    pub fn new(backend: &'a dyn AudioBackend, work_dir: PathBuf) -> Self {
        Self { backend, work_dir }
    }

    /// Render the timeline against the original vocal track into `output`.
    ///
    /// Segment emission is strictly serialized in timeline order; the
    /// concat list mirrors that order.
    pub async fn render(
        &self,
        timeline: &[TimelineSegment],
        vocals: &Path,
        output: &Path,
    ) -> Result<()> {
        if self.work_dir.exists() {
            tokio::fs::remove_dir_all(&self.work_dir)
                .await
                .with_context(|| format!("Failed to clear working folder {:?}", self.work_dir))?;
        }
        tokio::fs::create_dir_all(&self.work_dir)
            .await
            .with_context(|| format!("Failed to create working folder {:?}", self.work_dir))?;

        let mut list = String::new();

        for (clip_i, segment) in timeline.iter().enumerate() {
            let clip_name = format!("{:05}.wav", clip_i);
            let clip_path = self.work_dir.join(&clip_name);

            match segment {
                TimelineSegment::OriginalSlice { start, end } => {
                    debug!("Clip {}: original slice {:.2}s..{:?}", clip_i, start, end);
                    self.backend
                        .slice(vocals, *start, *end, &clip_path)
                        .await
                        .with_context(|| format!("Failed to slice original at {:.2}s", start))?;
                }

                TimelineSegment::Silence { duration } => {
                    debug!("Clip {}: {:.3}s silence", clip_i, duration);
                    self.backend.silence(*duration, &clip_path).await?;
                }

                TimelineSegment::Donor { matched, steps } => {
                    let source = Path::new(&matched.donor.source_file);
                    let result = self
                        .backend
                        .slice_with_tempo(
                            source,
                            matched.donor.start,
                            matched.donor.duration(),
                            steps,
                            &clip_path,
                        )
                        .await;

                    if let Err(e) = result {
                        // Transform failure is local: substitute silence of
                        // the intended output duration and keep going
                        warn!(
                            "Transform failed for {:?} ({}); substituting {:.0}ms of silence",
                            matched.target.word,
                            e,
                            matched.intended_duration() * 1000.0
                        );
                        self.backend
                            .silence(matched.intended_duration(), &clip_path)
                            .await?;
                    } else {
                        debug!(
                            "Clip {}: donor {:?} from {} at x{:.3}",
                            clip_i, matched.target.word, matched.donor.source_file, matched.speed_factor
                        );
                    }
                }
            }

            list.push_str(&format!("file '{}'\n", clip_name));
        }

        let list_path = self.work_dir.join(CONCAT_LIST_FILE);
        FileManager::write_to_file(&list_path, &list)
            .with_context(|| format!("Failed to write concat list {:?}", list_path))?;

        self.backend
            .concat(&list_path, output)
            .await
            .context("Failed to concatenate rendered clips")?;

        Ok(())
    }
}
