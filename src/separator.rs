/*!
 * Source separation of the target song.
 *
 * Splits one mixed recording into a vocal stem and an accompaniment stem by
 * running spleeter inside docker, mounting the song's folder as the
 * container input and the working folder as the container output.
 */

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use tokio::process::Command;

use crate::file_utils::FileManager;

/// Stem paths produced by a separation run
#[derive(Debug, Clone)]
pub struct SeparatedStems {
    /// Isolated vocal track
    pub vocals: PathBuf,
    /// Everything that is not the voice
    pub accompaniment: PathBuf,
}

/// Dockerized spleeter runner
pub struct SpleeterSeparator {
    docker_image: String,
    timeout: Duration,
}

impl SpleeterSeparator {
    /// Create a separator using the given docker image
    pub fn new(docker_image: &str, timeout: Duration) -> Self {
        Self {
            docker_image: docker_image.to_string(),
            timeout,
        }
    }

    /// Split `song` into stems under `output_dir`.
    ///
    /// Any stems from a previous run are removed first so stale output is
    /// never picked up.
    pub async fn separate(&self, song: &Path, output_dir: &Path) -> Result<SeparatedStems> {
        let song = song
            .canonicalize()
            .with_context(|| format!("Song file not found: {:?}", song))?;
        let song_dir = song
            .parent()
            .ok_or_else(|| anyhow!("Song file has no parent directory: {:?}", song))?;
        let song_name = song
            .file_name()
            .ok_or_else(|| anyhow!("Song file has no name: {:?}", song))?
            .to_string_lossy()
            .to_string();

        FileManager::remove_dir_if_exists(output_dir)?;
        FileManager::ensure_dir(output_dir)?;
        let output_dir = output_dir
            .canonicalize()
            .with_context(|| format!("Failed to resolve output folder: {:?}", output_dir))?;

        info!("Splitting {:?} with {}", song, self.docker_image);

        let output_mount = format!("{}:/output", output_dir.display());
        let input_mount = format!("{}:/input", song_dir.display());
        let container_song = format!("/input/{}", song_name);
        let args = [
            "run",
            "--rm",
            "-v",
            &output_mount,
            "-v",
            &input_mount,
            &self.docker_image,
            "separate",
            "-o",
            "/output",
            &container_song,
        ];

        debug!("docker {}", args.join(" "));

        let future = Command::new("docker").args(args).output();

        let output = tokio::select! {
            result = future => {
                result.map_err(|e| anyhow!("Failed to execute docker: {}", e))?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(anyhow!("Source separation timed out after {:?}", self.timeout));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "Source separation failed with {}: {}",
                output.status,
                stderr.trim()
            ));
        }

        // Spleeter writes stems under a folder named after the song's stem
        let stem_name = song
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let stems = SeparatedStems {
            vocals: output_dir.join(&stem_name).join("vocals.wav"),
            accompaniment: output_dir.join(&stem_name).join("accompaniment.wav"),
        };

        if !stems.vocals.exists() || !stems.accompaniment.exists() {
            return Err(anyhow!(
                "Separation produced no stems under {:?}",
                output_dir.join(&stem_name)
            ));
        }

        info!("Vocals: {:?}", stems.vocals);
        info!("Accompaniment: {:?}", stems.accompaniment);

        Ok(stems)
    }
}
