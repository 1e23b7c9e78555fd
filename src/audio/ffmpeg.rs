/*!
 * ffmpeg implementation of the audio-transform port.
 *
 * Every operation shells out to ffmpeg (or ffprobe) with a timeout, the
 * way the rest of the pipeline invokes external tools. Stderr is filtered
 * down to meaningful lines before being surfaced in errors.
 */

use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, error};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;

use super::backend::AudioBackend;

/// Pattern extracting the mean volume line from volumedetect output
static MEAN_VOLUME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"mean_volume:\s*(-?\d+(?:\.\d+)?)\s*dB").unwrap());

/// Default timeout for a single ffmpeg invocation
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Audio backend shelling out to ffmpeg
pub struct FfmpegBackend {
    /// Timeout applied to each invocation
    timeout: Duration,
}

impl Default for FfmpegBackend {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl FfmpegBackend {
    /// Create a backend with the given per-invocation timeout
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run ffmpeg with the standard quiet/overwrite flags plus `args`
    async fn run_ffmpeg(&self, args: &[&str]) -> Result<Vec<u8>> {
        let mut full_args = vec!["-hide_banner", "-loglevel", "error", "-y"];
        full_args.extend_from_slice(args);

        debug!("ffmpeg {}", full_args.join(" "));

        let future = Command::new("ffmpeg").args(&full_args).output();

        let output = tokio::select! {
            result = future => {
                result.map_err(|e| anyhow!("Failed to execute ffmpeg: {}", e))?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(anyhow!("ffmpeg timed out after {:?}", self.timeout));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let filtered = Self::filter_ffmpeg_stderr(&stderr);
            error!("ffmpeg failed: {}", filtered);
            return Err(anyhow!("ffmpeg failed: {}", filtered));
        }

        Ok(output.stderr)
    }

    /// Build an atempo filter chain string from elementary steps
    fn atempo_chain(steps: &[f64]) -> String {
        steps
            .iter()
            .map(|s| format!("atempo={}", s))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Filter ffmpeg stderr to only show meaningful error lines, stripping
    /// the version banner, build configuration, and stream metadata noise.
    fn filter_ffmpeg_stderr(stderr: &str) -> String {
        let dominated_prefixes = [
            "ffmpeg version",
            "  built with",
            "  configuration:",
            "  lib",
            "Input #",
            "  Metadata:",
            "  Duration:",
            "  Stream #",
            "Output #",
            "Stream mapping:",
            "Press [q]",
        ];

        let meaningful: Vec<&str> = stderr
            .lines()
            .filter(|line| {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    return false;
                }
                !dominated_prefixes.iter().any(|p| trimmed.starts_with(p))
            })
            .collect();

        if meaningful.is_empty() {
            "unknown ffmpeg error (stderr was empty after filtering)".to_string()
        } else {
            meaningful.join("\n")
        }
    }

    fn path_str(path: &Path) -> &str {
        path.to_str().unwrap_or_default()
    }
}

#[async_trait]
impl AudioBackend for FfmpegBackend {
    async fn convert_to_wav(&self, input: &Path, output: &Path) -> Result<()> {
        self.run_ffmpeg(&[
            "-i",
            Self::path_str(input),
            "-q:a",
            "0",
            "-map",
            "a",
            Self::path_str(output),
        ])
        .await?;
        Ok(())
    }

    async fn slice(
        &self,
        input: &Path,
        start: f64,
        end: Option<f64>,
        output: &Path,
    ) -> Result<()> {
        let start_s = start.to_string();
        let mut args = vec!["-i", Self::path_str(input), "-ss", &start_s];

        let end_s;
        if let Some(end) = end {
            end_s = end.to_string();
            args.extend_from_slice(&["-to", &end_s]);
        }

        args.push(Self::path_str(output));
        self.run_ffmpeg(&args).await?;
        Ok(())
    }

    async fn slice_with_tempo(
        &self,
        input: &Path,
        start: f64,
        duration: f64,
        steps: &[f64],
        output: &Path,
    ) -> Result<()> {
        let start_s = start.to_string();
        let duration_s = duration.to_string();
        let mut args = vec![
            "-i",
            Self::path_str(input),
            "-ss",
            &start_s,
            "-t",
            &duration_s,
        ];

        let chain;
        if !steps.is_empty() {
            chain = Self::atempo_chain(steps);
            args.extend_from_slice(&["-filter:a", &chain]);
        }

        args.push(Self::path_str(output));
        self.run_ffmpeg(&args).await?;
        Ok(())
    }

    async fn silence(&self, duration: f64, output: &Path) -> Result<()> {
        self.run_ffmpeg(&[
            "-f",
            "lavfi",
            "-i",
            "anullsrc=r=44100:cl=stereo",
            "-t",
            &duration.to_string(),
            Self::path_str(output),
        ])
        .await?;
        Ok(())
    }

    async fn concat(&self, list_file: &Path, output: &Path) -> Result<()> {
        self.run_ffmpeg(&[
            "-f",
            "concat",
            "-safe",
            "0",
            "-i",
            Self::path_str(list_file),
            Self::path_str(output),
        ])
        .await?;
        Ok(())
    }

    async fn mix_longest(&self, a: &Path, b: &Path, output: &Path) -> Result<()> {
        self.run_ffmpeg(&[
            "-i",
            Self::path_str(a),
            "-i",
            Self::path_str(b),
            "-filter_complex",
            "[0][1]amix=inputs=2:duration=longest",
            Self::path_str(output),
        ])
        .await?;
        Ok(())
    }

    async fn measure_mean_volume(&self, input: &Path) -> Result<f64> {
        // volumedetect reports on stderr; loglevel info is required for it
        let future = Command::new("ffmpeg")
            .args([
                "-hide_banner",
                "-i",
                Self::path_str(input),
                "-af",
                "volumedetect",
                "-f",
                "null",
                "-",
            ])
            .output();

        let output = tokio::select! {
            result = future => {
                result.map_err(|e| anyhow!("Failed to execute ffmpeg: {}", e))?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(anyhow!("ffmpeg volumedetect timed out after {:?}", self.timeout));
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        let captures = MEAN_VOLUME_RE
            .captures(&stderr)
            .ok_or_else(|| anyhow!("No mean_volume in volumedetect output for {:?}", input))?;

        let db: f64 = captures[1]
            .parse()
            .map_err(|e| anyhow!("Unparsable mean_volume: {}", e))?;

        Ok(db)
    }

    async fn apply_gain(&self, input: &Path, delta_db: f64, output: &Path) -> Result<()> {
        self.run_ffmpeg(&[
            "-i",
            Self::path_str(input),
            "-filter:a",
            &format!("volume={}dB", delta_db),
            Self::path_str(output),
        ])
        .await?;
        Ok(())
    }
}
