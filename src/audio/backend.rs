/*!
 * The audio-transform port.
 *
 * The matching engine depends only on this interface, never on a specific
 * codec or tool: slicing, rate change, silence generation, concatenation,
 * gain and loudness, and the final mix are all behind it. The shipped
 * implementation shells out to ffmpeg; tests inject a recording mock.
 */

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

/// Injected capability for all audio operations the engine needs
#[async_trait]
pub trait AudioBackend: Send + Sync {
    /// Convert any supported input file to wav
    async fn convert_to_wav(&self, input: &Path, output: &Path) -> Result<()>;

    /// Write the slice `[start, end)` of `input` to `output`.
    /// `end == None` slices to the end of the audio.
    async fn slice(&self, input: &Path, start: f64, end: Option<f64>, output: &Path)
        -> Result<()>;

    /// Write the slice `[start, start + duration)` of `input` to `output`,
    /// transformed by the given chain of elementary tempo steps. An error
    /// here is a transform failure the caller recovers from with silence.
    async fn slice_with_tempo(
        &self,
        input: &Path,
        start: f64,
        duration: f64,
        steps: &[f64],
        output: &Path,
    ) -> Result<()>;

    /// Write `duration` seconds of silence to `output`
    async fn silence(&self, duration: f64, output: &Path) -> Result<()>;

    /// Concatenate the clips named in a concat list file into `output`
    async fn concat(&self, list_file: &Path, output: &Path) -> Result<()>;

    /// Mix two tracks, using the longer of the two as the final duration
    async fn mix_longest(&self, a: &Path, b: &Path, output: &Path) -> Result<()>;

    /// Measure the mean volume of a file in dB (negative for quiet audio)
    async fn measure_mean_volume(&self, input: &Path) -> Result<f64>;

    /// Rewrite `input` with a gain delta applied, into `output`
    async fn apply_gain(&self, input: &Path, delta_db: f64, output: &Path) -> Result<()>;
}
