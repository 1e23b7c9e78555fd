/*!
 * A recording mock of the audio-transform port.
 *
 * Every call is appended to an operation log so tests can assert on the
 * exact sequence the engine emitted. Output files are created empty so
 * existence checks pass. Tempo transforms can be made to fail for chosen
 * source files to exercise the silence-substitution path.
 */

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use resung::audio::AudioBackend;

/// One recorded call on the mock backend
#[derive(Debug, Clone, PartialEq)]
pub enum AudioOp {
    ConvertToWav {
        input: PathBuf,
        output: PathBuf,
    },
    Slice {
        input: PathBuf,
        start: f64,
        end: Option<f64>,
    },
    SliceWithTempo {
        input: PathBuf,
        start: f64,
        duration: f64,
        steps: Vec<f64>,
    },
    Silence {
        duration: f64,
    },
    Concat {
        list_file: PathBuf,
        output: PathBuf,
    },
    MixLongest {
        a: PathBuf,
        b: PathBuf,
    },
    MeasureMeanVolume {
        input: PathBuf,
    },
    ApplyGain {
        input: PathBuf,
        delta_db: f64,
    },
}

/// Audio backend that records calls instead of shelling out
#[derive(Default)]
pub struct MockAudioBackend {
    ops: Mutex<Vec<AudioOp>>,
    volumes: Mutex<HashMap<PathBuf, f64>>,
    fail_tempo_for: Mutex<HashSet<PathBuf>>,
}

impl MockAudioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded operations, in call order
    pub fn ops(&self) -> Vec<AudioOp> {
        self.ops.lock().unwrap().clone()
    }

    /// Set the mean volume reported for a file
    pub fn set_volume<P: AsRef<Path>>(&self, path: P, db: f64) {
        self.volumes
            .lock()
            .unwrap()
            .insert(path.as_ref().to_path_buf(), db);
    }

    /// Make every tempo transform reading from `source` fail
    pub fn fail_tempo_for<P: AsRef<Path>>(&self, source: P) {
        self.fail_tempo_for
            .lock()
            .unwrap()
            .insert(source.as_ref().to_path_buf());
    }

    fn record(&self, op: AudioOp) {
        self.ops.lock().unwrap().push(op);
    }

    fn touch(output: &Path) -> Result<()> {
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output, b"")?;
        Ok(())
    }
}

#[async_trait]
impl AudioBackend for MockAudioBackend {
    async fn convert_to_wav(&self, input: &Path, output: &Path) -> Result<()> {
        self.record(AudioOp::ConvertToWav {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
        });
        Self::touch(output)
    }

    async fn slice(
        &self,
        input: &Path,
        start: f64,
        end: Option<f64>,
        output: &Path,
    ) -> Result<()> {
        self.record(AudioOp::Slice {
            input: input.to_path_buf(),
            start,
            end,
        });
        Self::touch(output)
    }

    async fn slice_with_tempo(
        &self,
        input: &Path,
        start: f64,
        duration: f64,
        steps: &[f64],
        output: &Path,
    ) -> Result<()> {
        if self.fail_tempo_for.lock().unwrap().contains(input) {
            return Err(anyhow!("simulated transform failure for {:?}", input));
        }

        self.record(AudioOp::SliceWithTempo {
            input: input.to_path_buf(),
            start,
            duration,
            steps: steps.to_vec(),
        });
        Self::touch(output)
    }

    async fn silence(&self, duration: f64, output: &Path) -> Result<()> {
        self.record(AudioOp::Silence { duration });
        Self::touch(output)
    }

    async fn concat(&self, list_file: &Path, output: &Path) -> Result<()> {
        self.record(AudioOp::Concat {
            list_file: list_file.to_path_buf(),
            output: output.to_path_buf(),
        });
        Self::touch(output)
    }

    async fn mix_longest(&self, a: &Path, b: &Path, output: &Path) -> Result<()> {
        self.record(AudioOp::MixLongest {
            a: a.to_path_buf(),
            b: b.to_path_buf(),
        });
        Self::touch(output)
    }

    async fn measure_mean_volume(&self, input: &Path) -> Result<f64> {
        self.record(AudioOp::MeasureMeanVolume {
            input: input.to_path_buf(),
        });
        let volumes = self.volumes.lock().unwrap();
        Ok(volumes.get(input).copied().unwrap_or(-20.0))
    }

    async fn apply_gain(&self, input: &Path, delta_db: f64, output: &Path) -> Result<()> {
        self.record(AudioOp::ApplyGain {
            input: input.to_path_buf(),
            delta_db,
        });
        Self::touch(output)
    }
}
