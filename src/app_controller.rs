use anyhow::{anyhow, Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_config::Config;
use crate::audio::{AudioBackend, FfmpegBackend, TimelineRenderer, VolumeEqualizer};
use crate::corpus::{NewCorpusEntry, WordCorpus};
use crate::file_utils::{FileManager, FileType};
use crate::matching::{build_timeline, match_words};
use crate::separator::SpleeterSeparator;
use crate::transcriber::{TranscriptionProvider, WhisperCli};
use crate::transcript::{normalize_token, Transcript};

// @module: Application controller for song reconstruction

/// Main application controller driving a full reconstruction run
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Run the main workflow: rebuild `song`'s vocal and remix into `output`
    pub async fn run(&self, song: PathBuf, output: PathBuf, force_overwrite: bool) -> Result<()> {
        let multi_progress = MultiProgress::new();
        self.run_with_progress(song, output, &multi_progress, force_overwrite)
            .await
    }

    /// Run the controller with progress reporting
    async fn run_with_progress(
        &self,
        song: PathBuf,
        output: PathBuf,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
    ) -> Result<()> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(&song) {
            return Err(anyhow!("Song file does not exist: {:?}", song));
        }
        if output.exists() && !force_overwrite {
            warn!("Skipping run, output already exists (use -f to force overwrite)");
            return Ok(());
        }

        let folders = &self.config.folders;
        FileManager::ensure_dir(&folders.work_dir)?;

        let backend = FfmpegBackend::default();
        let transcriber = WhisperCli::new(
            &self.config.whisper.model,
            &self.config.whisper.language,
            Duration::from_secs(self.config.whisper.timeout_secs),
            folders.work_dir.join("transcripts"),
        );

        // Stage 1: convert the donor recordings into the prep folder
        let prep_files = self
            .prepare_corpus(&backend, multi_progress)
            .await
            .context("Failed to prepare donor recordings")?;
        if prep_files.is_empty() {
            return Err(anyhow!(
                "No usable donor recordings in {:?}",
                folders.input_dir
            ));
        }

        // Stage 2: transcribe donors into a fresh corpus
        let corpus = WordCorpus::open(&folders.database_path)?;
        corpus.clear()?;
        let word_count = self
            .ingest_corpus(&prep_files, &corpus, &transcriber, multi_progress)
            .await
            .context("Failed to build the word corpus")?;
        info!("Corpus holds {} word occurrences", word_count);

        // Stage 3: split the song into vocal and accompaniment stems
        let separator = SpleeterSeparator::new(
            &self.config.separation.docker_image,
            Duration::from_secs(self.config.separation.timeout_secs),
        );
        let stems = separator
            .separate(&song, &folders.work_dir.join("stems"))
            .await
            .context("Failed to split the song into stems")?;

        // Stage 4: equalize donor loudness against the vocal stem
        let equalizer = VolumeEqualizer::new(&backend, self.config.matching.loudness_offset_db);
        let reference_db = equalizer.reference_from(&stems.vocals).await?;
        equalizer.equalize_files(&prep_files, reference_db).await?;

        // Stage 5: transcribe the vocal stem
        let vocal_transcript = transcriber
            .transcribe(&stems.vocals)
            .await
            .context("Failed to transcribe the vocal stem")?;

        // Stage 6: match, assemble and render the replacement voice
        let voice_file = self
            .reconstruct_voice(&corpus, &vocal_transcript, &stems.vocals, &backend)
            .await?;

        // Stage 7: remix against the accompaniment
        backend
            .mix_longest(&stems.accompaniment, &voice_file, &output)
            .await
            .context("Failed to mix voice and accompaniment")?;

        info!(
            "Reconstruction complete in {}. Output: {:?}",
            Self::format_duration(start_time.elapsed()),
            output
        );

        Ok(())
    }

    /// Convert every recording in the input folder to wav in the prep folder.
    ///
    /// The prep folder is rebuilt from scratch so stale conversions from a
    /// previous run never leak into the corpus.
    pub async fn prepare_corpus(
        &self,
        backend: &dyn AudioBackend,
        multi_progress: &MultiProgress,
    ) -> Result<Vec<PathBuf>> {
        let folders = &self.config.folders;

        if !FileManager::dir_exists(&folders.input_dir) {
            return Err(anyhow!("Input folder does not exist: {:?}", folders.input_dir));
        }

        FileManager::remove_dir_if_exists(&folders.prep_dir)?;
        FileManager::ensure_dir(&folders.prep_dir)?;

        let inputs = FileManager::list_files(&folders.input_dir)
            .with_context(|| format!("Failed to read input folder {:?}", folders.input_dir))?;

        info!("Converting {} donor recordings", inputs.len());
        let progress_bar = Self::stage_bar(multi_progress, inputs.len() as u64, "converting");

        let mut prep_files = Vec::new();
        for input in &inputs {
            let wav_path = FileManager::generate_wav_path(input, &folders.prep_dir);

            match FileManager::detect_file_type(input)? {
                FileType::Audio | FileType::Video => {
                    backend
                        .convert_to_wav(input, &wav_path)
                        .await
                        .with_context(|| format!("Failed to convert {:?}", input))?;
                    prep_files.push(wav_path);
                }
                FileType::Unknown => {
                    warn!("Skipping {:?}: not a recognizable audio file", input);
                }
            }
            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        Ok(prep_files)
    }

    /// Transcribe each prepared file and insert its words into the corpus.
    ///
    /// Returns the total number of word occurrences inserted.
    pub async fn ingest_corpus(
        &self,
        prep_files: &[PathBuf],
        corpus: &WordCorpus,
        transcriber: &dyn TranscriptionProvider,
        multi_progress: &MultiProgress,
    ) -> Result<usize> {
        let progress_bar =
            Self::stage_bar(multi_progress, prep_files.len() as u64, "transcribing");

        let mut total = 0;
        for file in prep_files {
            info!("Transcribing {:?}", file);
            let transcript = transcriber
                .transcribe(file)
                .await
                .with_context(|| format!("Failed to transcribe {:?}", file))?;

            let entries = Self::corpus_entries(&transcript, file);
            total += corpus.insert_entries(&entries)?;
            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        Ok(total)
    }

    /// Normalize a donor transcript into insertable corpus rows
    fn corpus_entries(transcript: &Transcript, source_file: &Path) -> Vec<NewCorpusEntry> {
        let source = source_file.to_string_lossy().to_string();
        let mut entries = Vec::new();

        for segment in &transcript.segments {
            for word in &segment.words {
                if let Some(normalized) = normalize_token(&word.text) {
                    entries.push(NewCorpusEntry {
                        word: normalized,
                        source_file: source.clone(),
                        start: word.start,
                        end: word.end,
                    });
                }
            }
        }

        entries
    }

    /// Match the vocal transcript against the corpus, assemble the timeline
    /// and render it into the replacement voice file.
    pub async fn reconstruct_voice(
        &self,
        corpus: &WordCorpus,
        vocal_transcript: &Transcript,
        vocals: &Path,
        backend: &dyn AudioBackend,
    ) -> Result<PathBuf> {
        let matching = &self.config.matching;
        let min_duration_s = matching.min_clip_ms as f64 / 1000.0;

        let targets = vocal_transcript.target_words(min_duration_s);
        info!("Vocal transcript yields {} target words", targets.len());

        let matches = match_words(&targets, corpus, matching.min_clip_ms)?;
        info!("Matched {} of {} target words", matches.len(), targets.len());
        if matches.is_empty() {
            warn!("No target word found a donor; the vocal passes through unchanged");
        }

        let timeline = build_timeline(&matches, matching.tempo_low, matching.tempo_high);

        let work_dir = self.config.folders.work_dir.join("clips");
        let voice_file = self.config.folders.work_dir.join("output_voice.wav");

        let renderer = TimelineRenderer::new(backend, work_dir);
        renderer
            .render(&timeline, vocals, &voice_file)
            .await
            .context("Failed to render the reconstructed voice")?;

        Ok(voice_file)
    }

    /// Create a stage progress bar attached to the shared MultiProgress
    fn stage_bar(multi_progress: &MultiProgress, len: u64, msg: &'static str) -> ProgressBar {
        let progress_bar = multi_progress.add(ProgressBar::new(len));
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .or_else(|_| {
                ProgressStyle::default_bar()
                    .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}")
            })
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message(msg);
        progress_bar
    }

    /// Format a Duration into a human-readable string
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
