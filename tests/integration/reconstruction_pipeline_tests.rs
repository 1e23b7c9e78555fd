/*!
 * End-to-end voice reconstruction against the mock audio backend.
 *
 * These tests drive matching, timeline assembly and rendering through the
 * controller and assert on the exact operation sequence hitting the audio
 * port, which is what the real ffmpeg invocations would mirror.
 */

use anyhow::Result;
use std::path::Path;

use resung::app_config::Config;
use resung::app_controller::Controller;
use resung::corpus::{NewCorpusEntry, WordCorpus};

use crate::common;
use crate::common::mock_audio::{AudioOp, MockAudioBackend};

fn donor(word: &str, file: &str, start: f64, end: f64) -> NewCorpusEntry {
    NewCorpusEntry {
        word: word.to_string(),
        source_file: file.to_string(),
        start,
        end,
    }
}

/// Controller whose working folder lives inside the given temp dir
fn controller_in(temp_dir: &tempfile::TempDir) -> Result<Controller> {
    let mut config = Config::default();
    config.folders.work_dir = temp_dir.path().join("work");
    Ok(Controller::with_config(config)?)
}

#[tokio::test]
async fn test_reconstruction_withGapAndUnmatchedWord_shouldRenderFullTimeline() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = controller_in(&temp_dir)?;
    let backend = MockAudioBackend::new();

    let corpus = WordCorpus::new_in_memory()?;
    corpus.insert_entries(&[
        donor("hello", "prep/alice.wav", 10.0, 10.6),
        donor("world", "prep/bob.wav", 3.0, 3.4),
    ])?;

    // "there" has no donor; its slot becomes part of the silence connector
    let transcript = common::transcript_of(&[
        (" Hello", 0.5, 1.0),
        (" there", 1.0, 1.6),
        (" World!", 1.6, 2.0),
    ]);

    let vocals = Path::new("work/stems/song/vocals.wav");
    let voice_file = controller
        .reconstruct_voice(&corpus, &transcript, vocals, &backend)
        .await?;

    assert_eq!(voice_file, temp_dir.path().join("work").join("output_voice.wav"));

    let ops = backend.ops();
    assert_eq!(ops.len(), 6);

    // Lead-in from the original vocals up to the first matched word
    assert_eq!(
        ops[0],
        AudioOp::Slice {
            input: vocals.to_path_buf(),
            start: 0.0,
            end: Some(0.5),
        }
    );

    // 0.6s donor stretched into the 0.5s slot with a single tempo step
    match &ops[1] {
        AudioOp::SliceWithTempo {
            input,
            start,
            duration,
            steps,
        } => {
            assert_eq!(input, Path::new("prep/alice.wav"));
            assert!((start - 10.0).abs() < 1e-10);
            assert!((duration - 0.6).abs() < 1e-9);
            assert_eq!(steps.len(), 1);
            assert!((steps[0] - 1.2).abs() < 1e-9);
        }
        other => panic!("Expected tempo transform, got {:?}", other),
    }

    // Connector spanning the unmatched word and the natural gap
    assert!(matches!(
        ops[2],
        AudioOp::Silence { duration } if (duration - 0.6).abs() < 1e-10
    ));

    // Exact-fit donor needs no tempo steps
    match &ops[3] {
        AudioOp::SliceWithTempo {
            input,
            duration,
            steps,
            ..
        } => {
            assert_eq!(input, Path::new("prep/bob.wav"));
            assert!((duration - 0.4).abs() < 1e-9);
            assert!(steps.is_empty());
        }
        other => panic!("Expected tempo transform, got {:?}", other),
    }

    // Trail-out to end-of-track
    assert_eq!(
        ops[4],
        AudioOp::Slice {
            input: vocals.to_path_buf(),
            start: 2.0,
            end: None,
        }
    );

    assert!(matches!(ops[5], AudioOp::Concat { .. }));

    // The concat list names one clip per timeline segment, in order
    let list_path = temp_dir
        .path()
        .join("work")
        .join("clips")
        .join("concat_list.txt");
    let list = std::fs::read_to_string(&list_path)?;
    let lines: Vec<&str> = list.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "file '00000.wav'");
    assert_eq!(lines[4], "file '00004.wav'");

    Ok(())
}

#[tokio::test]
async fn test_reconstruction_transformFailure_shouldSubstituteSilence() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = controller_in(&temp_dir)?;
    let backend = MockAudioBackend::new();
    backend.fail_tempo_for("prep/alice.wav");

    let corpus = WordCorpus::new_in_memory()?;
    corpus.insert_entries(&[
        donor("hello", "prep/alice.wav", 10.0, 10.6),
        donor("world", "prep/bob.wav", 3.0, 3.4),
    ])?;

    let transcript = common::transcript_of(&[(" Hello", 0.5, 1.0), (" World!", 1.1, 1.5)]);

    let vocals = Path::new("vocals.wav");
    controller
        .reconstruct_voice(&corpus, &transcript, vocals, &backend)
        .await?;

    let ops = backend.ops();

    // The failed donor never lands in the log; a silence of the intended
    // output duration (the 0.5s slot) takes its place
    assert!(matches!(
        ops[1],
        AudioOp::Silence { duration } if (duration - 0.5).abs() < 1e-10
    ));

    // The run is not aborted: the second donor still renders
    assert!(ops.iter().any(|op| matches!(
        op,
        AudioOp::SliceWithTempo { input, .. } if input == Path::new("prep/bob.wav")
    )));
    assert!(matches!(ops.last(), Some(AudioOp::Concat { .. })));

    Ok(())
}

#[tokio::test]
async fn test_prepareAndIngest_shouldBuildCorpusFromInputFolder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("input");
    std::fs::create_dir_all(&input_dir)?;
    std::fs::write(input_dir.join("alice.mp3"), b"fake audio")?;
    std::fs::write(input_dir.join("notes.txt"), b"lyrics sheet")?;

    let mut config = Config::default();
    config.folders.work_dir = temp_dir.path().join("work");
    config.folders.input_dir = input_dir;
    config.folders.prep_dir = temp_dir.path().join("prep");
    let controller = Controller::with_config(config)?;

    let backend = MockAudioBackend::new();
    let multi_progress = indicatif::MultiProgress::new();

    // Only the audio file is converted; the text file is skipped
    let prep_files = controller.prepare_corpus(&backend, &multi_progress).await?;
    let expected_wav = temp_dir.path().join("prep").join("alice.wav");
    assert_eq!(prep_files, vec![expected_wav]);
    assert!(matches!(backend.ops()[0], AudioOp::ConvertToWav { .. }));

    // Artifact tokens never reach the corpus
    let transcriber = common::StubTranscriber::new().with_transcript(
        "alice.wav",
        common::transcript_of(&[(" Hello,", 1.0, 1.5), ("***", 2.0, 2.4)]),
    );

    let corpus = WordCorpus::new_in_memory()?;
    let inserted = controller
        .ingest_corpus(&prep_files, &corpus, &transcriber, &multi_progress)
        .await?;
    assert_eq!(inserted, 1);

    let candidates = corpus.lookup("hello")?;
    assert_eq!(candidates.len(), 1);
    assert!((candidates[0].start - 1.0).abs() < 1e-10);
    assert!((candidates[0].end - 1.5).abs() < 1e-10);

    Ok(())
}

#[tokio::test]
async fn test_reconstruction_withEmptyCorpus_shouldCopyVocalsThrough() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = controller_in(&temp_dir)?;
    let backend = MockAudioBackend::new();

    let corpus = WordCorpus::new_in_memory()?;
    let transcript = common::transcript_of(&[(" Lonely", 0.0, 0.5)]);

    let vocals = Path::new("vocals.wav");
    controller
        .reconstruct_voice(&corpus, &transcript, vocals, &backend)
        .await?;

    let ops = backend.ops();
    assert_eq!(ops.len(), 2);
    assert_eq!(
        ops[0],
        AudioOp::Slice {
            input: vocals.to_path_buf(),
            start: 0.0,
            end: None,
        }
    );
    assert!(matches!(ops[1], AudioOp::Concat { .. }));

    Ok(())
}
