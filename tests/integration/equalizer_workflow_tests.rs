/*!
 * Loudness equalization workflow against the mock audio backend
 */

use anyhow::Result;

use resung::audio::VolumeEqualizer;

use crate::common;
use crate::common::mock_audio::{AudioOp, MockAudioBackend};

#[tokio::test]
async fn test_equalize_shouldAdjustOnlyFilesOffReference() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let base = temp_dir.path().to_path_buf();

    let quiet = common::create_test_file(&base, "quiet.wav", "x")?;
    let on_level = common::create_test_file(&base, "on_level.wav", "x")?;
    let vocals = common::create_test_file(&base, "vocals.wav", "x")?;

    let backend = MockAudioBackend::new();
    backend.set_volume(&vocals, -23.0);
    backend.set_volume(&quiet, -20.0);
    backend.set_volume(&on_level, -13.2);

    let equalizer = VolumeEqualizer::new(&backend, 10.0);

    // Reference is the vocal level plus the compensation offset
    let reference = equalizer.reference_from(&vocals).await?;
    assert!((reference + 13.0).abs() < 1e-10);

    let adjusted = equalizer
        .equalize_files(&[quiet.clone(), on_level.clone()], reference)
        .await?;

    // Only the -20 dB file needed a rewrite; -13.2 dB sits within the
    // epsilon of the reference, which is what makes the pass idempotent
    assert_eq!(adjusted, 1);

    let ops = backend.ops();
    let gains: Vec<&AudioOp> = ops
        .iter()
        .filter(|op| matches!(op, AudioOp::ApplyGain { .. }))
        .collect();
    assert_eq!(gains.len(), 1);
    match gains[0] {
        AudioOp::ApplyGain { input, delta_db } => {
            assert_eq!(input, &quiet);
            assert!((delta_db - 7.0).abs() < 1e-10);
        }
        _ => unreachable!(),
    }

    // The adjusted file was replaced in place; no temp file remains
    assert!(quiet.exists());
    assert!(!quiet.with_extension("gain.wav").exists());
    Ok(())
}

#[tokio::test]
async fn test_equalize_runTwice_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let base = temp_dir.path().to_path_buf();
    let file = common::create_test_file(&base, "donor.wav", "x")?;

    let backend = MockAudioBackend::new();
    backend.set_volume(&file, -18.0);

    let equalizer = VolumeEqualizer::new(&backend, 10.0);
    let adjusted = equalizer.equalize_files(&[file.clone()], -13.0).await?;
    assert_eq!(adjusted, 1);

    // Second pass sees the file at the reference level now
    backend.set_volume(&file, -13.0);
    let adjusted = equalizer.equalize_files(&[file], -13.0).await?;
    assert_eq!(adjusted, 0);
    Ok(())
}
