/*!
 * Tests for file and folder utilities
 */

use anyhow::Result;
use std::path::PathBuf;

use resung::file_utils::{FileManager, FileType};

use crate::common;

#[test]
fn test_ensureDir_shouldCreateNestedFolders() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b").join("c");

    FileManager::ensure_dir(&nested)?;
    assert!(FileManager::dir_exists(&nested));

    // Second call is a no-op
    FileManager::ensure_dir(&nested)?;
    Ok(())
}

#[test]
fn test_writeToFile_shouldCreateParentFolders() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("sub").join("note.txt");

    FileManager::write_to_file(&path, "file 'clip.wav'\n")?;
    assert!(FileManager::file_exists(&path));
    assert_eq!(std::fs::read_to_string(&path)?, "file 'clip.wav'\n");
    Ok(())
}

#[test]
fn test_fileExists_withDirectory_shouldBeFalse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(FileManager::dir_exists(temp_dir.path()));
    Ok(())
}

#[test]
fn test_generateWavPath_shouldKeepStem() {
    let path = FileManager::generate_wav_path("input/interview.mp4", "prep");
    assert_eq!(path, PathBuf::from("prep/interview.wav"));

    let path = FileManager::generate_wav_path("input/already.wav", "prep");
    assert_eq!(path, PathBuf::from("prep/already.wav"));
}

#[test]
fn test_listFiles_shouldRecurseIntoSubfolders() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let base = temp_dir.path().to_path_buf();
    common::create_test_file(&base, "a.wav", "x")?;

    let sub = base.join("deeper");
    FileManager::ensure_dir(&sub)?;
    common::create_test_file(&sub, "b.wav", "x")?;
    common::create_test_file(&sub, "notes.txt", "x")?;

    let found = FileManager::list_files(&base)?;
    assert_eq!(found.len(), 3);
    assert!(found.windows(2).all(|w| w[0] < w[1]));
    Ok(())
}

#[test]
fn test_detectFileType_byExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let base = temp_dir.path().to_path_buf();

    let audio = common::create_test_file(&base, "clip.mp3", "x")?;
    let video = common::create_test_file(&base, "clip.mkv", "x")?;

    assert_eq!(FileManager::detect_file_type(&audio)?, FileType::Audio);
    assert_eq!(FileManager::detect_file_type(&video)?, FileType::Video);
    Ok(())
}
