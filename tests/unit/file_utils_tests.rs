/*!
 * Tests for file and path utilities
 */

use std::path::{Path, PathBuf};

use subedit::file_utils::FileManager;
use crate::common;

/// Test extension splitting
#[test]
fn test_split_extension_withVariousPaths_shouldSplitLastDot() {
    assert_eq!(FileManager::split_extension("dir/movie.en.srt"), ("dir/movie.en", ".srt"));
    assert_eq!(FileManager::split_extension("movie"), ("movie", ""));
    assert_eq!(FileManager::split_extension("dir/.hidden"), ("dir/.hidden", ""));
}

/// Test variant naming
#[test]
fn test_variant_path_shouldInsertSuffixBeforeExtension() {
    assert_eq!(
        FileManager::variant_path("films/movie.srt", "-shifted-by-500-ms"),
        "films/movie-shifted-by-500-ms.srt"
    );
}

/// Test output placement
#[test]
fn test_output_path_withDirectory_shouldKeepFileNameOnly() {
    assert_eq!(
        FileManager::output_path(Some("out"), "films/movie-cleaned.srt"),
        Path::new("out").join("movie-cleaned.srt")
    );
    assert_eq!(
        FileManager::output_path(None::<PathBuf>, "films/movie-cleaned.srt"),
        PathBuf::from("films/movie-cleaned.srt")
    );
}

/// Test writing into missing directories
#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("a").join("b").join("file.txt");

    FileManager::write_to_file(&path, "content").unwrap();

    assert!(FileManager::file_exists(&path));
    assert_eq!(FileManager::read_to_string(&path).unwrap(), "content");
}

/// Test reading a missing file
#[test]
fn test_read_to_string_withMissingFile_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    assert!(FileManager::read_to_string(temp_dir.path().join("missing.txt")).is_err());
    assert!(!FileManager::file_exists(temp_dir.path()));
}
