/*!
 * End-to-end tests of subtitle editing sessions
 */

use std::sync::Arc;

use subedit::errors::SubtitleError;
use subedit::statistics::{MemoryStatisticsStore, StatisticsStore};
use subedit::{CleanFlags, Slice, SubtitleDocument, Trim};
use crate::common;

/// Test the shift scenario from load to saved file
#[test]
fn test_shift_withLoadedFile_shouldWriteShiftedCopy() {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir().unwrap();
    let source = common::create_test_subtitle(temp_dir.path(), "movie.srt").unwrap();

    let mut document = SubtitleDocument::load(&source, None).unwrap();
    let key = document.shift(500, None).unwrap();

    assert!(key.ends_with("movie-shifted-by-500-ms.srt"));
    let output = document.save(&key, None).unwrap();
    let reloaded = SubtitleDocument::load(&output, None).unwrap();
    let entries = &reloaded.source().entries;

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[&1].start.to_string(), "00:00:01,500");
    assert_eq!(entries[&1].end.to_string(), "00:00:04,500");
    assert_eq!(entries[&3].end.to_string(), "00:00:14,500");
    assert_eq!(entries[&2].text, "It contains\nmultiple entries.");
}

/// Test that the source variant stays untouched
#[test]
fn test_shift_shouldNotMutateSource() {
    let mut document = SubtitleDocument::from_entries("movie.srt", common::numbered_entries(3));
    let before = document.source().clone();

    let key = document.shift(-1000, Some(Slice::new(2, 3))).unwrap();

    assert_eq!(key, "movie-shifted-by--1000-ms-from-2-to-3.srt");
    assert_eq!(document.source(), &before);
    let shifted = document.variant(&key).unwrap();
    assert_eq!(shifted.entries[&1], before.entries[&1]);
    assert_eq!(shifted.entries[&2].start.as_millis(), 5_000);
    assert_eq!(shifted.eta, 0);
    assert_eq!(document.keys().count(), 2);
}

/// Test the serialized output
#[test]
fn test_to_srt_withShiftedVariant_shouldRenderBlocks() {
    let mut document = SubtitleDocument::from_entries("movie.srt", common::entries(&[(1, 1_000, 2_000, "Hello")]));
    let key = document.shift(250, None).unwrap();

    assert_eq!(document.to_srt(&key).unwrap(), "1\n00:00:01,250 --> 00:00:02,250\nHello\n\n");
    assert!(matches!(document.to_srt("missing.srt"), Err(SubtitleError::Value(_))));
}

/// Test alignment with trims through the document
#[test]
fn test_align_withExampleAndTrim_shouldRenumberVariant() {
    let example = common::entries(&[(1, 10_000, 11_000, "a"), (2, 20_000, 21_000, "b")]);
    let mut document =
        SubtitleDocument::from_entries("movie.srt", common::numbered_entries(5)).with_example("ref.srt", example);

    let key = document
        .align(Some(Slice::new(2, 4)), Some(Slice::new(1, 2)), Trim { start: true, end: true })
        .unwrap();

    assert_eq!(key, "movie-aligned-src-2-4-by-exm-1-2.srt");
    let aligned = &document.variant(&key).unwrap().entries;
    assert_eq!(aligned.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(aligned[&1].start.as_millis(), 10_000);
    assert_eq!(aligned[&3].end.as_millis(), 21_000);
    assert_eq!(aligned[&2].text, "Line number 3");
    assert_eq!(document.example_key(), Some("ref.srt"));
}

/// Test alignment without a reference
#[test]
fn test_align_withoutExample_shouldFailWithoutVariant() {
    let mut document = SubtitleDocument::from_entries("movie.srt", common::numbered_entries(3));

    let result = document.align(None, None, Trim::default());

    assert!(matches!(result, Err(SubtitleError::Value(_))));
    assert_eq!(document.keys().count(), 1);
}

/// Test failures leave no variant behind
#[test]
fn test_shift_withInvalidTargets_shouldFailWithoutVariant() {
    let mut document = SubtitleDocument::from_entries("movie.srt", common::numbered_entries(3));

    assert!(matches!(document.shift(100, Some(Slice::new(0, 2))), Err(SubtitleError::Value(_))));
    assert_eq!(document.keys().collect::<Vec<_>>(), vec!["movie.srt"]);
}

/// Test cleaning and saving into an output directory
#[test]
fn test_clean_withOutputDir_shouldWriteCleanedFile() {
    let temp_dir = common::create_temp_dir().unwrap();
    let source = common::create_test_subtitle(temp_dir.path(), "movie.srt").unwrap();
    let out_dir = temp_dir.path().join("out");

    let mut document = SubtitleDocument::load(&source, None).unwrap();
    let key = document.clean_to_variant(CleanFlags { italic: true, ..CleanFlags::default() }).unwrap();
    let output = document.save(&key, Some(&out_dir)).unwrap();

    assert_eq!(output, out_dir.join("movie-cleaned.srt"));
    let cleaned = SubtitleDocument::load(&output, None).unwrap();
    assert_eq!(cleaned.source().entries[&1].text, "This is a test subtitle.");
    assert_eq!(cleaned.source().entries[&3].text, "<b>For testing</b> purposes.");
}

/// Test plain lines
#[test]
fn test_clean_to_lines_shouldStripEveryTag() {
    let temp_dir = common::create_temp_dir().unwrap();
    let source = common::create_test_subtitle(temp_dir.path(), "movie.srt").unwrap();
    let document = SubtitleDocument::load(&source, None).unwrap();

    assert_eq!(
        document.clean_to_lines(),
        vec!["This is a test subtitle.", "It contains\nmultiple entries.", "For testing purposes."]
    );
}

/// Test loading metadata
#[test]
fn test_load_withUtf8File_shouldFillMetadata() {
    let temp_dir = common::create_temp_dir().unwrap();
    let source = common::create_test_subtitle(temp_dir.path(), "movie.srt").unwrap();

    let document = SubtitleDocument::load(&source, None).unwrap();
    let metadata = &document.source().metadata;

    assert_eq!(metadata.encoding, "UTF-8");
    assert_eq!(metadata.confidence, 1.0);
}

/// Test a missing file
#[test]
fn test_load_withMissingFile_shouldFailWithIo() {
    let temp_dir = common::create_temp_dir().unwrap();
    let result = SubtitleDocument::load(temp_dir.path().join("missing.srt"), None);

    assert!(matches!(result, Err(SubtitleError::Io(_))));
}

/// Test statistics bookkeeping
#[test]
fn test_operations_shouldCountProducedFiles() {
    let store = Arc::new(MemoryStatisticsStore::new());
    let mut document = SubtitleDocument::from_entries("movie.srt", common::numbered_entries(3))
        .with_example("ref.srt", common::numbered_entries(3))
        .with_statistics(store.clone());

    document.shift(10, None).unwrap();
    document.shift(20, None).unwrap();
    document.align(None, None, Trim::default()).unwrap();
    document.clean_to_variant(CleanFlags::all_markup()).unwrap();

    let statistics = store.load().unwrap();
    assert_eq!(statistics.files_processed.shift, 2);
    assert_eq!(statistics.files_processed.align, 1);
    assert_eq!(statistics.files_processed.clean, 1);
    assert_eq!(statistics.files_processed.translate, 0);
}
