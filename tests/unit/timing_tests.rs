/*!
 * Tests for shift and alignment
 */

use subedit::errors::SubtitleError;
use subedit::timing::{self, Slice, Trim};
use crate::common;

/// Test shifting everything
#[test]
fn test_shift_withoutTargets_shouldMoveEveryEntry() {
    let entries = common::entries(&[(1, 1_000, 2_000, "a"), (2, 3_000, 4_000, "b")]);

    let shifted = timing::shift(&entries, 500, None).unwrap();

    assert_eq!(shifted[&1].start.as_millis(), 1_500);
    assert_eq!(shifted[&1].end.as_millis(), 2_500);
    assert_eq!(shifted[&2].start.as_millis(), 3_500);
    assert_eq!(shifted[&2].text, "b");
}

/// Test that a shift followed by its opposite restores the input
#[test]
fn test_shift_withOppositeDeltas_shouldBeInvertible() {
    let entries = common::numbered_entries(20);
    for delta in [-7_000, -1, 0, 1, 2_468, 3_600_000] {
        let back = timing::shift(&timing::shift(&entries, delta, None).unwrap(), -delta, None).unwrap();
        assert_eq!(back, entries);
    }
}

/// Test that targets are positions, not index values
#[test]
fn test_shift_withTargets_shouldSelectSortedPositions() {
    let entries = common::entries(&[(2, 1_000, 2_000, "a"), (5, 3_000, 4_000, "b"), (9, 5_000, 6_000, "c")]);

    let shifted = timing::shift(&entries, -1_000, Some(Slice::new(2, 3))).unwrap();

    assert_eq!(shifted[&2], entries[&2]);
    assert_eq!(shifted[&5].start.as_millis(), 2_000);
    assert_eq!(shifted[&9].end.as_millis(), 5_000);
}

/// Test clamping of the last position
#[test]
fn test_shift_withTargetsPastTheEnd_shouldClamp() {
    let entries = common::numbered_entries(3);

    let shifted = timing::shift(&entries, 100, Some(Slice::new(2, 100))).unwrap();

    assert_eq!(shifted[&1], entries[&1]);
    assert_eq!(shifted[&3].start.as_millis(), entries[&3].start.as_millis() + 100);
}

/// Test invalid position ranges
#[test]
fn test_shift_withInvalidTargets_shouldFailWithValueError() {
    let entries = common::numbered_entries(3);

    assert!(matches!(timing::shift(&entries, 1, Some(Slice::new(0, 2))), Err(SubtitleError::Value(_))));
    assert!(matches!(timing::shift(&entries, 1, Some(Slice::new(3, 2))), Err(SubtitleError::Value(_))));
}

/// Test slice arity from untyped input
#[test]
fn test_slice_from_values_withWrongArity_shouldFailWithValueError() {
    assert_eq!(Slice::from_values(&[3, 16]).unwrap(), Slice::new(3, 16));
    assert!(matches!(Slice::from_values(&[3]), Err(SubtitleError::Value(_))));
    assert!(matches!(Slice::from_values(&[1, 2, 3]), Err(SubtitleError::Value(_))));
}

/// Test the exact-match path copies example timing
#[test]
fn test_align_withMatchingSlices_shouldCopyExampleTiming() {
    let source = common::entries(&[(1, 1_000, 2_000, "a"), (2, 3_000, 4_000, "b"), (3, 5_000, 6_000, "c")]);
    let example = common::entries(&[(1, 1_100, 2_050, "x"), (2, 3_210, 3_990, "y"), (3, 5_001, 6_999, "z")]);

    let aligned = timing::align(&source, &example, None, None, Trim::default()).unwrap();

    for index in 1..=3 {
        assert_eq!(aligned[&index].start, example[&index].start);
        assert_eq!(aligned[&index].end, example[&index].end);
        assert_eq!(aligned[&index].text, source[&index].text);
    }
}

/// Test the proportional path
#[test]
fn test_align_withDifferentSlices_shouldWarpProportionally() {
    let source = common::entries(&[(1, 1_000, 2_000, "a"), (2, 3_000, 4_000, "b"), (3, 5_000, 6_000, "c")]);
    let example = common::entries(&[(1, 2_000, 3_000, "x"), (2, 10_000, 11_000, "y"), (3, 12_000, 13_000, "z")]);

    let aligned = timing::align(&source, &example, None, Some(Slice::new(1, 2)), Trim::default()).unwrap();

    let times: Vec<(i64, i64)> = aligned
        .values()
        .map(|entry| (entry.start.as_millis(), entry.end.as_millis()))
        .collect();
    assert_eq!(times, vec![(2_000, 3_800), (5_600, 7_400), (9_200, 11_000)]);
}

/// Test rounding to the nearest millisecond
#[test]
fn test_align_withFractionalPositions_shouldRoundToNearest() {
    let source = common::entries(&[(1, 0, 1, "a"), (2, 2, 3, "b")]);
    let example = common::entries(&[(5, 0, 10, "x"), (6, 10, 10, "y")]);

    let aligned = timing::align(&source, &example, None, None, Trim::default()).unwrap();

    assert_eq!(aligned[&1].end.as_millis(), 3);
    assert_eq!(aligned[&2].start.as_millis(), 7);
    assert_eq!(aligned[&2].end.as_millis(), 10);
}

/// Test that warping keeps start order
#[test]
fn test_align_withManyEntries_shouldPreserveStartOrder() {
    let source = common::numbered_entries(40);
    let example = common::entries(&[(1, 500, 1_700, "x"), (2, 90_000, 91_234, "y")]);

    let aligned = timing::align(&source, &example, Some(Slice::new(3, 37)), None, Trim::default()).unwrap();

    let starts: Vec<i64> = (3..=37).map(|index| aligned[&index].start.as_millis()).collect();
    assert!(starts.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(aligned[&1], source[&1]);
    assert_eq!(aligned[&40], source[&40]);
}

/// Test degenerate source duration
#[test]
fn test_align_withZeroSourceDuration_shouldFailWithValueError() {
    let source = common::entries(&[(1, 1_000, 1_000, "a")]);
    let example = common::entries(&[(1, 0, 5_000, "x")]);

    let result = timing::align(&source, &example, None, None, Trim::default());

    assert!(matches!(result, Err(SubtitleError::Value(_))));
}

/// Test slice bounds that are not entry indices
#[test]
fn test_align_withUnknownSliceIndex_shouldFailWithValueError() {
    let source = common::numbered_entries(5);
    let example = common::numbered_entries(5);

    let result = timing::align(&source, &example, Some(Slice::new(2, 9)), None, Trim::default());

    assert!(matches!(result, Err(SubtitleError::Value(_))));
}

/// Test trimming and renumbering
#[test]
fn test_align_withTrim_shouldDropOutsideEntriesAndRenumber() {
    let source = common::numbered_entries(5);
    let example = common::numbered_entries(5);
    let slice = Some(Slice::new(2, 4));

    let both = timing::align(&source, &example, slice, slice, Trim { start: true, end: true }).unwrap();
    assert_eq!(both.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(both[&1].text, "Line number 2");

    let start_only = timing::align(&source, &example, slice, slice, Trim { start: true, end: false }).unwrap();
    assert_eq!(start_only.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    assert_eq!(start_only[&4], source[&5]);

    let untrimmed = timing::align(&source, &example, slice, slice, Trim::default()).unwrap();
    assert_eq!(untrimmed.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
}

/// Test renumbering of sparse indices when nothing falls outside the slice
#[test]
fn test_align_withTrimAndSparseIndices_shouldRenumberContiguously() {
    let source = common::entries(&[(1, 1_000, 2_000, "one"), (3, 3_000, 4_000, "three"), (5, 5_000, 6_000, "five")]);
    let example = source.clone();

    let trimmed = timing::align(&source, &example, None, None, Trim { start: true, end: true }).unwrap();
    assert_eq!(trimmed.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(trimmed[&2].text, "three");
    assert_eq!(trimmed[&3].start.as_millis(), 5_000);

    let end_only = timing::align(&source, &example, None, None, Trim { start: false, end: true }).unwrap();
    assert_eq!(end_only.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);

    let untrimmed = timing::align(&source, &example, None, None, Trim::default()).unwrap();
    assert_eq!(untrimmed.keys().copied().collect::<Vec<_>>(), vec![1, 3, 5]);
}
