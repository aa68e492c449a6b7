/*!
 * Timing transformations: constant shift and proportional alignment.
 *
 * Both functions are pure; they take the parent entry map and return a new
 * one. Shift selects entries by *position* in the sorted index list, while
 * alignment slices are expressed in entry index values.
 */

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;
use crate::subtitle_processor::{Entries, SubtitleEntry};
use crate::timecode::Timestamp;

/// Inclusive `[first, last]` pair used by shift (positions) and align (indices)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    /// First element of the range
    pub first: u32,
    /// Last element of the range (inclusive)
    pub last: u32,
}

impl Slice {
    /// Create a new slice
    pub fn new(first: u32, last: u32) -> Self {
        Self { first, last }
    }

    /// Build from untyped input, which must hold exactly two values
    pub fn from_values(values: &[u32]) -> Result<Self, SubtitleError> {
        match values {
            [first, last] => Ok(Self::new(*first, *last)),
            _ => Err(SubtitleError::value(format!(
                "slices must include exactly 2 items ({} provided)",
                values.len()
            ))),
        }
    }

    /// Full index range of an entry map
    pub fn covering(entries: &Entries) -> Result<Self, SubtitleError> {
        match (entries.keys().next(), entries.keys().next_back()) {
            (Some(first), Some(last)) => Ok(Self::new(*first, *last)),
            _ => Err(SubtitleError::value("cannot build a slice over an empty subtitle set")),
        }
    }

    /// Whether `value` lies in the inclusive range
    pub fn contains(&self, value: u32) -> bool {
        self.first <= value && value <= self.last
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

/// Which out-of-slice entries alignment drops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trim {
    /// Drop entries before the source slice
    #[serde(default)]
    pub start: bool,
    /// Drop entries after the source slice
    #[serde(default)]
    pub end: bool,
}

/// Shift every entry, or the entries at sorted positions `targets`, by `delta_ms`
pub fn shift(entries: &Entries, delta_ms: i64, targets: Option<Slice>) -> Result<Entries, SubtitleError> {
    let selected = match targets {
        None => 1..=entries.len(),
        Some(slice) => {
            if slice.first == 0 || slice.first > slice.last {
                return Err(SubtitleError::value(format!(
                    "shift range must be 1-based and ascending (got {})",
                    slice
                )));
            }
            let last = (slice.last as usize).min(entries.len());
            slice.first as usize..=last
        }
    };

    debug!("Shifting positions {:?} by {} ms", selected, delta_ms);

    let shifted = entries
        .iter()
        .enumerate()
        .map(|(position, (index, entry))| {
            if selected.contains(&(position + 1)) {
                (*index, entry.shifted(delta_ms))
            } else {
                (*index, entry.clone())
            }
        })
        .collect();

    Ok(shifted)
}

/// Anchors of a slice: start of its first entry and end of its last entry
fn slice_bounds(entries: &Entries, slice: Slice, role: &str) -> Result<(Timestamp, Timestamp), SubtitleError> {
    let first = entries
        .get(&slice.first)
        .ok_or_else(|| SubtitleError::value(format!("{} slice start {} is not an entry index", role, slice.first)))?;
    let last = entries
        .get(&slice.last)
        .ok_or_else(|| SubtitleError::value(format!("{} slice end {} is not an entry index", role, slice.last)))?;
    Ok((first.start, last.end))
}

/// Affine map of a source time into the example time frame
fn warp(time: Timestamp, source_start: Timestamp, source_duration: i64, example_start: Timestamp, example_duration: i64) -> Timestamp {
    let position = time.millis_since(source_start) as f64 / source_duration as f64;
    let warped = example_start.as_millis() as f64 + position * example_duration as f64;
    Timestamp::from_millis(warped.round() as i64)
}

/// Re-time `source` so that `source_slice` spans the same time as `example_slice` in `example`
pub fn align(
    source: &Entries,
    example: &Entries,
    source_slice: Option<Slice>,
    example_slice: Option<Slice>,
    trim: Trim,
) -> Result<Entries, SubtitleError> {
    let source_slice = match source_slice {
        Some(slice) => slice,
        None => Slice::covering(source)?,
    };
    let example_slice = match example_slice {
        Some(slice) => slice,
        None => Slice::covering(example)?,
    };

    let (source_start, source_end) = slice_bounds(source, source_slice, "source")?;
    let (example_start, example_end) = slice_bounds(example, example_slice, "example")?;
    let source_duration = source_end.millis_since(source_start);
    let example_duration = example_end.millis_since(example_start);

    if source_duration == 0 {
        return Err(SubtitleError::value("source duration is zero, cannot calculate scaling factor"));
    }

    let exact_match = source_slice == example_slice;
    debug!(
        "Aligning source {} ({} ms) to example {} ({} ms), exact match: {}",
        source_slice, source_duration, example_slice, example_duration, exact_match
    );

    let mut aligned = Entries::new();
    for (index, entry) in source {
        let index = *index;
        if !source_slice.contains(index) {
            let dropped = (trim.start && index < source_slice.first) || (trim.end && index > source_slice.last);
            if !dropped {
                aligned.insert(index, entry.clone());
            }
            continue;
        }

        let retimed = if exact_match {
            let reference = example.get(&index).ok_or_else(|| {
                SubtitleError::value(format!("example has no entry {} to copy timing from", index))
            })?;
            SubtitleEntry::new(reference.start, reference.end, entry.text.clone())
        } else {
            SubtitleEntry::new(
                warp(entry.start, source_start, source_duration, example_start, example_duration),
                warp(entry.end, source_start, source_duration, example_start, example_duration),
                entry.text.clone(),
            )
        };
        aligned.insert(index, retimed);
    }

    // Any trim flag normalizes the survivors to 1..N
    if trim.start || trim.end {
        aligned = renumber(aligned);
    }

    Ok(aligned)
}

/// Renumber entries to a contiguous `1..=N` sequence, keeping their order
pub fn renumber(entries: Entries) -> Entries {
    entries
        .into_values()
        .enumerate()
        .map(|(position, entry)| (position as u32 + 1, entry))
        .collect()
}
