use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use encoding_rs::Encoding;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;
use crate::language_utils;
use crate::markup;
use crate::timecode::Timestamp;

// @module: SubRip parsing, serialization and encoding detection

// @const: SRT timing line
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}:\d{2}:\d{2},\d{3}) --> (\d{2}:\d{2}:\d{2},\d{3})$").unwrap()
});

/// Ordered map of subtitle index to entry, iterated in ascending index order
pub type Entries = BTreeMap<u32, SubtitleEntry>;

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Start time
    pub start: Timestamp,

    // @field: End time
    pub end: Timestamp,

    // @field: Subtitle text, may span several lines and carry markup
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(start: Timestamp, end: Timestamp, text: impl Into<String>) -> Self {
        SubtitleEntry {
            start,
            end,
            text: text.into(),
        }
    }

    /// Convenience constructor from millisecond values
    pub fn from_millis(start_ms: i64, end_ms: i64, text: impl Into<String>) -> Self {
        Self::new(Timestamp::from_millis(start_ms), Timestamp::from_millis(end_ms), text)
    }

    /// Same entry moved by `delta_ms`
    pub fn shifted(&self, delta_ms: i64) -> Self {
        SubtitleEntry {
            start: self.start.add_millis(delta_ms),
            end: self.end.add_millis(delta_ms),
            text: self.text.clone(),
        }
    }
}

/// Encoding and language information detected at load time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleMetadata {
    /// Name of the detected character encoding
    pub encoding: String,

    /// Detection confidence between 0 and 1
    pub confidence: f32,

    /// ISO language code, when it could be detected
    #[serde(default)]
    pub language: Option<String>,
}

impl Default for SubtitleMetadata {
    fn default() -> Self {
        Self {
            encoding: "UTF-8".to_string(),
            confidence: 1.0,
            language: None,
        }
    }
}

/// Result of sniffing raw subtitle bytes
#[derive(Debug, Clone, Copy)]
pub struct DetectedEncoding {
    /// Encoding used to decode the bytes
    pub encoding: &'static Encoding,

    /// Detection confidence between 0 and 1
    pub confidence: f32,
}

/// Statistically detect the charset of raw bytes
pub fn detect_encoding(bytes: &[u8]) -> DetectedEncoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return DetectedEncoding { encoding, confidence: 1.0 };
    }

    if std::str::from_utf8(bytes).is_ok() {
        return DetectedEncoding { encoding: encoding_rs::UTF_8, confidence: 1.0 };
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let (encoding, sure) = detector.guess_assess(None, true);
    let confidence = if sure { 0.8 } else { 0.5 };

    debug!("Detected encoding {} (confidence {})", encoding.name(), confidence);
    DetectedEncoding { encoding, confidence }
}

/// Decode raw bytes with the detected encoding, failing on malformed sequences
pub fn decode(bytes: &[u8], detected: &DetectedEncoding) -> Result<String, SubtitleError> {
    let (without_bom, encoding) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (&bytes[bom_len..], encoding),
        None => (bytes, detected.encoding),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(without_bom)
        .map(|text| text.into_owned())
        .ok_or_else(|| {
            SubtitleError::Encoding(format!("content is not valid {}", encoding.name()))
        })
}

/// Parse SRT format text into an ordered entry map
pub fn parse_srt_string(content: &str) -> Result<Entries, SubtitleError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let lines: Vec<&str> = content.lines().collect();
    let mut entries = Entries::new();

    let mut line_idx = 0;
    while line_idx < lines.len() {
        let index_line = lines[line_idx].trim();

        // Anything that is not a bare index outside a block is noise
        if index_line.is_empty() || !index_line.bytes().all(|b| b.is_ascii_digit()) {
            line_idx += 1;
            continue;
        }

        let index: u32 = index_line
            .parse()
            .ok()
            .filter(|index| *index > 0)
            .ok_or_else(|| SubtitleError::format(line_idx + 1, format!("index out of range: {}", index_line)))?;

        let timing_line_no = line_idx + 2;
        let timing_line = lines
            .get(line_idx + 1)
            .map(|l| l.trim())
            .ok_or_else(|| SubtitleError::format(timing_line_no, format!("missing timing line for entry {}", index)))?;

        let caps = TIMING_LINE_REGEX.captures(timing_line).ok_or_else(|| {
            SubtitleError::format(timing_line_no, format!("expected '<time> --> <time>', found '{}'", timing_line))
        })?;
        let start = Timestamp::parse(&caps[1])?;
        let end = Timestamp::parse(&caps[2])?;

        if end < start {
            return Err(SubtitleError::format(
                timing_line_no,
                format!("entry {} ends ({}) before it starts ({})", index, end, start),
            ));
        }

        line_idx += 2;
        let mut text_lines = Vec::new();
        while line_idx < lines.len() && !lines[line_idx].trim().is_empty() {
            text_lines.push(lines[line_idx].trim());
            line_idx += 1;
        }

        if entries.contains_key(&index) {
            return Err(SubtitleError::format(timing_line_no - 1, format!("duplicate subtitle index {}", index)));
        }
        entries.insert(index, SubtitleEntry::new(start, end, text_lines.join("\n")));
    }

    if entries.is_empty() {
        warn!("No valid subtitle entries found in content");
        return Err(SubtitleError::format(0, "no valid subtitle block found"));
    }

    Ok(entries)
}

/// Serialize entries back to SubRip text in ascending index order
pub fn to_srt_string(entries: &Entries) -> String {
    let mut output = String::new();
    for (index, entry) in entries {
        output.push_str(&SrtBlock { index: *index, entry }.to_string());
    }
    output
}

/// Display adapter for one `index / timing / text` block
struct SrtBlock<'a> {
    index: u32,
    entry: &'a SubtitleEntry,
}

impl fmt::Display for SrtBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.entry.start, self.entry.end)?;
        writeln!(f, "{}", self.entry.text)?;
        writeln!(f)
    }
}

/// Read, decode and parse an SRT file, detecting encoding and language
pub fn load_srt_file<P: AsRef<Path>>(path: P) -> Result<(SubtitleMetadata, Entries), SubtitleError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let detected = detect_encoding(&bytes);
    let content = decode(&bytes, &detected)?;
    let entries = parse_srt_string(&content)?;

    let clean_text = markup::clean_to_lines(&entries).join(" ");
    let language = language_utils::detect_language(&clean_text);

    debug!(
        "Loaded {} entries from {} ({}, language {:?})",
        entries.len(),
        path.display(),
        detected.encoding.name(),
        language
    );

    let metadata = SubtitleMetadata {
        encoding: detected.encoding.name().to_string(),
        confidence: detected.confidence,
        language,
    };

    Ok((metadata, entries))
}

/// Write entries to an SRT file in UTF-8
pub fn write_srt_file<P: AsRef<Path>>(path: P, entries: &Entries) -> Result<(), SubtitleError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, to_srt_string(entries))?;
    Ok(())
}
