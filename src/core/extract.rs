// JobTimeline - core/extract.rs
//
// Line-oriented timestamp extraction using the event-kind catalog.
// Core layer: works on file content handed in by the app layer, never
// touches the filesystem directly.

use crate::core::model::{EventKind, ExtractedData, RawTimestamp};
use crate::util::constants::MAX_REGEX_PATTERN_LENGTH;
use crate::util::error::ExtractError;
use regex::Regex;
use std::path::Path;

/// One event kind's compiled matcher.
///
/// `regex` is `None` when the pattern was unusable; such a kind stays in the
/// set so its (empty) sequence still appears in the extracted data.
#[derive(Debug, Clone)]
struct CompiledPattern {
    name: String,
    regex: Option<Regex>,
}

/// The compiled patterns of an event catalog, in declaration order.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<CompiledPattern>,
}

impl PatternSet {
    /// Compile every kind's pattern once.
    ///
    /// A pattern that is malformed, too long, or lacks a capture group is
    /// returned as an error and matches nothing; the remaining kinds are
    /// unaffected.
    pub fn compile(kinds: &[EventKind]) -> (Self, Vec<ExtractError>) {
        let mut errors = Vec::new();
        let patterns = kinds
            .iter()
            .map(|kind| {
                let regex = match compile_pattern(kind) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        tracing::error!(kind = %kind.name, error = %e, "Event pattern disabled");
                        errors.push(e);
                        None
                    }
                };
                CompiledPattern {
                    name: kind.name.clone(),
                    regex,
                }
            })
            .collect();
        (Self { patterns }, errors)
    }

    /// Kind names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.name.as_str())
    }

    /// An `ExtractedData` holding an empty sequence for every kind.
    pub fn empty_data(&self) -> ExtractedData {
        ExtractedData::with_kinds(self.names())
    }
}

fn compile_pattern(kind: &EventKind) -> Result<Regex, ExtractError> {
    if kind.pattern.len() > MAX_REGEX_PATTERN_LENGTH {
        return Err(ExtractError::PatternTooLong {
            kind: kind.name.clone(),
            length: kind.pattern.len(),
            max_length: MAX_REGEX_PATTERN_LENGTH,
        });
    }
    let re = Regex::new(&kind.pattern).map_err(|e| ExtractError::InvalidPattern {
        kind: kind.name.clone(),
        pattern: kind.pattern.clone(),
        source: e,
    })?;
    // captures_len counts the implicit whole-match group.
    if re.captures_len() < 2 {
        return Err(ExtractError::MissingCaptureGroup {
            kind: kind.name.clone(),
            pattern: kind.pattern.clone(),
        });
    }
    Ok(re)
}

/// Extract timestamps from one file's content into `data`.
///
/// Every line is searched (unanchored) with every pattern. A line may match
/// several kinds, but each kind takes at most its first match per line.
/// Values are appended in line order, so calling this file by file yields
/// file-then-line order.
///
/// Returns the number of lines scanned.
pub fn extract_from_content(
    content: &str,
    file_path: &Path,
    patterns: &PatternSet,
    data: &mut ExtractedData,
) -> u64 {
    let mut lines_scanned: u64 = 0;

    for (line_idx, line) in content.lines().enumerate() {
        lines_scanned += 1;
        let line_number = (line_idx as u64) + 1;

        for pattern in &patterns.patterns {
            let Some(re) = &pattern.regex else {
                continue;
            };
            // Group 1 may still be absent when it sits in an untaken
            // alternative; such a line contributes nothing.
            if let Some(value) = re.captures(line).and_then(|c| c.get(1)) {
                data.push(
                    &pattern.name,
                    RawTimestamp {
                        value: value.as_str().to_string(),
                        file: file_path.to_path_buf(),
                        line_number,
                    },
                );
            }
        }
    }

    tracing::trace!(
        file = %file_path.display(),
        lines = lines_scanned,
        "Content scanned"
    );

    lines_scanned
}
