// JobTimeline - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{NaiveDateTime, Weekday};
use std::collections::HashMap;
use std::path::PathBuf;

// =============================================================================
// Event kinds
// =============================================================================

/// What an event kind's matches are used for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventRole {
    /// Each match becomes a timeline entry rendered with `label`.
    Timeline { label: String },

    /// Matches form a same-day reference set. Timeline entries on a date
    /// present in the set carry `flag`.
    SameDay { flag: String },
}

/// A named event kind: the regex that finds it in a log line and the role
/// its matches play in the report.
///
/// `pattern` is kept as source text. It is compiled by the extractor, which
/// tolerates invalid patterns instead of failing the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventKind {
    /// Unique key, e.g. "start" or "retention".
    pub name: String,

    /// Regex whose first capture group is the timestamp substring.
    pub pattern: String,

    pub role: EventRole,
}

impl EventKind {
    pub fn timeline(name: &str, pattern: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            role: EventRole::Timeline {
                label: label.to_string(),
            },
        }
    }

    pub fn same_day(name: &str, pattern: &str, flag: &str) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            role: EventRole::SameDay {
                flag: flag.to_string(),
            },
        }
    }
}

// =============================================================================
// Discovered files
// =============================================================================

/// A log file found during directory scanning, before extraction.
#[derive(Debug, Clone)]
pub struct LogFile {
    /// Full path to the file.
    pub path: PathBuf,

    /// File size in bytes.
    pub size: u64,
}

// =============================================================================
// Extraction output
// =============================================================================

/// A timestamp substring captured from a log line, with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTimestamp {
    /// Text of the pattern's first capture group.
    pub value: String,

    /// File the line was read from.
    pub file: PathBuf,

    /// 1-based line number within `file`.
    pub line_number: u64,
}

/// Captured timestamps per event kind, in file-then-line encounter order.
///
/// Every kind the extractor was given has an entry, even when nothing
/// matched, so lookups by kind never miss.
#[derive(Debug, Clone, Default)]
pub struct ExtractedData {
    by_kind: HashMap<String, Vec<RawTimestamp>>,
}

impl ExtractedData {
    /// Creates an empty sequence for each of the given kind names.
    pub fn with_kinds<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            by_kind: names
                .into_iter()
                .map(|n| (n.to_string(), Vec::new()))
                .collect(),
        }
    }

    /// Appends a captured value to `kind`'s sequence.
    pub fn push(&mut self, kind: &str, raw: RawTimestamp) {
        self.by_kind.entry(kind.to_string()).or_default().push(raw);
    }

    /// Captured values for `kind`, empty if the kind is unknown.
    pub fn get(&self, kind: &str) -> &[RawTimestamp] {
        self.by_kind.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of values captured for `kind`.
    pub fn count(&self, kind: &str) -> usize {
        self.get(kind).len()
    }

    /// Total number of values captured across all kinds.
    pub fn total(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

// =============================================================================
// Timeline output
// =============================================================================

/// One rendered line of the report: a timeline event and its flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRow {
    /// Parsed event time.
    pub timestamp: NaiveDateTime,

    /// Label of the timeline kind ("Start", "Finish").
    pub label: String,

    /// Day of the week of `timestamp`.
    pub weekday: Weekday,

    /// Flags in canonical order: "First Monday" first, then same-day flags
    /// in event-kind declaration order.
    pub flags: Vec<String>,
}

impl TimelineRow {
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}

// =============================================================================
// Run summary
// =============================================================================

/// Statistics for a completed run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Files matched by the filename pattern.
    pub files_discovered: usize,

    /// Files that could not be read and were treated as empty.
    pub files_unreadable: usize,

    /// Lines scanned across all readable files.
    pub lines_scanned: u64,

    /// Values captured per event kind.
    pub matches_by_kind: HashMap<String, usize>,

    /// Timeline rows produced.
    pub events: usize,

    /// Timestamps dropped under the skip policy.
    pub timestamps_skipped: usize,
}
