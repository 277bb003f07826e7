// JobTimeline - core/timeline.rs
//
// Turns extracted timestamps into the sorted, flagged start/finish
// timeline. Pure computation: no I/O, no printing (see core::report).

use crate::core::model::{EventKind, EventRole, ExtractedData, RawTimestamp, TimelineRow};
use crate::util::constants;
use crate::util::error::TimestampError;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use std::collections::HashSet;
use std::fmt;

/// What to do with an extracted value that does not parse as a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidTimestampPolicy {
    /// Fail the whole run on the first bad value.
    #[default]
    Abort,

    /// Drop the value, log a warning, and keep going.
    Skip,
}

/// Configuration for timeline construction.
#[derive(Debug, Clone)]
pub struct TimelineConfig {
    /// chrono format used to parse every extracted value.
    pub timestamp_format: String,

    pub on_invalid_timestamp: InvalidTimestampPolicy,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            timestamp_format: constants::DEFAULT_TIMESTAMP_FORMAT.to_string(),
            on_invalid_timestamp: InvalidTimestampPolicy::default(),
        }
    }
}

/// Result of building a timeline.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    /// Rows sorted ascending by timestamp; ties keep extraction order.
    pub rows: Vec<TimelineRow>,

    /// Values dropped under `InvalidTimestampPolicy::Skip`.
    pub skipped: Vec<TimestampError>,
}

/// A same-day reference set: the calendar dates on which a kind occurred.
struct SameDaySet<'a> {
    flag: &'a str,
    dates: HashSet<NaiveDate>,
}

/// Build the report timeline from extracted data.
///
/// Every kind in `kinds` is parsed, reference kinds included, so a bad value
/// anywhere is caught under the `Abort` policy. Timeline kinds are
/// concatenated in declaration order and stably sorted by timestamp. Each
/// row then gets its weekday and flags: "First Monday" first, then one flag
/// per same-day kind (declaration order) whose set contains the row's date.
pub fn build_timeline(
    data: &ExtractedData,
    kinds: &[EventKind],
    config: &TimelineConfig,
) -> Result<Timeline, TimestampError> {
    let mut skipped = Vec::new();
    let mut events: Vec<(NaiveDateTime, &str)> = Vec::new();
    let mut same_day: Vec<SameDaySet<'_>> = Vec::new();

    for kind in kinds {
        let parsed = parse_all(&kind.name, data.get(&kind.name), config, &mut skipped)?;
        match &kind.role {
            EventRole::Timeline { label } => {
                events.extend(parsed.into_iter().map(|ts| (ts, label.as_str())));
            }
            EventRole::SameDay { flag } => same_day.push(SameDaySet {
                flag: flag.as_str(),
                dates: parsed.iter().map(NaiveDateTime::date).collect(),
            }),
        }
    }

    // sort_by_key is stable: equal timestamps keep concatenation order.
    events.sort_by_key(|(ts, _)| *ts);

    let rows: Vec<TimelineRow> = events
        .into_iter()
        .map(|(timestamp, label)| {
            let date = timestamp.date();
            let mut flags = Vec::new();
            if is_first_monday(date) {
                flags.push(constants::FIRST_MONDAY_FLAG.to_string());
            }
            for set in &same_day {
                if set.dates.contains(&date) {
                    flags.push(set.flag.to_string());
                }
            }
            TimelineRow {
                timestamp,
                label: label.to_string(),
                weekday: date.weekday(),
                flags,
            }
        })
        .collect();

    tracing::debug!(
        events = rows.len(),
        reference_sets = same_day.len(),
        skipped = skipped.len(),
        "Timeline built"
    );

    Ok(Timeline { rows, skipped })
}

/// Parse a kind's raw values, honouring the invalid-timestamp policy.
fn parse_all(
    kind: &str,
    raws: &[RawTimestamp],
    config: &TimelineConfig,
    skipped: &mut Vec<TimestampError>,
) -> Result<Vec<NaiveDateTime>, TimestampError> {
    let mut parsed = Vec::with_capacity(raws.len());
    for raw in raws {
        match parse_timestamp(&raw.value, &config.timestamp_format) {
            Ok(ts) => parsed.push(ts),
            Err(e) => {
                let err = TimestampError {
                    kind: kind.to_string(),
                    file: raw.file.clone(),
                    line_number: raw.line_number,
                    raw_timestamp: raw.value.clone(),
                    format: config.timestamp_format.clone(),
                    reason: e.to_string(),
                };
                match config.on_invalid_timestamp {
                    InvalidTimestampPolicy::Abort => return Err(err),
                    InvalidTimestampPolicy::Skip => {
                        tracing::warn!(error = %err, "Skipping unparseable timestamp");
                        skipped.push(err);
                    }
                }
            }
        }
    }
    Ok(parsed)
}

/// Why an extracted value is not a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampParseError {
    /// Whitespace before or after the value.
    Padded,

    /// The value does not fit the format.
    Format(chrono::ParseError),
}

impl fmt::Display for TimestampParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Padded => write!(f, "value has leading or trailing whitespace"),
            Self::Format(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for TimestampParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Format(e) => Some(e),
            Self::Padded => None,
        }
    }
}

/// Parse one extracted value with `format`.
///
/// The value must be exactly the timestamp: chrono would otherwise skip
/// whitespace ahead of numeric fields.
pub fn parse_timestamp(raw: &str, format: &str) -> Result<NaiveDateTime, TimestampParseError> {
    if raw.trim() != raw {
        return Err(TimestampParseError::Padded);
    }
    NaiveDateTime::parse_from_str(raw, format).map_err(TimestampParseError::Format)
}

/// Render a timestamp the way the report prints it.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(constants::OUTPUT_TIMESTAMP_FORMAT).to_string()
}

/// True for a Monday on day 1-7 of its month, which is exactly the first
/// Monday of that month.
pub fn is_first_monday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Mon && date.day() <= constants::FIRST_MONDAY_MAX_DAY
}
