// JobTimeline - core/report.rs
//
// Plain-text rendering of timeline rows.
// Core layer: writes to any Write trait object.

use crate::core::model::TimelineRow;
use crate::core::timeline::format_timestamp;
use std::fmt;
use std::io::{self, Write};

/// Render one row as `<timestamp>, <Label>, <Weekday>[, <Flag>]*`.
pub fn render_row(row: &TimelineRow) -> String {
    row.to_string()
}

impl fmt::Display for TimelineRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // %A is the full English weekday name; chrono formatting ignores locale.
        write!(
            f,
            "{}, {}, {}",
            format_timestamp(&self.timestamp),
            self.label,
            self.timestamp.format("%A")
        )?;
        for flag in &self.flags {
            write!(f, ", {flag}")?;
        }
        Ok(())
    }
}

/// Write one line per row, in order. Returns the number of lines written.
pub fn write_report<W: Write>(rows: &[TimelineRow], mut writer: W) -> io::Result<usize> {
    for row in rows {
        writeln!(writer, "{row}")?;
    }
    writer.flush()?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};

    fn row(label: &str, flags: &[&str]) -> TimelineRow {
        let timestamp = NaiveDate::from_ymd_opt(2024, 8, 5)
            .unwrap()
            .and_hms_milli_opt(10, 0, 7, 45)
            .unwrap();
        TimelineRow {
            timestamp,
            label: label.to_string(),
            weekday: Weekday::Mon,
            flags: flags.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn test_render_without_flags() {
        assert_eq!(
            render_row(&row("Finish", &[])),
            "05.08.2024 10:00:07.045, Finish, Monday"
        );
    }

    #[test]
    fn test_render_with_flags_in_row_order() {
        assert_eq!(
            render_row(&row("Start", &["First Monday", "Synth", "Retention"])),
            "05.08.2024 10:00:07.045, Start, Monday, First Monday, Synth, Retention"
        );
    }

    #[test]
    fn test_full_weekday_names() {
        let mut r = row("Start", &[]);
        r.timestamp = NaiveDate::from_ymd_opt(2024, 8, 14)
            .unwrap()
            .and_hms_opt(7, 40, 0)
            .unwrap();
        r.weekday = Weekday::Wed;
        assert_eq!(render_row(&r), "14.08.2024 07:40:00.000, Start, Wednesday");

        r.timestamp = NaiveDate::from_ymd_opt(2024, 8, 18)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        r.weekday = Weekday::Sun;
        assert!(render_row(&r).ends_with(", Sunday"));
    }

    #[test]
    fn test_write_report_one_line_per_row() {
        let rows = vec![row("Start", &["Synth"]), row("Finish", &[])];
        let mut buf = Vec::new();
        let count = write_report(&rows, &mut buf).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(
            lines,
            [
                "05.08.2024 10:00:07.045, Start, Monday, Synth",
                "05.08.2024 10:00:07.045, Finish, Monday",
            ]
        );
    }

    #[test]
    fn test_write_report_empty() {
        let mut buf = Vec::new();
        assert_eq!(write_report(&[], &mut buf).unwrap(), 0);
        assert!(buf.is_empty());
    }
}
