// JobTimeline - app/pipeline.rs
//
// Run lifecycle: Locator -> Extractor -> Processor, strictly forward.
//
// Error policy:
//   - Discovery root problems and timestamp failures (Abort policy) end
//     the run with an error.
//   - Unreadable files and unusable event patterns are non-fatal: they are
//     logged, collected as warnings, and the run continues.
//   - Each file is read whole and released before the next one is opened.

use crate::core::discovery;
use crate::core::extract::{self, PatternSet};
use crate::core::model::{ExtractedData, LogFile, RunSummary, TimelineRow};
use crate::core::timeline;
use crate::platform::config::AppConfig;
use crate::platform::fs;
use crate::util::error::{ConfigError, ExtractError, Result};
use std::time::Instant;

/// Everything a completed run produced.
#[derive(Debug)]
pub struct RunOutcome {
    /// Report rows in timeline order.
    pub rows: Vec<TimelineRow>,

    pub summary: RunSummary,

    /// Human-readable non-fatal problems (skipped entries, unreadable files,
    /// disabled patterns, skipped timestamps).
    pub warnings: Vec<String>,
}

/// Result of extracting every discovered file.
#[derive(Debug)]
pub struct Extraction {
    pub data: ExtractedData,
    pub errors: Vec<ExtractError>,
    pub lines_scanned: u64,
    pub files_unreadable: usize,
}

/// Run the whole report pipeline for `config`.
pub fn run(config: &AppConfig) -> Result<RunOutcome> {
    let started = Instant::now();
    let root = config.root.as_deref().ok_or(ConfigError::MissingRoot)?;

    tracing::info!(root = %root.display(), "Scan starting");

    let (files, mut warnings) = discovery::discover_files(root, &config.discovery)?;
    tracing::info!(files = files.len(), "Log files discovered");

    let (patterns, pattern_errors) = PatternSet::compile(&config.events);
    warnings.extend(pattern_errors.iter().map(ToString::to_string));

    let extraction = extract_from_files(&files, &patterns);
    warnings.extend(extraction.errors.iter().map(ToString::to_string));

    let timeline = timeline::build_timeline(&extraction.data, &config.events, &config.timeline)?;
    warnings.extend(timeline.skipped.iter().map(ToString::to_string));

    let summary = RunSummary {
        files_discovered: files.len(),
        files_unreadable: extraction.files_unreadable,
        lines_scanned: extraction.lines_scanned,
        matches_by_kind: config
            .events
            .iter()
            .map(|k| (k.name.clone(), extraction.data.count(&k.name)))
            .collect(),
        events: timeline.rows.len(),
        timestamps_skipped: timeline.skipped.len(),
    };

    tracing::info!(
        files = summary.files_discovered,
        unreadable = summary.files_unreadable,
        lines = summary.lines_scanned,
        matches = extraction.data.total(),
        events = summary.events,
        skipped = summary.timestamps_skipped,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Run complete"
    );

    Ok(RunOutcome {
        rows: timeline.rows,
        summary,
        warnings,
    })
}

/// Read each file in order and extract every kind's timestamps.
///
/// A file that cannot be read is logged, recorded, and contributes no lines.
pub fn extract_from_files(files: &[LogFile], patterns: &PatternSet) -> Extraction {
    let mut data = patterns.empty_data();
    let mut errors = Vec::new();
    let mut lines_scanned: u64 = 0;
    let mut files_unreadable = 0usize;

    for file in files {
        let content = match fs::read_file_lossy(&file.path) {
            Ok(c) => c,
            Err(e) => {
                let err = ExtractError::Io {
                    file: file.path.clone(),
                    source: e,
                };
                tracing::error!(error = %err, "Treating unreadable file as empty");
                errors.push(err);
                files_unreadable += 1;
                continue;
            }
        };

        let before = data.total();
        lines_scanned += extract::extract_from_content(&content, &file.path, patterns, &mut data);
        tracing::debug!(
            file = %file.path.display(),
            size = file.size,
            matches = data.total() - before,
            "File extracted"
        );
    }

    Extraction {
        data,
        errors,
        lines_scanned,
        files_unreadable,
    }
}
