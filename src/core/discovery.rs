// JobTimeline - core/discovery.rs
//
// Recursive directory traversal and job log file discovery.
//
// Architecture note: this module uses `walkdir` for directory traversal as an
// OS abstraction. It reads only file *metadata*, never file *contents* --
// reading is owned by the app layer (app::pipeline).
//
// Error policy:
//   - An unusable root (missing, not a directory, access denied) is fatal.
//   - Per-entry I/O errors below the root are non-fatal and collected as
//     warnings; the walk continues with the next entry.
//   - Exclude patterns short-circuit directory descent via filter_entry so
//     excluded subtrees are never traversed at all.

use crate::core::model::LogFile;
use crate::util::constants;
use crate::util::error::DiscoveryError;
use regex::Regex;
use std::path::Path;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a discovery operation.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Maximum directory recursion depth. `None` descends into every
    /// subdirectory.
    pub max_depth: Option<usize>,

    /// Regex matched against each file's base name, anchored at the start
    /// of the name (the match must begin at offset 0) but not at the end.
    pub filename_pattern: String,

    /// Glob patterns matched against filenames AND directory component names.
    /// Matching files are skipped; matching directories are not descended into.
    pub exclude_patterns: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            filename_pattern: constants::DEFAULT_FILENAME_PATTERN.to_string(),
            exclude_patterns: Vec::new(),
        }
    }
}

// =============================================================================
// Discovery
// =============================================================================

/// Discover job log files under `root` whose names match the filename pattern.
///
/// Files are returned in traversal order; entries within a directory are
/// visited sorted by name so repeated runs list files identically.
///
/// # Non-fatal errors
/// Files/directories that cannot be accessed are recorded as human-readable
/// strings in the returned warnings vector and are skipped.
///
/// # Fatal errors
/// Returns `Err` if the filename pattern does not compile or the root path
/// is unusable.
pub fn discover_files(
    root: &Path,
    config: &DiscoveryConfig,
) -> Result<(Vec<LogFile>, Vec<String>), DiscoveryError> {
    let filename_re =
        Regex::new(&config.filename_pattern).map_err(|e| DiscoveryError::InvalidFilenamePattern {
            pattern: config.filename_pattern.clone(),
            source: e,
        })?;

    // `fs::metadata()` rather than `Path::is_dir()`: the latter maps every
    // error, PermissionDenied included, to `false`.
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(DiscoveryError::NotADirectory {
                path: root.to_path_buf(),
            });
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(DiscoveryError::PermissionDenied {
                path: root.to_path_buf(),
                source: e,
            });
        }
        Err(_) => {
            return Err(DiscoveryError::RootNotFound {
                path: root.to_path_buf(),
            });
        }
    }

    tracing::debug!(
        root = %root.display(),
        max_depth = ?config.max_depth,
        filename_pattern = %config.filename_pattern,
        exclude = ?config.exclude_patterns,
        "Discovery starting"
    );

    let exclude_pats = compile_patterns(&config.exclude_patterns);

    let mut files: Vec<LogFile> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let mut walk = walkdir::WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name();
    if let Some(depth) = config.max_depth {
        walk = walk.max_depth(depth);
    }

    let walker = walk
        .into_iter()
        .filter_entry(|e| {
            if e.file_type().is_dir() {
                // Always allow the root itself
                if e.depth() == 0 {
                    return true;
                }
                let name = e.file_name().to_str().unwrap_or("");
                return !is_excluded_component(name, &exclude_pats);
            }
            true
        });

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                let path_str = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                let msg = format!("Cannot access '{path_str}': {e}");
                tracing::warn!(warning = %msg, "Skipping inaccessible entry");
                warnings.push(msg);
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();

        // Links are not followed, so a symlinked directory arrives here with a
        // non-directory file type. It is neither a file nor descended into.
        if entry.path_is_symlink() && std::fs::metadata(path).is_ok_and(|m| m.is_dir()) {
            tracing::trace!(path = %path.display(), "Skipping directory symlink");
            continue;
        }

        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => {
                warnings.push(format!("Skipping '{}': non-UTF-8 filename", path.display()));
                continue;
            }
        };

        if is_excluded_filename(file_name, &exclude_pats) {
            tracing::trace!(file = file_name, "Excluded by pattern");
            continue;
        }

        if !matches_filename(&filename_re, file_name) {
            tracing::trace!(file = file_name, "Not matched by filename pattern");
            continue;
        }

        let size = match entry.metadata() {
            Ok(m) => m.len(),
            Err(e) => {
                let msg = format!("Cannot read metadata for '{}': {e}", path.display());
                tracing::warn!(warning = %msg, "Skipping inaccessible entry");
                warnings.push(msg);
                continue;
            }
        };

        tracing::trace!(file = %path.display(), size, "Log file accepted");
        files.push(LogFile {
            path: path.to_path_buf(),
            size,
        });
    }

    tracing::debug!(
        files = files.len(),
        warnings = warnings.len(),
        "Discovery complete"
    );

    Ok((files, warnings))
}

/// True when `re` matches `file_name` starting at its first character.
///
/// The leftmost match starts at 0 whenever any match at 0 exists, so this
/// is a start-anchored match without rewriting the user's pattern.
pub fn matches_filename(re: &Regex, file_name: &str) -> bool {
    re.find(file_name).is_some_and(|m| m.start() == 0)
}

// =============================================================================
// Glob helpers
// =============================================================================

/// Compile exclude glob patterns. Patterns that fail to compile are logged
/// and skipped.
fn compile_patterns(patterns: &[String]) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                tracing::warn!(pattern = p, error = %e, "Invalid exclude pattern, skipping");
                None
            }
        })
        .collect()
}

/// Returns true if `dir_name` matches any exclude pattern that contains no
/// wildcard characters (directory component exclusions such as ".git").
fn is_excluded_component(dir_name: &str, exclude_pats: &[glob::Pattern]) -> bool {
    exclude_pats.iter().any(|p| {
        let s = p.as_str();
        !s.contains('*') && !s.contains('?') && !s.contains('[') && p.matches(dir_name)
    })
}

/// Returns true if `file_name` matches any exclude pattern (wildcard or literal).
fn is_excluded_filename(file_name: &str, exclude_pats: &[glob::Pattern]) -> bool {
    exclude_pats.iter().any(|p| p.matches(file_name))
}

// =============================================================================
// Tests
// =============================================================================
