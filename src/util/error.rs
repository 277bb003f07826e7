// JobTimeline - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Fatal errors surface through `JobTimelineError`; `ExtractError` is
// non-fatal and collected alongside the run outcome.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for a report run.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum JobTimelineError {
    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// File discovery could not start.
    Discovery(DiscoveryError),

    /// An extracted timestamp could not be parsed.
    Timestamp(TimestampError),

    /// I/O error with path context (e.g. writing the report).
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for JobTimelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Timestamp(e) => write!(f, "Timestamp error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for JobTimelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Discovery(e) => Some(e),
            Self::Timestamp(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// An `[[events]]` definition is unusable.
    InvalidEvent { name: String, reason: String },

    /// Two `[[events]]` definitions share a name.
    DuplicateEvent { name: String },

    /// Neither the CLI nor config.toml named a directory to scan.
    MissingRoot,

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::InvalidEvent { name, reason } => {
                write!(f, "Event '{name}': {reason}")
            }
            Self::DuplicateEvent { name } => {
                write!(f, "Event '{name}' is defined more than once")
            }
            Self::MissingRoot => write!(
                f,
                "No directory to scan. Pass a PATH argument or set [scan] root in config.toml."
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for JobTimelineError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors that prevent file discovery from starting.
///
/// Per-entry traversal failures are not errors; they are collected as
/// warnings by `core::discovery`.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The root scan path does not exist or is not accessible.
    RootNotFound { path: PathBuf },

    /// The root path is not a directory.
    NotADirectory { path: PathBuf },

    /// Permission denied accessing the root path.
    PermissionDenied { path: PathBuf, source: io::Error },

    /// The filename pattern is not a valid regex.
    InvalidFilenamePattern {
        pattern: String,
        source: regex::Error,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Scan path '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Scan path '{}' is not a directory", path.display())
            }
            Self::PermissionDenied { path, source } => {
                write!(
                    f,
                    "Permission denied accessing '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidFilenamePattern { pattern, source } => {
                write!(f, "Invalid filename pattern '{pattern}': {source}")
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PermissionDenied { source, .. } => Some(source),
            Self::InvalidFilenamePattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for JobTimelineError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Extraction errors (non-fatal)
// ---------------------------------------------------------------------------

/// Problems met while extracting event timestamps. None of these stop a
/// run: the affected file reads as empty, or the affected event kind
/// contributes no matches.
#[derive(Debug)]
pub enum ExtractError {
    /// An event kind's pattern is not a valid regex.
    InvalidPattern {
        kind: String,
        pattern: String,
        source: regex::Error,
    },

    /// An event kind's pattern exceeds the maximum allowed length.
    PatternTooLong {
        kind: String,
        length: usize,
        max_length: usize,
    },

    /// An event kind's pattern has no capture group to take the timestamp from.
    MissingCaptureGroup { kind: String, pattern: String },

    /// A log file could not be read.
    Io { file: PathBuf, source: io::Error },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern {
                kind,
                pattern,
                source,
            } => write!(f, "Event '{kind}': invalid regex '{pattern}': {source}"),
            Self::PatternTooLong {
                kind,
                length,
                max_length,
            } => write!(
                f,
                "Event '{kind}': regex is {length} chars, exceeds maximum of {max_length}"
            ),
            Self::MissingCaptureGroup { kind, pattern } => write!(
                f,
                "Event '{kind}': regex '{pattern}' has no capture group for the timestamp"
            ),
            Self::Io { file, source } => {
                write!(f, "Error reading file '{}': {source}", file.display())
            }
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPattern { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Timestamp errors
// ---------------------------------------------------------------------------

/// An extracted timestamp string that does not fit the configured format.
#[derive(Debug, Clone)]
pub struct TimestampError {
    /// Event kind the value was extracted for.
    pub kind: String,
    /// File the value was extracted from.
    pub file: PathBuf,
    /// 1-based line number within `file`.
    pub line_number: u64,
    /// The raw captured text.
    pub raw_timestamp: String,
    /// chrono format the value was parsed with.
    pub format: String,
    /// chrono's description of the mismatch.
    pub reason: String,
}

impl fmt::Display for TimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' line {}: cannot parse {} timestamp '{}' with format '{}': {}",
            self.file.display(),
            self.line_number,
            self.kind,
            self.raw_timestamp,
            self.format,
            self.reason
        )
    }
}

impl std::error::Error for TimestampError {}

impl From<TimestampError> for JobTimelineError {
    fn from(e: TimestampError) -> Self {
        Self::Timestamp(e)
    }
}

/// Convenience type alias for JobTimeline results.
pub type Result<T> = std::result::Result<T, JobTimelineError>;
