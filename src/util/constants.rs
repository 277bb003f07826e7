// JobTimeline - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "JobTimeline";

/// Application identifier used for the config directory.
pub const APP_ID: &str = "JobTimeline";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Discovery
// =============================================================================

/// Filename pattern used when neither the CLI nor config.toml sets one.
/// Matched against the base filename, anchored at the start.
pub const DEFAULT_FILENAME_PATTERN: &str = ".*Task.*";

/// Upper bound accepted for an explicit `max_depth` (config or CLI).
/// Discovery itself is unbounded unless a depth is set.
pub const ABSOLUTE_MAX_DEPTH: usize = 128;

// =============================================================================
// Extraction
// =============================================================================

/// Maximum regex pattern length accepted for an event kind.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4_096;

/// Bracketed `DD.MM.YYYY HH:MM:SS.mmm` prefix shared by the built-in event
/// patterns. Capture group 1 is the timestamp.
pub const TIMESTAMP_CAPTURE: &str = r"\[(\d{2}\.\d{2}\.\d{4} \d{2}:\d{2}:\d{2}\.\d{3})\]";

// =============================================================================
// Timeline
// =============================================================================

/// chrono format used to parse extracted timestamps. `%.f` accepts any
/// fractional width and also accepts a value with no fraction at all
/// (`05.08.2024 10:00:00` parses as `10:00:00.000`).
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S%.f";

/// chrono format used to render timestamps in the report (fraction
/// truncated to milliseconds).
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S%.3f";

/// Flag attached to events on the first Monday of their month.
pub const FIRST_MONDAY_FLAG: &str = "First Monday";

/// Highest day-of-month a first Monday can fall on.
pub const FIRST_MONDAY_MAX_DAY: u32 = 7;

// =============================================================================
// Logging
// =============================================================================

/// Default log level. stdout carries the report, so the default keeps
/// stderr quiet unless something goes wrong.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Recognised `[logging] level` values.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
