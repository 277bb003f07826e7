// JobTimeline - platform/config.rs
//
// Config directory resolution and config.toml loading with startup
// validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.
//
// Nothing here logs: config is loaded before the subscriber exists (the
// log level comes from this file). Problems are returned to the caller,
// which reports them once logging is up.

use crate::core::catalog::{self, EventDefinition};
use crate::core::discovery::DiscoveryConfig;
use crate::core::model::EventKind;
use crate::core::timeline::{InvalidTimestampPolicy, TimelineConfig};
use crate::util::constants;
use crate::util::error::ConfigError;
use chrono::format::{Item, StrftimeItems};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Location of the per-user config.toml, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", constants::APP_ID)
        .map(|dirs| dirs.config_dir().join(constants::CONFIG_FILE_NAME))
}

// =============================================================================
// config.toml shape
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[scan]` section.
    pub scan: ScanSection,
    /// `[timestamps]` section.
    pub timestamps: TimestampsSection,
    /// `[[events]]` tables. When present they replace the built-in catalog.
    pub events: Option<Vec<EventDefinition>>,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[scan]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ScanSection {
    /// Directory to scan.
    pub root: Option<String>,
    /// Regex matched against file names (anchored at the start).
    pub filename_pattern: Option<String>,
    /// Maximum directory recursion depth.
    pub max_depth: Option<usize>,
    /// Exclude glob patterns.
    pub exclude_patterns: Option<Vec<String>>,
}

/// `[timestamps]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct TimestampsSection {
    /// chrono format for parsing extracted timestamps.
    pub format: Option<String>,
    /// "abort" or "skip".
    pub on_invalid: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

// =============================================================================
// Validated configuration
// =============================================================================

/// Everything a report run needs, passed explicitly into the pipeline.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory to scan. Required by the time the pipeline runs.
    pub root: Option<PathBuf>,

    pub discovery: DiscoveryConfig,

    pub timeline: TimelineConfig,

    /// Event-kind catalog in declaration order.
    pub events: Vec<EventKind>,

    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root: None,
            discovery: DiscoveryConfig::default(),
            timeline: TimelineConfig::default(),
            events: catalog::builtin_event_kinds(),
            log_level: None,
        }
    }
}

/// Load and validate a config file that must exist.
///
/// Returns the validated config and a list of non-fatal warnings about
/// values that were ignored in favour of defaults.
pub fn load_config(path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_config(&content, path)
}

/// Load the per-user config.toml if there is one, defaults otherwise.
pub fn load_default_config() -> Result<(AppConfig, Vec<String>), ConfigError> {
    match default_config_path() {
        Some(path) if path.is_file() => load_config(&path),
        _ => Ok((AppConfig::default(), Vec::new())),
    }
}

/// Parse and validate config.toml content. `path` is used for messages only.
pub fn parse_config(content: &str, path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut warnings: Vec<String> = Vec::new();
    let mut config = AppConfig::default();

    // -- Scan --
    if let Some(root) = raw.scan.root.filter(|r| !r.trim().is_empty()) {
        config.root = Some(PathBuf::from(root));
    }

    if let Some(pattern) = raw.scan.filename_pattern {
        if pattern.is_empty() {
            warnings.push(format!(
                "[scan] filename_pattern is empty. Using default ({}).",
                constants::DEFAULT_FILENAME_PATTERN
            ));
        } else {
            config.discovery.filename_pattern = pattern;
        }
    }

    if let Some(depth) = raw.scan.max_depth {
        if (1..=constants::ABSOLUTE_MAX_DEPTH).contains(&depth) {
            config.discovery.max_depth = Some(depth);
        } else {
            warnings.push(format!(
                "[scan] max_depth = {depth} is out of range (1-{}). Using default (unlimited).",
                constants::ABSOLUTE_MAX_DEPTH,
            ));
        }
    }

    if let Some(excludes) = raw.scan.exclude_patterns {
        config.discovery.exclude_patterns = excludes;
    }

    // -- Timestamps --
    if let Some(format) = raw.timestamps.format {
        if is_valid_strftime(&format) {
            config.timeline.timestamp_format = format;
        } else {
            warnings.push(format!(
                "[timestamps] format = \"{format}\" is not a valid chrono format. Using default ({}).",
                constants::DEFAULT_TIMESTAMP_FORMAT,
            ));
        }
    }

    if let Some(ref policy) = raw.timestamps.on_invalid {
        match policy.to_lowercase().as_str() {
            "abort" => config.timeline.on_invalid_timestamp = InvalidTimestampPolicy::Abort,
            "skip" => config.timeline.on_invalid_timestamp = InvalidTimestampPolicy::Skip,
            other => warnings.push(format!(
                "[timestamps] on_invalid = \"{other}\" is not recognised. \
                 Expected \"abort\" or \"skip\". Using default (abort).",
            )),
        }
    }

    // -- Events --
    if let Some(defs) = raw.events {
        if defs.is_empty() {
            warnings.push(
                "[[events]] is present but empty. Using the built-in event kinds.".to_string(),
            );
        } else {
            config.events = catalog::validate_definitions(defs)?;
        }
    }

    // -- Logging --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default ({}).",
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    Ok((config, warnings))
}

fn is_valid_strftime(format: &str) -> bool {
    !format.is_empty() && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}
