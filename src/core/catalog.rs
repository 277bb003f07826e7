// JobTimeline - core/catalog.rs
//
// Event-kind catalog: the built-in backup job events and validation of
// user-declared `[[events]]` definitions from config.toml.
//
// Each kind carries its own pattern and role, so adding a kind is a single
// declaration; the extractor and the timeline both iterate the catalog.

use crate::core::model::{EventKind, EventRole};
use crate::util::constants::TIMESTAMP_CAPTURE;
use crate::util::error::ConfigError;
use serde::Deserialize;
use std::collections::HashSet;

/// Raw `[[events]]` table as deserialised from config.toml.
///
/// Exactly one of `label` (timeline kind) or `flag` (same-day kind) must be
/// set.
#[derive(Debug, Clone, Deserialize)]
pub struct EventDefinition {
    pub name: String,
    pub pattern: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub flag: Option<String>,
}

/// The built-in backup job event kinds, in canonical order.
pub fn builtin_event_kinds() -> Vec<EventKind> {
    let p = |suffix: &str| format!("{TIMESTAMP_CAPTURE}.*{suffix}");
    vec![
        EventKind::timeline("start", &p("Processing object"), "Start"),
        EventKind::timeline("finish", &p("has been completed, status"), "Finish"),
        EventKind::same_day("synth", &p("Creating synthetic full backup"), "Synth"),
        EventKind::same_day(
            "complete",
            &p("Synthetic full backup created successfully"),
            "Complete",
        ),
        EventKind::same_day(
            "retention",
            &p(r"\[RetentionAlgorithm\] Storages to delete"),
            "Retention",
        ),
    ]
}

/// Validate `[[events]]` definitions and turn them into event kinds,
/// preserving declaration order.
///
/// Patterns are not compiled here. A bad regex is reported by the extractor
/// and only silences its own kind.
pub fn validate_definitions(defs: Vec<EventDefinition>) -> Result<Vec<EventKind>, ConfigError> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kinds = Vec::with_capacity(defs.len());

    for def in defs {
        let name = def.name.trim().to_string();
        if name.is_empty() {
            return Err(ConfigError::InvalidEvent {
                name: "(empty)".to_string(),
                reason: "name must not be empty".to_string(),
            });
        }
        if !seen.insert(name.clone()) {
            return Err(ConfigError::DuplicateEvent { name });
        }
        if def.pattern.is_empty() {
            return Err(ConfigError::InvalidEvent {
                name,
                reason: "pattern must not be empty".to_string(),
            });
        }

        let role = match (def.label, def.flag) {
            (Some(label), None) if !label.is_empty() => EventRole::Timeline { label },
            (None, Some(flag)) if !flag.is_empty() => EventRole::SameDay { flag },
            (Some(_), Some(_)) => {
                return Err(ConfigError::InvalidEvent {
                    name,
                    reason: "set either 'label' or 'flag', not both".to_string(),
                });
            }
            _ => {
                return Err(ConfigError::InvalidEvent {
                    name,
                    reason: "needs a non-empty 'label' (timeline event) or 'flag' (same-day marker)"
                        .to_string(),
                });
            }
        };

        kinds.push(EventKind {
            name,
            pattern: def.pattern,
            role,
        });
    }

    tracing::debug!(count = kinds.len(), "Event definitions validated");
    Ok(kinds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn def(name: &str, label: Option<&str>, flag: Option<&str>) -> EventDefinition {
        EventDefinition {
            name: name.to_string(),
            pattern: r"\[(.+)\]".to_string(),
            label: label.map(str::to_string),
            flag: flag.map(str::to_string),
        }
    }

    #[test]
    fn test_builtin_kinds_order_and_roles() {
        let kinds = builtin_event_kinds();
        let names: Vec<_> = kinds.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, ["start", "finish", "synth", "complete", "retention"]);
        assert!(matches!(&kinds[0].role, EventRole::Timeline { label } if label == "Start"));
        assert!(matches!(&kinds[1].role, EventRole::Timeline { label } if label == "Finish"));
        assert!(matches!(&kinds[4].role, EventRole::SameDay { flag } if flag == "Retention"));
    }

    #[test]
    fn test_builtin_patterns_capture_timestamp() {
        let kinds = builtin_event_kinds();
        let line = "[14.08.2024 07:45:07.123] <01> Info [RetentionAlgorithm] Storages to delete: 2";
        let re = Regex::new(&kinds[4].pattern).unwrap();
        let caps = re.captures(line).expect("retention line should match");
        assert_eq!(&caps[1], "14.08.2024 07:45:07.123");

        let start = Regex::new(&kinds[0].pattern).unwrap();
        assert!(!start.is_match(line));
    }

    #[test]
    fn test_validate_preserves_order() {
        let kinds = validate_definitions(vec![
            def("b", Some("B"), None),
            def("a", None, Some("A")),
        ])
        .unwrap();
        assert_eq!(kinds[0].name, "b");
        assert_eq!(kinds[1].role, EventRole::SameDay { flag: "A".into() });
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let result = validate_definitions(vec![
            def("start", Some("Start"), None),
            def("start", None, Some("Again")),
        ]);
        assert!(matches!(result, Err(ConfigError::DuplicateEvent { name }) if name == "start"));
    }

    #[test]
    fn test_validate_rejects_both_or_neither_role() {
        assert!(matches!(
            validate_definitions(vec![def("x", Some("X"), Some("Y"))]),
            Err(ConfigError::InvalidEvent { .. })
        ));
        assert!(matches!(
            validate_definitions(vec![def("x", None, None)]),
            Err(ConfigError::InvalidEvent { .. })
        ));
        assert!(matches!(
            validate_definitions(vec![def("x", Some(""), None)]),
            Err(ConfigError::InvalidEvent { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_name_and_pattern() {
        assert!(matches!(
            validate_definitions(vec![def("  ", Some("X"), None)]),
            Err(ConfigError::InvalidEvent { .. })
        ));
        let mut d = def("x", Some("X"), None);
        d.pattern.clear();
        assert!(matches!(
            validate_definitions(vec![d]),
            Err(ConfigError::InvalidEvent { .. })
        ));
    }

    #[test]
    fn test_validate_does_not_compile_patterns() {
        let mut d = def("broken", Some("Broken"), None);
        d.pattern = "([unclosed".to_string();
        let kinds = validate_definitions(vec![d]).unwrap();
        assert_eq!(kinds[0].pattern, "([unclosed");
    }
}
