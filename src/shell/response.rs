//! Shell Responses
//!
//! Defines the JSON objects written back for each command, one per line.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::map::ExpiryStats;

/// Outcome of a single shell command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    /// Result of `put`: the value the key held before
    Put {
        key: String,
        previous: Option<String>,
    },
    /// Result of a lookup
    Value { key: String, value: Option<String> },
    /// Result of a removal: the value that was removed
    Removed { key: String, value: Option<String> },
    Bool { value: bool },
    Count { value: usize },
    /// Keys in ascending order
    Keys { keys: Vec<String> },
    /// Values ordered by their keys
    Values { values: Vec<String> },
    Entries { entries: BTreeMap<String, String> },
    Ok { message: String },
    Stats {
        #[serde(flatten)]
        stats: ExpiryStats,
        hit_rate: f64,
    },
    Error { error: String },
}

impl Response {
    /// Creates an `ok` response with a message
    pub fn ok(message: impl Into<String>) -> Self {
        Response::Ok {
            message: message.into(),
        }
    }

    /// Creates an `error` response from anything displayable
    pub fn error(error: impl std::fmt::Display) -> Self {
        Response::Error {
            error: error.to_string(),
        }
    }

    /// Creates a `stats` response, computing the hit rate
    pub fn stats(stats: ExpiryStats) -> Self {
        let hit_rate = stats.hit_rate();
        Response::Stats { stats, hit_rate }
    }

    /// Collects borrowed pairs into a sorted `entries` response
    pub fn entries<'a>(pairs: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        let entries = pairs
            .into_iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Response::Entries { entries }
    }

    /// Collects borrowed keys into a sorted `keys` response
    pub fn keys<'a>(keys: impl IntoIterator<Item = &'a String>) -> Self {
        let mut keys: Vec<String> = keys.into_iter().cloned().collect();
        keys.sort();
        Response::Keys { keys }
    }

    /// Collects borrowed pairs into a `values` response ordered by key
    pub fn values<'a>(pairs: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        let sorted: BTreeMap<&String, &String> = pairs.into_iter().collect();
        let values = sorted.into_values().cloned().collect();
        Response::Values { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_response_serialize() {
        let response = Response::Value {
            key: "a".to_string(),
            value: Some("1".to_string()),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, json!({"kind": "value", "key": "a", "value": "1"}));
    }

    #[test]
    fn test_missing_value_serializes_as_null() {
        let response = Response::Removed {
            key: "a".to_string(),
            value: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["kind"], "removed");
        assert!(json["value"].is_null());
    }

    #[test]
    fn test_stats_response_flattens_counters() {
        let mut stats = ExpiryStats::new();
        stats.record_hit();
        stats.record_miss();

        let json = serde_json::to_value(Response::stats(stats)).unwrap();
        assert_eq!(json["kind"], "stats");
        assert_eq!(json["hits"], 1);
        assert_eq!(json["misses"], 1);
        assert_eq!(json["hit_rate"], 0.5);
    }

    #[test]
    fn test_keys_and_values_are_ordered() {
        let a = ("a".to_string(), "2".to_string());
        let b = ("b".to_string(), "1".to_string());
        let pairs = [(&b.0, &b.1), (&a.0, &a.1)];

        assert_eq!(
            Response::keys(pairs.iter().map(|(k, _)| *k)),
            Response::Keys {
                keys: vec!["a".to_string(), "b".to_string()]
            }
        );
        assert_eq!(
            Response::values(pairs),
            Response::Values {
                values: vec!["2".to_string(), "1".to_string()]
            }
        );
    }

    #[test]
    fn test_error_response() {
        let json = serde_json::to_value(Response::error("boom")).unwrap();
        assert_eq!(json, json!({"kind": "error", "error": "boom"}));
    }
}
