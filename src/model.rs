//! Core data types for the backlog manager.
//!
//! Same serde format as the original `tasks.json` documents so existing
//! store files remain readable: a top-level `issues` object mapping issue
//! name to issue, each issue holding a `tasks` object mapping task ID to
//! task. Both mappings preserve insertion order across load/save cycles.

use std::fmt;
use std::str::FromStr;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::BacklogError;

/// Lifecycle status, shared vocabulary for issues and tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Status {
    #[default]
    New,
    InWork,
    Done,
}

impl Status {
    /// All valid statuses, in the order they are reported to callers.
    pub const ALL: [Self; 3] = [Self::New, Self::InWork, Self::Done];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InWork => "InWork",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = BacklogError;

    /// Membership check only; there is no transition graph.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "New" => Ok(Self::New),
            "InWork" => Ok(Self::InWork),
            "Done" => Ok(Self::Done),
            other => Err(BacklogError::InvalidStatus {
                status: other.to_string(),
            }),
        }
    }
}

/// A unit of work belonging to exactly one issue.
///
/// Identified by a short generated ID, unique within its parent issue only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Title (non-empty).
    pub title: String,

    /// Detailed description (may be empty).
    #[serde(default)]
    pub description: String,

    /// Workflow status.
    #[serde(default)]
    pub status: Status,
}

/// A named unit of work containing zero or more tasks.
///
/// Identified by its name (the key in [`Store::issues`]), not a separate
/// ID field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Issue {
    /// Detailed description (may be empty).
    #[serde(default)]
    pub description: String,

    /// Workflow status. Absent in legacy documents; readers treat `None`
    /// as `New` without rewriting the stored field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    /// Tasks keyed by generated ID, in insertion order.
    #[serde(default)]
    pub tasks: OrderedMap<Task>,
}

impl Issue {
    /// Status as displayed, defaulting missing legacy values to `New`.
    #[must_use]
    pub fn display_status(&self) -> Status {
        self.status.unwrap_or_default()
    }
}

/// The full persisted backlog document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Store {
    /// Issues keyed by name, in insertion order. Always present, possibly
    /// empty; never null.
    #[serde(default)]
    pub issues: OrderedMap<Issue>,
}

/// Insertion-ordered string-keyed map serialized as a JSON object.
///
/// Listings report entries in insertion order and a load/save cycle must
/// not reorder the document, which `HashMap` cannot provide. Re-inserting
/// an existing key replaces the value in place, keeping its position.
///
/// Lookups are linear; backlog stores hold tens of entries, not thousands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Insert or replace. An existing key keeps its position; a new key
    /// appends at the end.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        if let Some(slot) = self.get_mut(&key) {
            *slot = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor<V>(std::marker::PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for MapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = OrderedMap {
                    entries: Vec::with_capacity(access.size_hint().unwrap_or(0)),
                };
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MapVisitor(std::marker::PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip_exact_spelling() {
        for status in Status::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            let back: Status = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        let err = "NotAStatus".parse::<Status>().unwrap_err();
        assert!(matches!(
            err,
            BacklogError::InvalidStatus { ref status } if status == "NotAStatus"
        ));
        // Case-sensitive: lowercase spellings are invalid too.
        assert!("new".parse::<Status>().is_err());
    }

    #[test]
    fn test_ordered_map_preserves_insertion_order() {
        let mut map = OrderedMap::new();
        map.insert("zebra", 1);
        map.insert("apple", 2);
        map.insert("mango", 3);

        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_ordered_map_replace_keeps_position() {
        let mut map = OrderedMap::new();
        map.insert("first", 1);
        map.insert("second", 2);
        map.insert("first", 10);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("first"), Some(&10));
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["first", "second"]);
    }

    #[test]
    fn test_ordered_map_json_object_roundtrip() {
        let mut map = OrderedMap::new();
        map.insert("b", "two".to_string());
        map.insert("a", "one".to_string());

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"b":"two","a":"one"}"#);

        let back: OrderedMap<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_issue_missing_status_survives_roundtrip() {
        let issue: Issue = serde_json::from_str(r#"{"description":"legacy","tasks":{}}"#).unwrap();
        assert_eq!(issue.status, None);
        assert_eq!(issue.display_status(), Status::New);

        // The absent field must stay absent when written back.
        let json = serde_json::to_string(&issue).unwrap();
        assert!(!json.contains("status"));
    }

    #[test]
    fn test_store_tolerates_empty_document() {
        let store: Store = serde_json::from_str(r#"{"issues":{}}"#).unwrap();
        assert!(store.issues.is_empty());
    }

    #[test]
    fn test_task_defaults() {
        let task: Task = serde_json::from_str(r#"{"title":"T"}"#).unwrap();
        assert_eq!(task.description, "");
        assert_eq!(task.status, Status::New);
    }
}
