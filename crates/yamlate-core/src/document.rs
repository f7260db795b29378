//! Document model: structured key paths, flattening, and YAML persistence
//!
//! A document is a nested YAML mapping whose leaves are scalars. All three
//! yamlate operations work on the flattened projection of a document: an
//! ordered list of `(path, value)` pairs produced by a depth-first walk.
//!
//! Paths are kept structured (`KeyPath`, an ordered list of segments) and
//! only joined with `.` at serialization boundaries such as logs and
//! reports. This keeps the core free of the classic ambiguity where a key
//! that itself contains the separator corrupts a round trip; the dotted
//! form still carries that ambiguity, which is why [`KeyPath::parse`]
//! documents it as lossy.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// Ordered list of key segments identifying one leaf in a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// The empty path (the document root).
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from owned segments.
    pub fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Return a new path with one more segment appended.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// The path's segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Dot-joined form for display and reporting.
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }

    /// Parse a dotted path back into segments.
    ///
    /// Lossy when a key legitimately contains `.`: such keys split into
    /// multiple segments. Known limitation of the dotted form; structured
    /// paths never hit it.
    pub fn parse(dotted: &str) -> Self {
        Self {
            segments: dotted.split('.').map(str::to_string).collect(),
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}

/// One leaf of a flattened document.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry {
    pub path: KeyPath,
    pub value: Value,
}

/// Flatten a nested mapping into an ordered list of leaf entries.
///
/// Depth-first; sibling order follows the mapping's native insertion order.
/// Sequences and other non-mapping, non-scalar values are treated as opaque
/// leaves and not recursed into. A non-mapping input yields no entries.
pub fn flatten(doc: &Value) -> Vec<FlatEntry> {
    let mut entries = Vec::new();
    if let Value::Mapping(map) = doc {
        walk(map, &KeyPath::root(), &mut entries);
    }
    entries
}

fn walk(map: &Mapping, prefix: &KeyPath, out: &mut Vec<FlatEntry>) {
    for (key, value) in map {
        let path = prefix.child(key_to_string(key));
        match value {
            Value::Mapping(nested) => walk(nested, &path, out),
            leaf => out.push(FlatEntry {
                path,
                value: leaf.clone(),
            }),
        }
    }
}

/// Render a mapping key as a path segment. YAML allows non-string keys;
/// scalars are stringified, anything else falls back to its serialized form.
fn key_to_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Rebuild a nested mapping from flattened entries.
///
/// Inverse of [`flatten`] for separator-free keys. Duplicate paths resolve
/// last-write-wins; an intermediate node that already holds a scalar is
/// silently replaced by a mapping.
pub fn unflatten(entries: &[FlatEntry]) -> Value {
    let mut root = Mapping::new();
    for entry in entries {
        insert(&mut root, entry.path.segments(), &entry.value);
    }
    Value::Mapping(root)
}

fn insert(map: &mut Mapping, segments: &[String], value: &Value) {
    match segments {
        [] => {}
        [last] => {
            map.insert(Value::String(last.clone()), value.clone());
        }
        [head, rest @ ..] => {
            let node = map
                .entry(Value::String(head.clone()))
                .or_insert_with(|| Value::Mapping(Mapping::new()));
            if !node.is_mapping() {
                *node = Value::Mapping(Mapping::new());
            }
            if let Value::Mapping(nested) = node {
                insert(nested, rest, value);
            }
        }
    }
}

/// Load a YAML document from disk. Parse failures and non-mapping roots are
/// fatal: the caller gets no partial document to work with.
pub fn load_document(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|e| Error::DocumentLoad {
        message: format!("cannot read {}", path.display()),
        source: Some(anyhow::Error::new(e)),
    })?;
    let doc: Value = serde_yaml::from_str(&text).map_err(|e| Error::DocumentLoad {
        message: format!("cannot parse {}", path.display()),
        source: Some(anyhow::Error::new(e)),
    })?;
    if !doc.is_mapping() {
        return Err(Error::DocumentLoad {
            message: format!("{}: top-level value is not a mapping", path.display()),
            source: None,
        });
    }
    Ok(doc)
}

/// Write a document to disk, preserving key insertion order.
///
/// The document is serialized to a sibling temp file and renamed into
/// place, so a reader never observes a half-written checkpoint.
pub fn write_document(path: &Path, doc: &Value) -> Result<()> {
    let text = serde_yaml::to_string(doc)?;
    let tmp = temp_sibling(path);
    fs::write(&tmp, text)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn doc(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_flatten_nested() {
        let tree = doc("a:\n  b: x\n  c: 5\n");
        let entries = flatten(&tree);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path.dotted(), "a.b");
        assert_eq!(entries[0].value, Value::String("x".to_string()));
        assert_eq!(entries[1].path.dotted(), "a.c");
        assert_eq!(entries[1].value, Value::Number(5.into()));
    }

    #[test]
    fn test_unflatten_reproduces_tree() {
        let tree = doc("a:\n  b: x\n  c: 5\n");
        let entries = flatten(&tree);
        assert_eq!(unflatten(&entries), tree);
    }

    #[test]
    fn test_flatten_preserves_sibling_order() {
        let tree = doc("zebra: 1\nalpha: 2\nmid:\n  inner: 3\n");
        let paths: Vec<String> = flatten(&tree).iter().map(|e| e.path.dotted()).collect();
        assert_eq!(paths, vec!["zebra", "alpha", "mid.inner"]);
    }

    #[test]
    fn test_sequences_are_opaque_leaves() {
        let tree = doc("items:\n  - one\n  - two\n");
        let entries = flatten(&tree);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path.dotted(), "items");
        assert!(entries[0].value.is_sequence());
        assert_eq!(unflatten(&entries), tree);
    }

    #[test]
    fn test_non_mapping_root_flattens_empty() {
        assert!(flatten(&Value::String("scalar".to_string())).is_empty());
    }

    #[test]
    fn test_duplicate_path_last_write_wins() {
        let entries = vec![
            FlatEntry {
                path: KeyPath::parse("a.b"),
                value: Value::String("first".to_string()),
            },
            FlatEntry {
                path: KeyPath::parse("a.b"),
                value: Value::String("second".to_string()),
            },
        ];
        let tree = unflatten(&entries);
        assert_eq!(tree, doc("a:\n  b: second\n"));
    }

    #[test]
    fn test_scalar_intermediate_replaced_by_mapping() {
        let entries = vec![
            FlatEntry {
                path: KeyPath::parse("a"),
                value: Value::String("scalar".to_string()),
            },
            FlatEntry {
                path: KeyPath::parse("a.b"),
                value: Value::Number(1.into()),
            },
        ];
        let tree = unflatten(&entries);
        assert_eq!(tree, doc("a:\n  b: 1\n"));
    }

    #[test]
    fn test_keypath_display_and_parse() {
        let path = KeyPath::root().child("menu").child("title");
        assert_eq!(path.to_string(), "menu.title");
        assert_eq!(KeyPath::parse("menu.title"), path);
    }

    #[test]
    fn test_write_document_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.yml");
        let tree = doc("greeting: hello\nnested:\n  key: value\n");
        write_document(&path, &tree).unwrap();
        assert_eq!(load_document(&path).unwrap(), tree);
        // No temp file left behind
        assert!(!temp_sibling(&path).exists());
    }

    #[test]
    fn test_load_document_rejects_non_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scalar.yml");
        std::fs::write(&path, "just a string\n").unwrap();
        assert!(matches!(
            load_document(&path),
            Err(Error::DocumentLoad { .. })
        ));
    }

    fn tree_strategy() -> impl Strategy<Value = Value> {
        let key = "[a-z][a-z0-9_]{0,6}";
        let leaf = prop_oneof![
            "[ -~]{0,12}".prop_map(Value::String),
            any::<i64>().prop_map(|n| Value::Number(n.into())),
            any::<bool>().prop_map(Value::Bool),
        ];
        leaf.prop_recursive(3, 24, 4, move |inner| {
            prop::collection::btree_map(key, inner, 1..4).prop_map(|m| {
                Value::Mapping(
                    m.into_iter()
                        .map(|(k, v)| (Value::String(k), v))
                        .collect(),
                )
            })
        })
    }

    proptest! {
        #[test]
        fn prop_flatten_unflatten_round_trip(
            tree in prop::collection::btree_map("[a-z][a-z0-9_]{0,6}", tree_strategy(), 1..4)
                .prop_map(|m| Value::Mapping(
                    m.into_iter().map(|(k, v)| (Value::String(k), v)).collect(),
                ))
        ) {
            let entries = flatten(&tree);
            prop_assert_eq!(unflatten(&entries), tree);
        }
    }
}
