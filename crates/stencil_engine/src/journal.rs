//! The render-data journal.
//!
//! Templates rendered with a reserved `_index` key in their data get that
//! data snapshotted here, keyed by template name and index. The journal is
//! append-only for the process lifetime and is consumed only by the export
//! surface (client-side re-rendering); it never feeds back into rendering
//! decisions.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use stencil_common::TemplateName;

/// Data key that opts a render call into journaling.
pub const INDEX_KEY: &str = "_index";

/// Append-only map of template name to indexed data snapshots.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct RenderJournal {
    entries: BTreeMap<String, BTreeMap<String, Value>>,
}

impl RenderJournal {
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `data` under `(name, data["_index"])` when the index key is
    /// present and usable as a key (string, number, or bool).
    ///
    /// Returns whether a snapshot was recorded.
    pub fn record(&mut self, name: &TemplateName, data: &Value) -> bool {
        let Some(index) = data.as_object().and_then(|map| map.get(INDEX_KEY)) else {
            return false;
        };
        let key = match index {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return false,
        };
        self.entries
            .entry(name.to_string())
            .or_default()
            .insert(key, data.clone());
        true
    }

    /// Read-only view of the journal entries.
    pub fn entries(&self) -> &BTreeMap<String, BTreeMap<String, Value>> {
        &self.entries
    }

    /// Whether nothing has been journaled yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn name(s: &str) -> TemplateName {
        TemplateName::new(s).unwrap()
    }

    #[test]
    fn records_with_string_index() {
        let mut journal = RenderJournal::new();
        let data = json!({"_index": "row-1", "title": "first"});
        assert!(journal.record(&name("widgets/row"), &data));
        assert_eq!(journal.entries()["widgets/row"]["row-1"], data);
    }

    #[test]
    fn records_with_numeric_index() {
        let mut journal = RenderJournal::new();
        let data = json!({"_index": 3, "title": "third"});
        assert!(journal.record(&name("row"), &data));
        assert!(journal.entries()["row"].contains_key("3"));
    }

    #[test]
    fn skips_without_index() {
        let mut journal = RenderJournal::new();
        assert!(!journal.record(&name("row"), &json!({"title": "no index"})));
        assert!(journal.is_empty());
    }

    #[test]
    fn skips_null_index() {
        let mut journal = RenderJournal::new();
        assert!(!journal.record(&name("row"), &json!({"_index": null})));
        assert!(journal.is_empty());
    }

    #[test]
    fn skips_non_object_data() {
        let mut journal = RenderJournal::new();
        assert!(!journal.record(&name("row"), &json!("just a string")));
        assert!(journal.is_empty());
    }

    #[test]
    fn same_index_overwrites_snapshot() {
        let mut journal = RenderJournal::new();
        journal.record(&name("row"), &json!({"_index": 1, "v": "old"}));
        journal.record(&name("row"), &json!({"_index": 1, "v": "new"}));
        assert_eq!(journal.entries()["row"]["1"]["v"], "new");
    }

    #[test]
    fn indexes_accumulate_per_template() {
        let mut journal = RenderJournal::new();
        journal.record(&name("row"), &json!({"_index": 1}));
        journal.record(&name("row"), &json!({"_index": 2}));
        journal.record(&name("other"), &json!({"_index": 1}));
        assert_eq!(journal.entries()["row"].len(), 2);
        assert_eq!(journal.entries()["other"].len(), 1);
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut journal = RenderJournal::new();
        journal.record(&name("row"), &json!({"_index": "a", "x": 1}));
        let json = serde_json::to_value(&journal).unwrap();
        assert_eq!(json["row"]["a"]["x"], 1);
    }
}
