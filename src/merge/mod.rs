use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

pub type MergeResult<T> = std::result::Result<T, MergeError>;

/// Which merge input a problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSide {
    Static,
    Dynamic,
}

impl fmt::Display for DocumentSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSide::Static => f.write_str("static"),
            DocumentSide::Dynamic => f.write_str("dynamic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("invalid {side} document: {reason}")]
    InvalidDocument { side: DocumentSide, reason: String },
}

/// Deep-merges `dynamic_doc` over a copy of `static_doc`.
///
/// Objects merge key by key; any other dynamic value (arrays included)
/// replaces the static value at that key. Static-only keys are kept.
pub fn merge_documents(static_doc: &Value, dynamic_doc: &Value) -> MergeResult<Value> {
    let base = require_object(static_doc, DocumentSide::Static)?;
    let overrides = require_object(dynamic_doc, DocumentSide::Dynamic)?;

    let mut merged = base.clone();
    merge_into(&mut merged, overrides);
    Ok(Value::Object(merged))
}

/// Parses both inputs before merging them.
pub fn merge_json_str(static_src: &str, dynamic_src: &str) -> MergeResult<Value> {
    let static_doc = parse_document(static_src, DocumentSide::Static)?;
    let dynamic_doc = parse_document(dynamic_src, DocumentSide::Dynamic)?;
    merge_documents(&static_doc, &dynamic_doc)
}

pub fn parse_document(serialized: &str, side: DocumentSide) -> MergeResult<Value> {
    let value: Value =
        serde_json::from_str(serialized).map_err(|err| MergeError::InvalidDocument {
            side,
            reason: err.to_string(),
        })?;
    require_object(&value, side)?;
    Ok(value)
}

fn require_object(value: &Value, side: DocumentSide) -> MergeResult<&Map<String, Value>> {
    value.as_object().ok_or_else(|| MergeError::InvalidDocument {
        side,
        reason: "document root is not an object".to_string(),
    })
}

fn merge_into(target: &mut Map<String, Value>, overrides: &Map<String, Value>) {
    for (key, value) in overrides {
        if let (Some(Value::Object(existing)), Value::Object(nested)) = (target.get_mut(key), value)
        {
            merge_into(existing, nested);
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn nested_objects_merge_with_dynamic_precedence() {
        let merged = merge_documents(&json!({ "a": { "b": 1, "c": 2 } }), &json!({ "a": { "b": 9 } }))
            .unwrap();
        assert_eq!(merged, json!({ "a": { "b": 9, "c": 2 } }));
    }

    #[test]
    fn arrays_are_replaced_not_concatenated() {
        let merged = merge_documents(&json!({ "x": [1, 2] }), &json!({ "x": [3] })).unwrap();
        assert_eq!(merged, json!({ "x": [3] }));
    }

    #[test]
    fn leaf_and_object_replace_each_other() {
        let merged = merge_documents(
            &json!({ "a": "leaf", "b": { "nested": true } }),
            &json!({ "a": { "now": "object" }, "b": 5 }),
        )
        .unwrap();
        assert_eq!(merged, json!({ "a": { "now": "object" }, "b": 5 }));
    }

    #[test]
    fn static_only_branches_survive_and_new_keys_append() {
        let static_doc = json!({
            "version": 3,
            "settings": { "appearanceTools": true, "layout": { "contentSize": "640px" } },
            "templateParts": [{ "name": "header" }]
        });
        let dynamic_doc = json!({
            "settings": { "layout": { "contentSize": "800px", "wideSize": "1200px" }, "custom": {} },
            "styles": { "elements": {} }
        });

        let merged = merge_documents(&static_doc, &dynamic_doc).unwrap();
        assert_eq!(
            merged,
            json!({
                "version": 3,
                "settings": {
                    "appearanceTools": true,
                    "layout": { "contentSize": "800px", "wideSize": "1200px" },
                    "custom": {}
                },
                "templateParts": [{ "name": "header" }],
                "styles": { "elements": {} }
            })
        );
        let keys: Vec<_> = merged.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["version", "settings", "templateParts", "styles"]);
    }

    #[test]
    fn static_input_is_left_untouched() {
        let static_doc = json!({ "a": { "b": 1 } });
        let snapshot = static_doc.clone();
        let merged = merge_documents(&static_doc, &json!({ "a": { "b": 2 } })).unwrap();
        assert_eq!(static_doc, snapshot);
        assert_ne!(merged, snapshot);
    }

    #[test]
    fn empty_static_base_yields_dynamic_document() {
        let dynamic_doc = json!({ "settings": { "custom": {} } });
        assert_eq!(merge_documents(&json!({}), &dynamic_doc).unwrap(), dynamic_doc);
    }

    #[test]
    fn non_object_inputs_are_invalid_documents() {
        let err = merge_documents(&json!([1]), &json!({})).unwrap_err();
        assert_eq!(
            err,
            MergeError::InvalidDocument {
                side: DocumentSide::Static,
                reason: "document root is not an object".to_string(),
            }
        );

        let err = merge_documents(&json!({}), &json!("text")).unwrap_err();
        assert!(matches!(
            err,
            MergeError::InvalidDocument {
                side: DocumentSide::Dynamic,
                ..
            }
        ));
    }

    #[test]
    fn unparseable_input_names_the_side() {
        let err = merge_json_str("{}", "{ invalid ").unwrap_err();
        assert!(err.to_string().starts_with("invalid dynamic document:"));
        assert_eq!(
            merge_json_str(r#"{"a":1}"#, r#"{"b":2}"#).unwrap(),
            json!({ "a": 1, "b": 2 })
        );
    }

    fn json_document() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i32>().prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::from),
        ];
        let tree = leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
                prop::collection::btree_map("[a-d]", inner, 0..4)
                    .prop_map(|map| Value::Object(map.into_iter().collect())),
            ]
        });
        prop::collection::btree_map("[a-f]", tree, 0..5)
            .prop_map(|map| Value::Object(map.into_iter().collect()))
    }

    proptest! {
        #[test]
        fn merging_a_document_with_itself_is_identity(doc in json_document()) {
            prop_assert_eq!(merge_documents(&doc, &doc).unwrap(), doc);
        }

        #[test]
        fn merging_into_empty_base_copies_dynamic(doc in json_document()) {
            prop_assert_eq!(merge_documents(&json!({}), &doc).unwrap(), doc);
        }
    }
}
