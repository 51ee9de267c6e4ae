//! Depth-bounded JSON encoding
//!
//! Depth is counted on records only: the records of a collection sit at
//! depth 1, a record they reference at depth 2, and so on. Lists do not add
//! depth. A record deeper than `max_depth` is cut off: it becomes a `$ref`
//! if it was already written (and references are preserved), `null`
//! otherwise.

use ctxdump_core::{ExportConfig, FieldValue, ObjectGraph, ObjectId};
use serde_json::{Map, Number, Value};
use std::collections::{HashMap, HashSet};

/// Encoding options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Deepest record level that is expanded
    pub max_depth: usize,

    /// Write `$id` on first occurrence and `$ref` afterwards
    pub preserve_references: bool,

    /// Indent the output
    pub pretty: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            max_depth: 1,
            preserve_references: true,
            pretty: true,
        }
    }
}

impl From<&ExportConfig> for SerializeOptions {
    fn from(config: &ExportConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            preserve_references: config.preserve_references,
            pretty: config.pretty,
        }
    }
}

/// Encoding errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SerializeError {
    #[error("Self referencing loop detected for record {0}")]
    ReferenceLoop(ObjectId),

    #[error("Reference to missing record {0}")]
    DanglingReference(ObjectId),

    #[error("Encoding failed: {0}")]
    Encoding(String),
}

/// Encodes a value of an object graph as a JSON document
pub trait GraphSerializer: Send + Sync {
    /// Encode `value`, resolving references through `graph`
    fn serialize(
        &self,
        graph: &ObjectGraph,
        value: &FieldValue,
        options: &SerializeOptions,
    ) -> Result<String, SerializeError>;
}

/// The default [`GraphSerializer`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthBoundedJson;

impl GraphSerializer for DepthBoundedJson {
    fn serialize(
        &self,
        graph: &ObjectGraph,
        value: &FieldValue,
        options: &SerializeOptions,
    ) -> Result<String, SerializeError> {
        let mut writer = Writer {
            graph,
            options,
            ids: HashMap::new(),
            on_path: HashSet::new(),
        };
        let json = writer.value(value, 0)?;

        let encoded = if options.pretty {
            serde_json::to_string_pretty(&json)
        } else {
            serde_json::to_string(&json)
        };
        encoded.map_err(|e| SerializeError::Encoding(e.to_string()))
    }
}

struct Writer<'a> {
    graph: &'a ObjectGraph,
    options: &'a SerializeOptions,
    /// `$id` assigned to each written record
    ids: HashMap<ObjectId, String>,
    /// Records currently being written (loop detection without `$ref`)
    on_path: HashSet<ObjectId>,
}

impl Writer<'_> {
    /// `depth` is the level of the enclosing record (0 outside any record)
    fn value(&mut self, value: &FieldValue, depth: usize) -> Result<Value, SerializeError> {
        Ok(match value {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Int(i) => Value::Number((*i).into()),
            FieldValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::List(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.value(item, depth))
                    .collect::<Result<_, _>>()?,
            ),
            FieldValue::Ref { target } => self.record(*target, depth + 1)?,
        })
    }

    fn record(&mut self, id: ObjectId, depth: usize) -> Result<Value, SerializeError> {
        let record = self.graph.get(id).ok_or(SerializeError::DanglingReference(id))?;

        if self.options.preserve_references {
            if let Some(existing) = self.ids.get(&id) {
                return Ok(reference(existing));
            }
        }

        if depth > self.options.max_depth {
            return Ok(Value::Null);
        }

        let mut map = Map::new();
        if self.options.preserve_references {
            let assigned = (self.ids.len() + 1).to_string();
            self.ids.insert(id, assigned.clone());
            map.insert("$id".to_string(), Value::String(assigned));
        } else if !self.on_path.insert(id) {
            return Err(SerializeError::ReferenceLoop(id));
        }

        for field in &record.fields {
            let value = self.value(&field.value, depth)?;
            map.insert(field.name.clone(), value);
        }

        self.on_path.remove(&id);
        Ok(Value::Object(map))
    }
}

fn reference(id: &str) -> Value {
    let mut map = Map::new();
    map.insert("$ref".to_string(), Value::String(id.to_string()));
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxdump_core::ObjectRecord;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// Customer <-> two orders
    fn graph() -> (ObjectGraph, ObjectId, ObjectId, ObjectId) {
        let mut graph = ObjectGraph::new();
        let customer = graph.insert(ObjectRecord::new("Shop.Customer").with_field("Name", "Ada"));
        let first = graph.insert(ObjectRecord::new("Shop.Order").with_field("Id", 1i64).with_field("Customer", customer));
        let second = graph.insert(ObjectRecord::new("Shop.Order").with_field("Id", 2i64).with_field("Customer", customer));
        graph
            .get_mut(customer)
            .unwrap()
            .set_field("Orders", FieldValue::references([first, second]));
        (graph, customer, first, second)
    }

    fn encode(graph: &ObjectGraph, value: &FieldValue, options: SerializeOptions) -> Value {
        let text = DepthBoundedJson.serialize(graph, value, &options).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn depth_one_cuts_nested_records() {
        let (graph, _, first, second) = graph();
        let value = FieldValue::references([first, second]);

        let json = encode(&graph, &value, SerializeOptions::default());
        assert_eq!(
            json,
            json!([
                {"$id": "1", "Id": 1, "Customer": null},
                {"$id": "2", "Id": 2, "Customer": null}
            ])
        );
    }

    #[test]
    fn cycles_become_references() {
        let (graph, customer, _, _) = graph();
        let options = SerializeOptions {
            max_depth: 10,
            ..SerializeOptions::default()
        };

        let json = encode(&graph, &FieldValue::reference(customer), options);
        assert_eq!(
            json,
            json!({
                "$id": "1",
                "Name": "Ada",
                "Orders": [
                    {"$id": "2", "Id": 1, "Customer": {"$ref": "1"}},
                    {"$id": "3", "Id": 2, "Customer": {"$ref": "1"}}
                ]
            })
        );
    }

    #[test]
    fn truncated_record_seen_before_is_a_reference() {
        let (graph, customer, first, _) = graph();
        // Customer is written at depth 1 first, then reached again at depth 2
        let value = FieldValue::List(vec![FieldValue::reference(customer), FieldValue::reference(first)]);

        let json = encode(&graph, &value, SerializeOptions::default());
        assert_eq!(json[1]["Customer"], json!({"$ref": "1"}));
        assert_eq!(json[0]["Orders"], json!([null, null]));
    }

    #[test]
    fn loop_without_references_is_an_error() {
        let (graph, customer, _, _) = graph();
        let options = SerializeOptions {
            max_depth: usize::MAX,
            preserve_references: false,
            pretty: false,
        };

        let err = DepthBoundedJson
            .serialize(&graph, &FieldValue::reference(customer), &options)
            .unwrap_err();
        assert_eq!(err, SerializeError::ReferenceLoop(customer));
    }

    #[test]
    fn shared_record_without_references_is_repeated() {
        let (graph, _, first, second) = graph();
        let options = SerializeOptions {
            max_depth: 2,
            preserve_references: false,
            pretty: false,
        };

        let json = encode(&graph, &FieldValue::references([first, second]), options);
        assert_eq!(json[0]["Customer"]["Name"], json!("Ada"));
        assert_eq!(json[1]["Customer"]["Name"], json!("Ada"));
        assert_eq!(json[0]["Customer"]["Orders"], json!([null, null]));
    }

    #[test]
    fn dangling_reference_is_an_error() {
        let (graph, _, _, _) = graph();
        let missing = ObjectId::new(99);

        let err = DepthBoundedJson
            .serialize(&graph, &FieldValue::references([missing]), &SerializeOptions::default())
            .unwrap_err();
        assert_eq!(err, SerializeError::DanglingReference(missing));
    }

    #[test]
    fn field_order_is_preserved() {
        let mut graph = ObjectGraph::new();
        let id = graph.insert(ObjectRecord::new("T").with_field("Zeta", 1i64).with_field("Alpha", 2i64));
        let options = SerializeOptions {
            pretty: false,
            ..SerializeOptions::default()
        };

        let text = DepthBoundedJson.serialize(&graph, &FieldValue::reference(id), &options).unwrap();
        assert_eq!(text, r#"{"$id":"1","Zeta":1,"Alpha":2}"#);
    }

    #[test]
    fn non_finite_floats_become_null() {
        let mut graph = ObjectGraph::new();
        let id = graph.insert(ObjectRecord::new("T").with_field("Ratio", f64::NAN));

        let json = encode(&graph, &FieldValue::reference(id), SerializeOptions::default());
        assert_eq!(json["Ratio"], Value::Null);
    }
}
