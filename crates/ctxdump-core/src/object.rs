//! Live object graph
//!
//! Records are stored in an arena and reference each other by [`ObjectId`],
//! so shared and cyclic references are explicit and cheap to detect.

use serde::{Deserialize, Serialize};

/// Identity of a record in an [`ObjectGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Create an id from its arena position
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Arena position
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// A field value
///
/// In JSON, references are written as `{"@ref": <id>}`; every other variant
/// uses its natural JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Ref {
        #[serde(rename = "@ref")]
        target: ObjectId,
    },
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Reference to another record
    pub fn reference(target: ObjectId) -> Self {
        Self::Ref { target }
    }

    /// List of references
    pub fn references(targets: impl IntoIterator<Item = ObjectId>) -> Self {
        Self::List(targets.into_iter().map(Self::reference).collect())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<ObjectId> for FieldValue {
    fn from(value: ObjectId) -> Self {
        Self::reference(value)
    }
}

/// A named field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
}

/// A record with ordered fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Logical type name of the record
    #[serde(rename = "type")]
    pub type_name: String,

    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl ObjectRecord {
    /// Create a record with no fields
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Set a field, replacing an existing one with the same name
    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) {
        let value = value.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(Field {
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Get a field value
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }
}

/// Arena of records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectGraph {
    objects: Vec<ObjectRecord>,
}

impl ObjectGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record
    pub fn insert(&mut self, record: ObjectRecord) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(record);
        id
    }

    /// Get a record
    pub fn get(&self, id: ObjectId) -> Option<&ObjectRecord> {
        self.objects.get(id.index())
    }

    /// Get a record mutably (used to close reference cycles)
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut ObjectRecord> {
        self.objects.get_mut(id.index())
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the graph is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &ObjectRecord)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, r)| (ObjectId(i as u32), r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_references_by_id() {
        let mut graph = ObjectGraph::new();
        let customer = graph.insert(ObjectRecord::new("Shop.Customer").with_field("Name", "Ada"));
        let order = graph.insert(
            ObjectRecord::new("Shop.Order")
                .with_field("Id", 1i64)
                .with_field("Customer", customer),
        );
        graph
            .get_mut(customer)
            .unwrap()
            .set_field("Orders", FieldValue::references([order]));

        let customer_record = graph.get(customer).unwrap();
        assert_eq!(
            customer_record.field("Orders"),
            Some(&FieldValue::List(vec![FieldValue::reference(order)]))
        );
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn field_values_use_natural_json() {
        let record = ObjectRecord::new("T")
            .with_field("a", FieldValue::Null)
            .with_field("b", 3i64)
            .with_field("c", 1.5f64)
            .with_field("d", "x")
            .with_field("e", ObjectId::new(7));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["fields"][0]["value"], serde_json::Value::Null);
        assert_eq!(json["fields"][1]["value"], serde_json::json!(3));
        assert_eq!(json["fields"][4]["value"], serde_json::json!({"@ref": 7}));

        let parsed: ObjectRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }
}
