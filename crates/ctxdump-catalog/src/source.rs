//! Data source trait and the metadata it exposes

use ctxdump_core::{ObjectGraph, ObjectId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the server and database a source reads from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    /// Server / data source name
    pub data_source: String,

    /// Database name
    pub database: String,
}

impl ConnectionDescriptor {
    /// Create a new connection descriptor
    pub fn new(data_source: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            data_source: data_source.into(),
            database: database.into(),
        }
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.data_source, self.database)
    }
}

/// Mapping of one entity property to its physical column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMapping {
    /// Physical column name
    pub column_name: String,

    /// Logical property name
    pub property_name: String,
}

/// Metadata of one entity type
///
/// An entity maps to a table or a view, never both. An entity with neither
/// violates the source's metadata contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
    /// Physical table name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,

    /// Physical view name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_name: Option<String>,

    /// Logical entity name
    pub logical_name: String,

    /// Property to column mappings, in property order
    #[serde(default)]
    pub properties: Vec<PropertyMapping>,
}

impl EntityMetadata {
    /// Entity mapped to a table
    pub fn table(table_name: impl Into<String>, logical_name: impl Into<String>) -> Self {
        Self {
            table_name: Some(table_name.into()),
            view_name: None,
            logical_name: logical_name.into(),
            properties: Vec::new(),
        }
    }

    /// Entity mapped to a view
    pub fn view(view_name: impl Into<String>, logical_name: impl Into<String>) -> Self {
        Self {
            table_name: None,
            view_name: Some(view_name.into()),
            logical_name: logical_name.into(),
            properties: Vec::new(),
        }
    }

    /// Entity with no physical mapping
    pub fn unmapped(logical_name: impl Into<String>) -> Self {
        Self {
            table_name: None,
            view_name: None,
            logical_name: logical_name.into(),
            properties: Vec::new(),
        }
    }

    /// Append a property mapping
    pub fn with_column(mut self, column_name: impl Into<String>, property_name: impl Into<String>) -> Self {
        self.properties.push(PropertyMapping {
            column_name: column_name.into(),
            property_name: property_name.into(),
        });
        self
    }
}

/// A declared live collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    /// Declared collection name (e.g. `Orders`)
    pub name: String,

    /// Logical name of the entity it holds
    pub entity: String,
}

/// Errors that can occur when reading from a data source
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Failed to load collection '{collection}': {reason}")]
    LoadFailed { collection: String, reason: String },

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// A read-only source of entity metadata and live records
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    /// Get the source name (e.g., "Snapshot", "Mock")
    fn name(&self) -> &'static str;

    /// Server and database identification
    fn connection(&self) -> ConnectionDescriptor;

    /// Name of the in-memory context type the records belong to
    fn context_name(&self) -> &str;

    /// Entity metadata, in model order
    fn entity_types(&self) -> Vec<EntityMetadata>;

    /// Declared collections, in declaration order
    fn collections(&self) -> Vec<CollectionInfo>;

    /// The records every collection points into
    fn objects(&self) -> &ObjectGraph;

    /// Materialize a collection by its declared name
    async fn load_collection(&self, name: &str) -> Result<Vec<ObjectId>, SourceError>;

    /// First declared collection holding the given entity
    fn collection_for_entity(&self, logical_name: &str) -> Option<CollectionInfo> {
        self.collections()
            .into_iter()
            .find(|c| c.entity == logical_name)
    }
}
