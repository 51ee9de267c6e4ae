//! Snapshot-backed data source
//!
//! A snapshot is a JSON document holding everything a live source would
//! expose: the connection descriptor, the context name, entity metadata,
//! declared collections and the records they point into.
//!
//! ```json
//! {
//!   "connection": {"data_source": "localhost", "database": "shop"},
//!   "context_name": "ShopContext",
//!   "entities": [{"table_name": "Orders", "logical_name": "Shop.Order",
//!                 "properties": [{"column_name": "order_id", "property_name": "Id"}]}],
//!   "collections": [{"name": "Orders", "entity": "Shop.Order", "items": [0]}],
//!   "objects": [{"type": "Shop.Order", "fields": [{"name": "Id", "value": 1}]}]
//! }
//! ```

use crate::source::{CollectionInfo, ConnectionDescriptor, DataSource, EntityMetadata, SourceError};
use ctxdump_core::{ObjectGraph, ObjectId};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A declared collection and its members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotCollection {
    /// Declared collection name
    pub name: String,

    /// Logical entity name
    pub entity: String,

    /// Member records
    #[serde(default)]
    pub items: Vec<ObjectId>,
}

/// Serialized state of a data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Server and database
    pub connection: ConnectionDescriptor,

    /// Context type name
    pub context_name: String,

    /// Entity metadata
    #[serde(default)]
    pub entities: Vec<EntityMetadata>,

    /// Declared collections
    #[serde(default)]
    pub collections: Vec<SnapshotCollection>,

    /// Records
    #[serde(default)]
    pub objects: ObjectGraph,
}

impl Snapshot {
    /// Create an empty snapshot
    pub fn new(connection: ConnectionDescriptor, context_name: impl Into<String>) -> Self {
        Self {
            connection,
            context_name: context_name.into(),
            entities: Vec::new(),
            collections: Vec::new(),
            objects: ObjectGraph::new(),
        }
    }

    /// Add entity metadata
    pub fn with_entity(mut self, entity: EntityMetadata) -> Self {
        self.entities.push(entity);
        self
    }

    /// Declare a collection
    pub fn with_collection(
        mut self,
        name: impl Into<String>,
        entity: impl Into<String>,
        items: Vec<ObjectId>,
    ) -> Self {
        self.collections.push(SnapshotCollection {
            name: name.into(),
            entity: entity.into(),
            items,
        });
        self
    }

    /// Replace the record graph
    pub fn with_objects(mut self, objects: ObjectGraph) -> Self {
        self.objects = objects;
        self
    }

    /// Parse a snapshot from JSON
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        serde_json::from_str(json).map_err(|e| SourceError::ParseError(e.to_string()))
    }

    /// Load a snapshot from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SourceError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, SourceError> {
        serde_json::to_string_pretty(self).map_err(|e| SourceError::ParseError(e.to_string()))
    }

    pub(crate) fn collection_infos(&self) -> Vec<CollectionInfo> {
        self.collections
            .iter()
            .map(|c| CollectionInfo {
                name: c.name.clone(),
                entity: c.entity.clone(),
            })
            .collect()
    }

    pub(crate) fn items(&self, name: &str) -> Result<Vec<ObjectId>, SourceError> {
        self.collections
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.items.clone())
            .ok_or_else(|| SourceError::CollectionNotFound(name.to_string()))
    }
}

/// Data source reading from a [`Snapshot`]
#[derive(Debug, Clone)]
pub struct SnapshotDataSource {
    snapshot: Snapshot,
}

impl SnapshotDataSource {
    /// Wrap a snapshot
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot file
    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        let snapshot = Snapshot::from_file(path)?;
        tracing::debug!(
            path = %path.display(),
            entities = snapshot.entities.len(),
            collections = snapshot.collections.len(),
            objects = snapshot.objects.len(),
            "snapshot loaded"
        );
        Ok(Self::new(snapshot))
    }

    /// The underlying snapshot
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

#[async_trait::async_trait]
impl DataSource for SnapshotDataSource {
    fn name(&self) -> &'static str {
        "Snapshot"
    }

    fn connection(&self) -> ConnectionDescriptor {
        self.snapshot.connection.clone()
    }

    fn context_name(&self) -> &str {
        &self.snapshot.context_name
    }

    fn entity_types(&self) -> Vec<EntityMetadata> {
        self.snapshot.entities.clone()
    }

    fn collections(&self) -> Vec<CollectionInfo> {
        self.snapshot.collection_infos()
    }

    fn objects(&self) -> &ObjectGraph {
        &self.snapshot.objects
    }

    async fn load_collection(&self, name: &str) -> Result<Vec<ObjectId>, SourceError> {
        self.snapshot.items(name)
    }
}
