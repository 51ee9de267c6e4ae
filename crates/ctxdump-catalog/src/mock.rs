//! Mock data source for testing
//!
//! This source serves a [`Snapshot`] from memory and can be told to fail
//! specific collections. It's useful for:
//! - Unit testing the exporter's failure isolation
//! - Demos without a snapshot file
//! - Simulating slow sources
//!
//! ## Simulating Failures
//!
//! ```rust,ignore
//! let source = MockDataSourceBuilder::new(snapshot)
//!     .with_error("Orders", SourceError::LoadFailed {
//!         collection: "Orders".into(),
//!         reason: "lazy loading disposed".into(),
//!     })
//!     .with_latency(10)
//!     .build();
//! ```

use crate::snapshot::Snapshot;
use crate::source::{CollectionInfo, ConnectionDescriptor, DataSource, EntityMetadata, SourceError};
use ctxdump_core::{ObjectGraph, ObjectId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Mock data source for testing
pub struct MockDataSource {
    /// Served state
    snapshot: Snapshot,

    /// Errors to return for specific collections
    errors: Arc<RwLock<HashMap<String, SourceError>>>,

    /// Simulate load latency (milliseconds)
    latency_ms: u64,

    /// Name to return from name() method
    source_name: &'static str,
}

impl MockDataSource {
    /// Create a mock source serving a snapshot
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            errors: Arc::new(RwLock::new(HashMap::new())),
            latency_ms: 0,
            source_name: "Mock",
        }
    }

    /// Configure an error to be returned for a specific collection
    pub async fn add_error_for_collection(&self, collection: &str, error: SourceError) {
        self.errors.write().await.insert(collection.to_string(), error);
    }

    /// Clear all configured errors
    pub async fn clear_errors(&self) {
        self.errors.write().await.clear();
    }

    /// Configure simulated latency for collection loads
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Set a custom source name
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.source_name = name;
        self
    }

    /// Simulate latency if configured
    async fn simulate_latency(&self) {
        if self.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;
        }
    }
}

impl Clone for MockDataSource {
    fn clone(&self) -> Self {
        Self {
            snapshot: self.snapshot.clone(),
            errors: Arc::clone(&self.errors),
            latency_ms: self.latency_ms,
            source_name: self.source_name,
        }
    }
}

#[async_trait::async_trait]
impl DataSource for MockDataSource {
    fn name(&self) -> &'static str {
        self.source_name
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
        self.simulate_latency().await;

        // Check for configured errors first
        if let Some(error) = self.errors.read().await.get(name) {
            return Err(error.clone());
        }

        self.snapshot.items(name)
    }
}

/// Builder for creating a MockDataSource with failures
pub struct MockDataSourceBuilder {
    snapshot: Snapshot,
    errors: HashMap<String, SourceError>,
    latency_ms: u64,
    source_name: &'static str,
}

impl MockDataSourceBuilder {
    /// Create a new builder
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            errors: HashMap::new(),
            latency_ms: 0,
            source_name: "Mock",
        }
    }

    /// Add an error for a specific collection
    pub fn with_error(mut self, collection: &str, error: SourceError) -> Self {
        self.errors.insert(collection.to_string(), error);
        self
    }

    /// Make a collection fail with a generic load error
    pub fn with_failing_collection(self, collection: &str) -> Self {
        let error = SourceError::LoadFailed {
            collection: collection.to_string(),
            reason: "Simulated load failure".to_string(),
        };
        self.with_error(collection, error)
    }

    /// Configure latency
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Set source name
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.source_name = name;
        self
    }

    /// Build the MockDataSource
    pub fn build(self) -> MockDataSource {
        MockDataSource {
            snapshot: self.snapshot,
            errors: Arc::new(RwLock::new(self.errors)),
            latency_ms: self.latency_ms,
            source_name: self.source_name,
        }
    }
}
