//! Data source access and metadata mapping
//!
//! This crate provides the [`DataSource`] abstraction the exporter reads
//! from, two implementations of it, and the mapper that turns a source's
//! entity metadata into the Server/Database/Table/Column hierarchy.
//!
//! - [`SnapshotDataSource`] - a data source loaded from a JSON snapshot file
//! - [`MockDataSource`] - an in-memory data source with failure injection
//!
//! ## Example
//!
//! ```rust,ignore
//! use ctxdump_catalog::{MetadataMapper, SnapshotDataSource};
//!
//! let source = SnapshotDataSource::from_file(Path::new("shop.snapshot.json"))?;
//! let server = MetadataMapper::map_source(&source)?;
//! ```

pub mod source;
pub mod snapshot;
pub mod mock;
pub mod mapper;

pub use source::{DataSource, ConnectionDescriptor, EntityMetadata, PropertyMapping, CollectionInfo, SourceError};
pub use snapshot::{Snapshot, SnapshotCollection, SnapshotDataSource};
pub use mock::{MockDataSource, MockDataSourceBuilder};
pub use mapper::{MetadataMapper, MappingError};
