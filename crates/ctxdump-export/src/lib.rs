//! ctxdump export - depth-bounded JSON dumps of a data source
//!
//! This crate implements:
//! - Depth-bounded JSON encoding of object graphs, with reference preservation
//! - Named-blob sinks (directory on disk, in-memory)
//! - The bulk exporter writing one artifact per table plus whole-context dumps
//! - Loading a whole-context dump back
//! - Text layout of the mapped metadata for console output

pub mod serializer;
pub mod sink;
pub mod exporter;
pub mod loader;
pub mod layout;

pub use serializer::{GraphSerializer, DepthBoundedJson, SerializeOptions, SerializeError};
pub use sink::{Sink, DirectorySink, MemorySink, SinkError, sanitize_artifact_name};
pub use exporter::BulkExporter;
pub use loader::{ContextLoader, LoadedContext};
pub use layout::{metadata_rows, pad_rows, METADATA_HEADER};
