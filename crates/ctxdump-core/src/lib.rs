//! ctxdump Core
//!
//! Core domain model shared by the traversal engine, the catalog and the exporter:
//! the type model, the live object graph, the Server/Database/Table/Column
//! hierarchy, diagnostics, export reports and configuration.
//! Never rename diagnostic codes - they are part of the public API.

pub mod diagnostic;
pub mod types;
pub mod object;
pub mod metadata;
pub mod report;
pub mod config;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use types::{TypeHandle, TypeKind, TypeDescriptor, PropertyDescriptor, ResolvedProperty, TypeRegistry, ModelError};
pub use object::{ObjectId, ObjectGraph, ObjectRecord, Field, FieldValue};
pub use metadata::{Server, Database, Table, Column, TableKind, DatabaseId, TableId};
pub use report::{ExportReport, ExportSummary, ReportVersion};
pub use config::{Config, IncludeConfig, ExportConfig, ConfigError};
