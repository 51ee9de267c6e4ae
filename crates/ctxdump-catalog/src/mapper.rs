//! Entity metadata mapping
//!
//! Builds the Server -> Database -> Table -> Column hierarchy from a data
//! source's entity metadata. An entity with neither a table nor a view name
//! means the source's metadata is malformed; mapping stops there and no
//! hierarchy is returned.

use crate::source::{ConnectionDescriptor, DataSource, EntityMetadata};
use ctxdump_core::{DiagnosticCode, Server, TableKind};
use std::collections::HashSet;

/// Fatal metadata mapping errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("Entity '{entity}' is mapped to neither a table nor a view")]
    MissingTableOrView { entity: String },
}

impl MappingError {
    /// Stable diagnostic code for this failure
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Self::MissingTableOrView { .. } => DiagnosticCode::MetadataIntegrity,
        }
    }
}

/// Maps entity metadata onto the physical hierarchy
pub struct MetadataMapper;

fn non_empty(name: &Option<String>) -> Option<&str> {
    name.as_deref().filter(|n| !n.trim().is_empty())
}

impl MetadataMapper {
    /// Map everything a data source exposes
    pub fn map_source<S: DataSource + ?Sized>(source: &S) -> Result<Server, MappingError> {
        Self::map(&source.connection(), source.context_name(), &source.entity_types())
    }

    /// Map entity metadata into one server holding one database
    ///
    /// Entities are de-duplicated by logical name, first occurrence wins.
    pub fn map(
        connection: &ConnectionDescriptor,
        context_name: &str,
        entities: &[EntityMetadata],
    ) -> Result<Server, MappingError> {
        let mut server = Server::new(&connection.data_source);
        let database = server.add_database(&connection.database, context_name);
        let mut seen = HashSet::new();

        for entity in entities {
            if !seen.insert(entity.logical_name.as_str()) {
                tracing::debug!(entity = %entity.logical_name, "duplicate entity skipped");
                continue;
            }

            let (name, kind) = match (non_empty(&entity.table_name), non_empty(&entity.view_name)) {
                (Some(table), _) => (table, TableKind::Table),
                (None, Some(view)) => (view, TableKind::View),
                (None, None) => {
                    return Err(MappingError::MissingTableOrView {
                        entity: entity.logical_name.clone(),
                    })
                }
            };

            let Some(table) = server.add_table(database, name, &entity.logical_name, kind) else {
                continue;
            };

            for property in &entity.properties {
                server.add_column(table, &property.column_name, &property.property_name);
            }
        }

        tracing::info!(
            server = %server.name,
            database = %connection.database,
            tables = server.tables().count(),
            "metadata mapped"
        );

        Ok(server)
    }
}
