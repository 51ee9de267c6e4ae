//! Bulk export of a data source
//!
//! Every collection is loaded once, in declaration order. The whole-context
//! dump goes out first, under `<server>_<database>.json` and
//! `<context>.json`; then each mapped table is written as
//! `<display name>.json`. A failure affects only the artifact it happened
//! in and is recorded in the returned [`ExportReport`].
//!
//! Display names drop the namespace, so two tables can map to the same
//! artifact. The later write replaces the earlier one and is reported as
//! `DUPLICATE_ARTIFACT_NAME`.

use crate::serializer::{DepthBoundedJson, GraphSerializer, SerializeOptions};
use crate::sink::{sanitize_artifact_name, Sink};
use ctxdump_catalog::{CollectionInfo, DataSource, SourceError};
use ctxdump_core::{Diagnostic, DiagnosticCode, ExportReport, FieldValue, ObjectId, Server, Severity, Table};
use std::collections::{HashMap, HashSet};

/// Writes JSON dumps of a data source to a sink
pub struct BulkExporter {
    serializer: Box<dyn GraphSerializer>,
    options: SerializeOptions,
}

impl BulkExporter {
    /// Create an exporter using [`DepthBoundedJson`]
    pub fn new(options: SerializeOptions) -> Self {
        Self {
            serializer: Box::new(DepthBoundedJson),
            options,
        }
    }

    /// Replace the serializer
    pub fn with_serializer(mut self, serializer: Box<dyn GraphSerializer>) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn options(&self) -> &SerializeOptions {
        &self.options
    }

    /// Export `source` as described by the mapped `server`
    pub async fn export<S, K>(&self, source: &S, server: &Server, sink: &K) -> ExportReport
    where
        S: DataSource + ?Sized,
        K: Sink + ?Sized,
    {
        let mut report = ExportReport::new();
        report.summary.tables = server.tables().count();

        tracing::info!(
            source = source.name(),
            sink = sink.name(),
            tables = report.summary.tables,
            "starting export"
        );

        let collections = source.collections();
        let mut loaded = HashMap::new();
        for info in &collections {
            let result = source.load_collection(&info.name).await;
            loaded.insert(info.name.clone(), result);
        }

        let mut claimed = HashSet::new();
        self.export_aggregate(source, server, &collections, &loaded, sink, &mut claimed, &mut report)
            .await;

        for table in server.tables() {
            if self
                .export_table(source, table, &loaded, sink, &mut claimed, &mut report)
                .await
            {
                report.summary.tables_exported += 1;
            }
        }

        tracing::info!(
            artifacts = report.summary.artifacts,
            errors = report.summary.errors,
            warnings = report.summary.warnings,
            "export finished"
        );

        report
    }

    async fn export_aggregate<S, K>(
        &self,
        source: &S,
        server: &Server,
        collections: &[CollectionInfo],
        loaded: &HashMap<String, Result<Vec<ObjectId>, SourceError>>,
        sink: &K,
        claimed: &mut HashSet<String>,
        report: &mut ExportReport,
    ) where
        S: DataSource + ?Sized,
        K: Sink + ?Sized,
    {
        let mut lists = Vec::with_capacity(collections.len());
        for info in collections {
            match loaded.get(&info.name) {
                Some(Ok(ids)) => lists.push(FieldValue::references(ids.iter().copied())),
                Some(Err(e)) => {
                    tracing::warn!(collection = %info.name, error = %e, "collection left out of context dump");
                    report.add_diagnostic(
                        Diagnostic::new(
                            DiagnosticCode::CollectionLoadFailure,
                            Severity::Warn,
                            format!("Left out of the context dump: {}", e),
                        )
                        .with_subject(&info.name),
                    );
                }
                None => {}
            }
        }

        let mut names = Vec::new();
        if let Some(database) = server.databases.first() {
            names.push(format!("{}_{}.json", server.name, database.name));
        }
        names.push(format!("{}.json", source.context_name()));
        let names: Vec<String> = names.iter().map(|n| sanitize_artifact_name(n)).collect();
        claimed.extend(names.iter().cloned());

        let content = match self
            .serializer
            .serialize(source.objects(), &FieldValue::List(lists), &self.options)
        {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(error = %e, "context dump could not be serialized");
                for name in names {
                    report.add_diagnostic(
                        Diagnostic::new(DiagnosticCode::SerializationFailure, Severity::Error, e.to_string())
                            .with_subject(name),
                    );
                }
                return;
            }
        };

        for name in names {
            self.write(sink, &name, &content, report).await;
        }
    }

    /// Returns true when the table's artifact was written
    async fn export_table<S, K>(
        &self,
        source: &S,
        table: &Table,
        loaded: &HashMap<String, Result<Vec<ObjectId>, SourceError>>,
        sink: &K,
        claimed: &mut HashSet<String>,
        report: &mut ExportReport,
    ) -> bool
    where
        S: DataSource + ?Sized,
        K: Sink + ?Sized,
    {
        let Some(info) = source.collection_for_entity(&table.model_name) else {
            tracing::warn!(table = %table.name, entity = %table.model_name, "no collection for table");
            report.add_diagnostic(
                Diagnostic::new(
                    DiagnosticCode::CollectionNotFound,
                    Severity::Error,
                    format!("No collection holds entity '{}'", table.model_name),
                )
                .with_subject(&table.name),
            );
            return false;
        };

        let ids = match loaded.get(&info.name) {
            Some(Ok(ids)) => ids,
            Some(Err(e)) => {
                tracing::warn!(table = %table.name, collection = %info.name, error = %e, "collection load failed");
                report.add_diagnostic(
                    Diagnostic::new(DiagnosticCode::CollectionLoadFailure, Severity::Error, e.to_string())
                        .with_subject(&table.name),
                );
                return false;
            }
            None => {
                report.add_diagnostic(
                    Diagnostic::new(
                        DiagnosticCode::CollectionNotFound,
                        Severity::Error,
                        format!("Collection '{}' was not loaded", info.name),
                    )
                    .with_subject(&table.name),
                );
                return false;
            }
        };

        let value = FieldValue::references(ids.iter().copied());
        let content = match self.serializer.serialize(source.objects(), &value, &self.options) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(table = %table.name, error = %e, "table could not be serialized");
                report.add_diagnostic(
                    Diagnostic::new(DiagnosticCode::SerializationFailure, Severity::Error, e.to_string())
                        .with_subject(&table.name),
                );
                return false;
            }
        };

        let name = sanitize_artifact_name(&format!("{}.json", table.display_name()));
        if !claimed.insert(name.clone()) {
            tracing::warn!(table = %table.name, artifact = %name, "artifact name already used");
            report.add_diagnostic(
                Diagnostic::new(
                    DiagnosticCode::DuplicateArtifactName,
                    Severity::Warn,
                    format!("'{}' replaces an artifact written earlier in this export", name),
                )
                .with_subject(&table.name),
            );
        }
        self.write(sink, &name, &content, report).await
    }

    async fn write<K: Sink + ?Sized>(&self, sink: &K, name: &str, content: &str, report: &mut ExportReport) -> bool {
        match sink.write(name, content).await {
            Ok(()) => {
                tracing::info!(artifact = name, bytes = content.len(), "artifact written");
                report.add_artifact(name);
                true
            }
            Err(e) => {
                tracing::warn!(artifact = name, error = %e, "artifact write failed");
                report.add_diagnostic(
                    Diagnostic::new(DiagnosticCode::SinkWriteFailure, Severity::Error, e.to_string())
                        .with_subject(name),
                );
                false
            }
        }
    }
}

impl Default for BulkExporter {
    fn default() -> Self {
        Self::new(SerializeOptions::default())
    }
}
