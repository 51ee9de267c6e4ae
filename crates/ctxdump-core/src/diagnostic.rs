//! Diagnostic codes and failure reporting
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Traversal (1xxx)
    /// Enumerating the properties of a type failed; its expansion was skipped
    ReflectionFailure,

    // Metadata mapping (2xxx)
    /// An entity exposes neither a table nor a view name
    MetadataIntegrity,

    // Export (3xxx)
    /// No live collection is declared for a mapped table
    CollectionNotFound,

    /// The data source failed to materialize a collection
    CollectionLoadFailure,

    /// A collection could not be encoded as JSON
    SerializationFailure,

    /// The sink rejected an artifact
    SinkWriteFailure,

    // Loading (4xxx)
    /// A previously written dump could not be found or decoded
    DeserializationFailure,

    /// Two tables share a display name, so one artifact replaced the other
    DuplicateArtifactName,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReflectionFailure => "REFLECTION_FAILURE",
            Self::MetadataIntegrity => "METADATA_INTEGRITY",
            Self::CollectionNotFound => "COLLECTION_NOT_FOUND",
            Self::CollectionLoadFailure => "COLLECTION_LOAD_FAILURE",
            Self::SerializationFailure => "SERIALIZATION_FAILURE",
            Self::SinkWriteFailure => "SINK_WRITE_FAILURE",
            Self::DeserializationFailure => "DESERIALIZATION_FAILURE",
            Self::DuplicateArtifactName => "DUPLICATE_ARTIFACT_NAME",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - recoverable, the operation continued
    Warn,

    /// Error - the item (or operation) was not produced
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// What the diagnostic is about (type name, table name, artifact name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            subject: None,
        }
    }

    /// Set the subject
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.subject {
            Some(subject) => write!(f, "[{}] {}: {}", self.code, subject, self.message),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}
