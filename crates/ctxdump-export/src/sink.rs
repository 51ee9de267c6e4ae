//! Named-blob sinks for export artifacts

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Errors a sink can report for one artifact
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SinkError {
    #[error("IO error writing '{name}': {reason}")]
    IoError { name: String, reason: String },

    #[error("Write rejected for '{0}'")]
    Rejected(String),
}

/// Destination for export artifacts
#[async_trait::async_trait]
pub trait Sink: Send + Sync {
    /// Get the sink name (e.g., "Directory", "Memory")
    fn name(&self) -> &'static str;

    /// Store `content` under `name`, replacing any previous content
    async fn write(&self, name: &str, content: &str) -> Result<(), SinkError>;
}

/// Replace characters that are not valid in a file name with `_`
pub fn sanitize_artifact_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Writes each artifact as a file inside a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Create a sink writing into `root` (created on first write)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait::async_trait]
impl Sink for DirectorySink {
    fn name(&self) -> &'static str {
        "Directory"
    }

    async fn write(&self, name: &str, content: &str) -> Result<(), SinkError> {
        let io_error = |e: std::io::Error| SinkError::IoError {
            name: name.to_string(),
            reason: e.to_string(),
        };

        tokio::fs::create_dir_all(&self.root).await.map_err(io_error)?;
        tokio::fs::write(self.root.join(name), content)
            .await
            .map_err(io_error)?;

        tracing::debug!(artifact = name, root = %self.root.display(), "artifact written to disk");
        Ok(())
    }
}

/// Keeps artifacts in memory; names can be set up to fail
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    blobs: Arc<RwLock<BTreeMap<String, String>>>,
    failing: HashSet<String>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every write to `name`
    pub fn with_failure(mut self, name: impl Into<String>) -> Self {
        self.failing.insert(name.into());
        self
    }

    /// Content stored under `name`
    pub async fn get(&self, name: &str) -> Option<String> {
        self.blobs.read().await.get(name).cloned()
    }

    /// Stored names, sorted
    pub async fn names(&self) -> Vec<String> {
        self.blobs.read().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl Sink for MemorySink {
    fn name(&self) -> &'static str {
        "Memory"
    }

    async fn write(&self, name: &str, content: &str) -> Result<(), SinkError> {
        if self.failing.contains(name) {
            return Err(SinkError::Rejected(name.to_string()));
        }

        self.blobs
            .write()
            .await
            .insert(name.to_string(), content.to_string());
        Ok(())
    }
}
