//! Loading a whole-context dump back
//!
//! Absence is the only failure mode callers see: a missing file, an I/O
//! error and a malformed document all yield `None`, with the reason logged
//! at debug level.

use serde_json::Value;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A whole-context dump read from disk
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedContext {
    /// File the dump was read from
    pub source: PathBuf,

    /// One entry per collection, in declaration order
    pub collections: Vec<Vec<Value>>,
}

impl LoadedContext {
    /// Total number of top-level records
    pub fn record_count(&self) -> usize {
        self.collections.iter().map(Vec::len).sum()
    }
}

/// Finds and decodes `<context>.json` dumps
pub struct ContextLoader;

impl ContextLoader {
    /// Resolve the dump file: `path` itself, or `<context_name>.json`
    /// directly inside it when `path` is a directory
    pub fn locate(path: &Path, context_name: &str) -> Option<PathBuf> {
        if path.is_file() {
            return Some(path.to_path_buf());
        }

        if !path.is_dir() {
            return None;
        }

        let target = format!("{}.json", context_name);
        WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .find(|entry| entry.file_type().is_file() && entry.file_name() == target.as_str())
            .map(|entry| entry.into_path())
    }

    /// Load the dump for `context_name` from `path`
    pub fn load(path: &Path, context_name: &str) -> Option<LoadedContext> {
        let Some(file) = Self::locate(path, context_name) else {
            tracing::debug!(path = %path.display(), context = context_name, "no context dump found");
            return None;
        };

        let contents = match std::fs::read_to_string(&file) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!(file = %file.display(), error = %e, "context dump unreadable");
                return None;
            }
        };

        match serde_json::from_str::<Vec<Vec<Value>>>(&contents) {
            Ok(collections) => {
                tracing::debug!(file = %file.display(), collections = collections.len(), "context dump loaded");
                Some(LoadedContext {
                    source: file,
                    collections,
                })
            }
            Err(e) => {
                tracing::debug!(file = %file.display(), error = %e, "context dump malformed");
                None
            }
        }
    }
}
