use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DebugError {
    /// File could not be read from disk
    #[error("Failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File contents are not well-formed JSON
    #[error("Failed to parse JSON in {}: {source}", path.display())]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The schema document itself is not a valid JSON Schema
    #[error("Invalid JSON schema in {}: {reason}", path.display())]
    InvalidSchema { path: PathBuf, reason: String },
}

pub type DebugResult<T> = Result<T, DebugError>;

impl DebugError {
    /// Path of the file the error relates to
    pub fn path(&self) -> &std::path::Path {
        match self {
            DebugError::ReadFile { path, .. }
            | DebugError::ParseJson { path, .. }
            | DebugError::InvalidSchema { path, .. } => path,
        }
    }

    /// Schema compilation problems, as opposed to I/O or syntax problems
    pub fn is_schema_error(&self) -> bool {
        matches!(self, DebugError::InvalidSchema { .. })
    }
}
