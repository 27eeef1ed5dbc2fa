use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, instrument, trace};

use crate::error::{DebugError, DebugResult};

/// A JSON file loaded from disk, with the raw text kept for diagnostics
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub source: String,
    pub value: serde_json::Value,
}

impl Document {
    /// Reads `path` fully and parses it as JSON
    #[instrument(fields(path = %path.display()))]
    pub fn load(path: &Path) -> DebugResult<Self> {
        trace!("Reading file contents");

        let source = fs::read_to_string(path).map_err(|source| {
            error!(error = %source, "Failed to read file");
            DebugError::ReadFile {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Self::parse(path, source)
    }

    /// Parses already-read contents, attributing errors to `path`
    #[instrument(skip(source), fields(path = %path.display(), content_len = source.len()))]
    pub fn parse(path: &Path, source: String) -> DebugResult<Self> {
        match serde_json::from_str(&source) {
            Ok(value) => {
                debug!("Successfully parsed JSON content");
                Ok(Self {
                    path: path.to_path_buf(),
                    source,
                    value,
                })
            }
            Err(e) => {
                error!(
                    line = e.line(),
                    column = e.column(),
                    error = %e,
                    "JSON parsing failed"
                );
                Err(DebugError::ParseJson {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_well_formed_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, r#"{{"name": "board"}}"#)?;

        let doc = Document::load(file.path())?;

        assert_eq!(doc.value["name"], "board");
        assert_eq!(doc.source, r#"{"name": "board"}"#);
        Ok(())
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = Document::load(Path::new("does/not/exist.json")).unwrap_err();

        assert!(matches!(err, DebugError::ReadFile { .. }));
        assert!(err.to_string().contains("does/not/exist.json"));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = Document::parse(Path::new("broken.json"), r#"{"name" "x"}"#.to_owned())
            .unwrap_err();

        match err {
            DebugError::ParseJson { path, source } => {
                assert_eq!(path, Path::new("broken.json"));
                assert_eq!(source.line(), 1);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
