// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::DestinationError;
use crate::traits::Destination;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

const JSON_LINES: &str = "json-lines";

/// Appends one JSON record per line to a local file.
pub struct FileDestination {
    path: PathBuf,
    file: Mutex<tokio::fs::File>,
}

impl FileDestination {
    /// Open (or create) `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DestinationError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(tokio::fs::File::from_std(file)),
        })
    }

    pub(crate) fn from_spec(spec: &Map<String, Value>) -> Result<Self, DestinationError> {
        let path = spec
            .get("path")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                DestinationError::InvalidSpec("file destination requires 'path'".to_string())
            })?;

        match spec.get("format").and_then(Value::as_str) {
            None | Some(JSON_LINES) => {}
            Some(other) => {
                return Err(DestinationError::InvalidSpec(format!(
                    "unsupported file format '{}'",
                    other
                )))
            }
        }

        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Destination for FileDestination {
    async fn send(&self, record: &Value) -> Result<(), DestinationError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = self.file.lock().await;
        file.write_all(&line).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), DestinationError> {
        let mut file = self.file.lock().await;
        file.flush().await?;
        file.sync_all().await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analytics.jsonl");
        std::fs::write(&path, "{\"existing\":true}\n").unwrap();

        let destination = FileDestination::open(&path).unwrap();
        destination.send(&json!({"objects": [{"label": "person"}]})).await.unwrap();
        destination.send(&json!({"objects": [{"label": "car"}]})).await.unwrap();
        destination.close().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2]["objects"][0]["label"], json!("car"));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let spec = json!({"type": "file", "path": dir.path().join("x"), "format": "csv"});

        let result = FileDestination::from_spec(spec.as_object().unwrap());
        assert!(matches!(result, Err(DestinationError::InvalidSpec(_))));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.jsonl");

        let result = FileDestination::open(path);
        assert!(matches!(result, Err(DestinationError::Io(_))));
    }
}
