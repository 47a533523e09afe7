//! Document loading shared by the tree and validation pipelines.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::Document;
use crate::infrastructure::traits::FileSystem;

/// Reads and parses JSON documents through the filesystem boundary.
pub struct DocumentLoader {
    fs: Arc<dyn FileSystem>,
}

impl DocumentLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read the raw text of a document.
    pub fn read(&self, path: &Path) -> ApplicationResult<String> {
        debug!("read: path={}", path.display());
        self.fs
            .read_to_string(path)
            .with_path_context("read document", path)
    }

    /// Parse `content` as strict JSON.
    ///
    /// The parser error is kept as-is so its line and column reach the user.
    pub fn parse_strict(&self, path: &Path, content: &str) -> ApplicationResult<Value> {
        serde_json::from_str(content).map_err(|source| ApplicationError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read, strictly parse and decode a dataset document.
    pub fn load(&self, path: &Path) -> ApplicationResult<Document> {
        let content = self.read(path)?;
        let value = self.parse_strict(path, &content)?;
        Ok(Document::from_value(&value)?)
    }
}
