//! File-backed document storage
//!
//! A [`DocumentStore`] is a flat directory where each regular file is one
//! document. Every operation takes a [`DocumentName`], which has already been
//! checked to be a single path segment with a supported extension, so the
//! store never joins an unchecked string onto its root.
//!
//! Writes are plain overwrites: two concurrent saves of the same document
//! are last-writer-wins, and a save racing a delete may recreate the file.

use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::render::{render, Rendered};

mod name;

pub use name::{DocumentKind, DocumentName};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("A name is required")]
    EmptyName,
    #[error("That file name is not allowed")]
    InvalidName(String),
    #[error("That file type is not supported")]
    UnsupportedType(String),
    #[error("File name in use. Choose a new name.")]
    AlreadyExists(String),
    #[error("{0} does not exist.")]
    NotFound(String),
    #[error("document storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocumentError {
    /// Whether the error was caused by the caller's input rather than
    /// by the storage backend.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyName
                | Self::InvalidName(_)
                | Self::UnsupportedType(_)
                | Self::AlreadyExists(_)
        )
    }
}

/// A document loaded from the store.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: DocumentName,
    pub content: Vec<u8>,
}

impl Document {
    /// Content as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    pub fn render(&self) -> Rendered {
        render(&self.content, self.name.kind())
    }
}

#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage directory if it doesn't exist yet
    pub async fn init(&self) -> Result<(), DocumentError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    fn path_for(&self, name: &DocumentName) -> PathBuf {
        self.root.join(name.as_str())
    }

    /// List every document in the store, sorted by name.
    ///
    /// Files whose names are not valid document names (no supported
    /// extension, hidden files, ...) and sub-directories are skipped.
    pub async fn list(&self) -> Result<Vec<DocumentName>, DocumentError> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }

            let file_name = entry.file_name();
            let Some(raw) = file_name.to_str() else {
                tracing::debug!(name = ?file_name, "skipping non UTF-8 file name");
                continue;
            };

            match DocumentName::parse(raw) {
                Ok(name) => names.push(name),
                Err(e) => tracing::debug!(name = raw, "skipping file: {}", e),
            }
        }

        names.sort();
        Ok(names)
    }

    pub async fn exists(&self, name: &DocumentName) -> Result<bool, DocumentError> {
        Ok(tokio::fs::try_exists(self.path_for(name)).await?)
    }

    pub async fn read(&self, name: &DocumentName) -> Result<Document, DocumentError> {
        let content = tokio::fs::read(self.path_for(name))
            .await
            .map_err(|e| not_found_or_io(e, name))?;

        Ok(Document {
            name: name.clone(),
            content,
        })
    }

    /// Overwrite a document, creating it if it doesn't exist
    pub async fn write(&self, name: &DocumentName, content: &[u8]) -> Result<(), DocumentError> {
        tokio::fs::write(self.path_for(name), content).await?;
        tracing::debug!(name = %name, bytes = content.len(), "document written");
        Ok(())
    }

    /// Create a new empty document. Fails if the name is already in use.
    pub async fn create(&self, name: &DocumentName) -> Result<(), DocumentError> {
        self.create_with(name, &[]).await
    }

    /// Create `target` holding a copy of `source`'s content.
    pub async fn copy(
        &self,
        source: &DocumentName,
        target: &DocumentName,
    ) -> Result<(), DocumentError> {
        let document = self.read(source).await?;
        self.create_with(target, &document.content).await
    }

    pub async fn delete(&self, name: &DocumentName) -> Result<(), DocumentError> {
        tokio::fs::remove_file(self.path_for(name))
            .await
            .map_err(|e| not_found_or_io(e, name))?;
        tracing::debug!(name = %name, "document deleted");
        Ok(())
    }

    async fn create_with(&self, name: &DocumentName, content: &[u8]) -> Result<(), DocumentError> {
        // create_new makes the existence check and the creation a single step
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.path_for(name))
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => DocumentError::AlreadyExists(name.to_string()),
                _ => DocumentError::Io(e),
            })?;

        file.write_all(content).await?;
        file.flush().await?;
        tracing::debug!(name = %name, bytes = content.len(), "document created");
        Ok(())
    }
}

fn not_found_or_io(e: std::io::Error, name: &DocumentName) -> DocumentError {
    match e.kind() {
        ErrorKind::NotFound => DocumentError::NotFound(name.to_string()),
        _ => DocumentError::Io(e),
    }
}
