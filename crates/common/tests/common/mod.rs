//! Shared test utilities for store integration tests
#![allow(dead_code)]

use ::common::credentials::CredentialStore;
use ::common::documents::{DocumentName, DocumentStore};
use tempfile::TempDir;

/// Set up a document store rooted in a fresh temporary directory
pub async fn setup_document_store() -> (DocumentStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = DocumentStore::new(temp_dir.path().join("data"));
    store.init().await.unwrap();
    (store, temp_dir)
}

/// Set up an empty credential store in a fresh temporary directory
pub async fn setup_credential_store() -> (CredentialStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = CredentialStore::new(temp_dir.path().join("users.toml"));
    store.init().await.unwrap();
    (store, temp_dir)
}

pub fn name(raw: &str) -> DocumentName {
    DocumentName::parse(raw).unwrap()
}
