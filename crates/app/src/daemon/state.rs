use common::prelude::{CredentialError, CredentialStore, DocumentError, DocumentStore};

use super::config::Config;

/// Main service state, shared by every request handler
#[derive(Clone)]
pub struct State {
    documents: DocumentStore,
    credentials: CredentialStore,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        let documents = DocumentStore::new(&config.data_path);
        let credentials = CredentialStore::new(&config.credentials_path);
        Self::setup(documents, credentials).await
    }

    /// Make sure both stores exist on disk before serving from them
    pub async fn setup(
        documents: DocumentStore,
        credentials: CredentialStore,
    ) -> Result<Self, StateSetupError> {
        documents.init().await?;
        tracing::info!(path = %documents.root().display(), "document store ready");

        if credentials.init().await? {
            tracing::warn!(
                path = %credentials.path().display(),
                "no credential store found, created an empty one"
            );
        }
        tracing::info!(path = %credentials.path().display(), "credential store ready");

        Ok(Self {
            documents,
            credentials,
        })
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("document store setup error: {0}")]
    Documents(#[from] DocumentError),
    #[error("credential store setup error: {0}")]
    Credentials(#[from] CredentialError),
}
