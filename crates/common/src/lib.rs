/**
 * Username -> password hash store.
 *  Persisted as a single flat TOML file,
 *  hashed with Argon2id.
 */
pub mod credentials;
/**
 * Flat directory of documents.
 *  File names double as identifiers and,
 *  through their extension, as the document type.
 */
pub mod documents;
/**
 * Turns document content into something
 *  we can send to a reader: plain text or
 *  markdown rendered to HTML.
 */
pub mod render;

pub mod prelude {
    pub use crate::credentials::{CredentialError, CredentialStore};
    pub use crate::documents::{
        Document, DocumentError, DocumentKind, DocumentName, DocumentStore,
    };
    pub use crate::render::{markdown_to_html, render, Rendered};
}
