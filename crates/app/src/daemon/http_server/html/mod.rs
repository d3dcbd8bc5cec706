use axum::routing::{get, post};
use axum::Router;
use common::prelude::{DocumentError, DocumentName};

mod delete;
mod documents;
mod editor;
mod index;
mod users;
mod viewer;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", get(index::handler))
        .route("/new", get(documents::new_form))
        .route("/create", post(documents::create))
        .route("/copy", post(documents::copy))
        .route("/users/signin", get(users::signin_form).post(users::signin))
        .route("/users/signup", get(users::signup_form).post(users::signup))
        .route("/users/signout", post(users::signout))
        .route("/:filename", get(viewer::handler).post(editor::save))
        .route("/:filename/edit", get(editor::edit_form))
        .route("/:filename/copy", get(documents::copy_form))
        .route("/:filename/delete", post(delete::handler))
        .with_state(state)
}

/// Parse a name that must refer to an existing document.
/// A name that can't be valid can't exist either.
fn existing_name(raw: &str) -> Result<DocumentName, DocumentError> {
    DocumentName::parse(raw).map_err(|_| DocumentError::NotFound(raw.to_string()))
}
