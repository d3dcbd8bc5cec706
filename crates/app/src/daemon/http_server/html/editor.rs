use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Form;
use common::prelude::DocumentName;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::existing_name;
use crate::daemon::http_server::session::{redirect_home, set_flash, PageContext, SignedIn};
use crate::daemon::http_server::AppError;
use crate::ServiceState;

#[derive(Template)]
#[template(path = "documents/edit.html")]
pub struct EditDocumentTemplate {
    pub page: PageContext,
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveForm {
    #[serde(default)]
    pub content: String,
}

/// Edit form for an existing document. Missing documents are a 404.
#[instrument(skip(state, session))]
pub async fn edit_form(
    State(state): State<ServiceState>,
    SignedIn(username): SignedIn,
    session: Session,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let name = existing_name(&filename)?;
    let document = state.documents().read(&name).await?;
    let page = PageContext::load(&session).await?;

    Ok(EditDocumentTemplate {
        page,
        filename: name.to_string(),
        content: document.text().into_owned(),
    }
    .into_response())
}

/// Overwrite a document's content, creating the document if it's missing
#[instrument(skip(state, session, form), fields(bytes = form.content.len()))]
pub async fn save(
    State(state): State<ServiceState>,
    SignedIn(username): SignedIn,
    session: Session,
    Path(filename): Path<String>,
    Form(form): Form<SaveForm>,
) -> Result<Response, AppError> {
    let name = DocumentName::parse(&filename)?;
    state
        .documents()
        .write(&name, form.content.as_bytes())
        .await?;

    tracing::info!(document = %name, username, "document updated");
    set_flash(&session, format!("{} has been updated", name)).await?;
    Ok(redirect_home())
}
