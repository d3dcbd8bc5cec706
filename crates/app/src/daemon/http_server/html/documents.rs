use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use common::prelude::{DocumentError, DocumentName};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::existing_name;
use crate::daemon::http_server::session::{redirect_home, set_flash, PageContext, SignedIn};
use crate::daemon::http_server::AppError;
use crate::ServiceState;

#[derive(Template)]
#[template(path = "documents/new.html")]
pub struct NewDocumentTemplate {
    pub page: PageContext,
    pub filename: String,
}

#[derive(Template)]
#[template(path = "documents/copy.html")]
pub struct CopyDocumentTemplate {
    pub page: PageContext,
    pub source: String,
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateForm {
    #[serde(default)]
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct CopyForm {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub source: String,
}

#[instrument(skip(session))]
pub async fn new_form(
    SignedIn(username): SignedIn,
    session: Session,
) -> Result<Response, AppError> {
    let page = PageContext::load(&session).await?;
    Ok(NewDocumentTemplate {
        page,
        filename: String::new(),
    }
    .into_response())
}

/// Create a new, empty document
#[instrument(skip(state, session))]
pub async fn create(
    State(state): State<ServiceState>,
    SignedIn(username): SignedIn,
    session: Session,
    Form(form): Form<CreateForm>,
) -> Result<Response, AppError> {
    match create_document(&state, &form.filename, None).await {
        Ok(name) => created(&session, &name, &username).await,
        Err(e) if is_rejection(&e) => {
            let page = PageContext::load(&session).await?.with_message(e.to_string());
            let template = NewDocumentTemplate {
                page,
                filename: form.filename,
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Form for copying an existing document under a new name.
/// Missing documents are a 404.
#[instrument(skip(state, session))]
pub async fn copy_form(
    State(state): State<ServiceState>,
    SignedIn(username): SignedIn,
    session: Session,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let source = existing_name(&filename)?;
    let document = state.documents().read(&source).await?;
    let page = PageContext::load(&session).await?;

    Ok(CopyDocumentTemplate {
        page,
        source: source.to_string(),
        filename: String::new(),
        content: document.text().into_owned(),
    }
    .into_response())
}

/// Create a new document holding a copy of `source`'s content
#[instrument(skip(state, session))]
pub async fn copy(
    State(state): State<ServiceState>,
    SignedIn(username): SignedIn,
    session: Session,
    Form(form): Form<CopyForm>,
) -> Result<Response, AppError> {
    match create_document(&state, &form.filename, Some(&form.source)).await {
        Ok(name) => created(&session, &name, &username).await,
        Err(e) if is_rejection(&e) => {
            // show the source again if it is still around
            let content = match existing_name(&form.source) {
                Ok(source) => state
                    .documents()
                    .read(&source)
                    .await
                    .map(|document| document.text().into_owned())
                    .unwrap_or_default(),
                Err(_) => String::new(),
            };

            let page = PageContext::load(&session).await?.with_message(e.to_string());
            let template = CopyDocumentTemplate {
                page,
                source: form.source,
                filename: form.filename,
                content,
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// The one code path behind both `/create` and `/copy`: validate the new
/// name, then create it empty or from `source`.
async fn create_document(
    state: &ServiceState,
    raw_name: &str,
    source: Option<&str>,
) -> Result<DocumentName, DocumentError> {
    let name = DocumentName::parse(raw_name)?;

    match source {
        None => state.documents().create(&name).await?,
        Some(source) => {
            let source = existing_name(source)?;
            state.documents().copy(&source, &name).await?
        }
    }

    Ok(name)
}

/// Errors that send the user back to the form
fn is_rejection(e: &DocumentError) -> bool {
    e.is_validation() || matches!(e, DocumentError::NotFound(_))
}

async fn created(
    session: &Session,
    name: &DocumentName,
    username: &str,
) -> Result<Response, AppError> {
    tracing::info!(document = %name, username, "document created");
    set_flash(session, format!("{} has been created", name)).await?;
    Ok(redirect_home())
}
