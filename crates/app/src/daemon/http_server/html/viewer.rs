use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::Response;
use common::prelude::{DocumentError, DocumentName, Rendered};
use tower_sessions::Session;
use tracing::instrument;

use crate::daemon::http_server::session::{redirect_home, set_flash, PageContext};
use crate::daemon::http_server::AppError;
use crate::ServiceState;

const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

#[derive(Template)]
#[template(path = "documents/show.html")]
pub struct DocumentTemplate {
    pub page: PageContext,
    pub filename: String,
    pub html: String,
}

/// Show a document: text verbatim, markdown rendered inside the layout.
/// Missing documents send the reader back to the index with a message.
#[instrument(skip(state, session))]
pub async fn handler(
    State(state): State<ServiceState>,
    session: Session,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let document = match DocumentName::parse(&filename) {
        Ok(name) => match state.documents().read(&name).await {
            Ok(document) => Some(document),
            Err(DocumentError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        },
        Err(e) => {
            tracing::debug!(filename = %filename, "not a document name: {}", e);
            None
        }
    };

    let Some(document) = document else {
        set_flash(&session, DocumentError::NotFound(filename).to_string()).await?;
        return Ok(redirect_home());
    };

    match document.render() {
        Rendered::PlainText(text) => Ok(([(header::CONTENT_TYPE, PLAIN_TEXT)], text).into_response()),
        Rendered::Html(html) => {
            let page = PageContext::load(&session).await?;
            Ok(DocumentTemplate {
                page,
                filename: document.name.to_string(),
                html,
            }
            .into_response())
        }
    }
}
