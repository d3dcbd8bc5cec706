use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::State;
use axum::response::Response;
use tower_sessions::Session;
use tracing::instrument;

use crate::daemon::http_server::session::PageContext;
use crate::daemon::http_server::AppError;
use crate::ServiceState;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub page: PageContext,
    pub documents: Vec<String>,
}

#[instrument(skip(state, session))]
pub async fn handler(
    State(state): State<ServiceState>,
    session: Session,
) -> Result<Response, AppError> {
    let documents = state
        .documents()
        .list()
        .await?
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    let page = PageContext::load(&session).await?;

    Ok(IndexTemplate { page, documents }.into_response())
}
