use axum::extract::{Path, State};
use axum::response::Response;
use tower_sessions::Session;
use tracing::instrument;

use super::existing_name;
use crate::daemon::http_server::session::{redirect_home, set_flash, SignedIn};
use crate::daemon::http_server::AppError;
use crate::ServiceState;

/// Delete a document. Deleting one that is already gone is a 404.
#[instrument(skip(state, session))]
pub async fn handler(
    State(state): State<ServiceState>,
    SignedIn(username): SignedIn,
    session: Session,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let name = existing_name(&filename)?;
    state.documents().delete(&name).await?;

    tracing::info!(document = %name, username, "document deleted");
    set_flash(&session, format!("{} has been deleted", name)).await?;
    Ok(redirect_home())
}
