use askama::Template;
use askama_axum::IntoResponse;
use axum::http::StatusCode;
use axum::response::Response;
use common::prelude::{CredentialError, DocumentError};

use super::handlers::NotFoundTemplate;

#[derive(Template)]
#[template(path = "pages/error.html")]
struct ErrorTemplate {
    status: u16,
    reason: String,
    message: String,
}

/// Errors a page handler can fail with.
///
/// Validation failures a user can fix are handled inside the handlers
/// (they re-render the form); whatever reaches this type ends the request.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
    #[error(transparent)]
    Credentials(#[from] CredentialError),
    #[error(transparent)]
    Documents(#[from] DocumentError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Documents(DocumentError::NotFound(_)) => {
                let template = NotFoundTemplate {
                    message: self.to_string(),
                };
                (StatusCode::NOT_FOUND, template).into_response()
            }
            AppError::Documents(e) if e.is_validation() => {
                error_page(StatusCode::BAD_REQUEST, self.to_string())
            }
            _ => {
                tracing::error!("request failed: {}", self);
                error_page(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong on our end.".to_string(),
                )
            }
        }
    }
}

fn error_page(status: StatusCode, message: String) -> Response {
    let template = ErrorTemplate {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Error").to_string(),
        message,
    };
    (status, template).into_response()
}
