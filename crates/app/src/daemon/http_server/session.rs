//! Per-browser session state
//!
//! A session carries at most a signed-in username and one flash message.
//! The flash is consumed by the next page render: it is shown exactly once
//! and is gone on the following request, whether or not anything happened
//! in between.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tower_sessions::Session;

use super::AppError;

pub const SESSION_COOKIE_NAME: &str = "cms.sid";

const USERNAME_KEY: &str = "username";
const FLASH_KEY: &str = "flash";

pub const SIGNED_OUT_MESSAGE: &str = "You must be signed in to do that";

/// Layout data every page needs
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub username: Option<String>,
    pub flash: Option<String>,
}

impl PageContext {
    /// Load the page context, consuming any pending flash message
    pub async fn load(session: &Session) -> Result<Self, AppError> {
        Ok(Self {
            username: signed_in_user(session).await?,
            flash: take_flash(session).await?,
        })
    }

    /// Show `message` on this render instead of any pending flash
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.flash = Some(message.into());
        self
    }
}

pub async fn set_flash(session: &Session, message: impl Into<String>) -> Result<(), AppError> {
    session.insert(FLASH_KEY, message.into()).await?;
    Ok(())
}

pub async fn take_flash(session: &Session) -> Result<Option<String>, AppError> {
    Ok(session.remove::<String>(FLASH_KEY).await?)
}

pub async fn signed_in_user(session: &Session) -> Result<Option<String>, AppError> {
    Ok(session.get::<String>(USERNAME_KEY).await?)
}

pub async fn sign_in(session: &Session, username: &str) -> Result<(), AppError> {
    // new id on privilege change
    session.cycle_id().await?;
    session.insert(USERNAME_KEY, username).await?;
    Ok(())
}

pub async fn sign_out(session: &Session) -> Result<(), AppError> {
    session.remove::<String>(USERNAME_KEY).await?;
    Ok(())
}

/// 302 to `location`
pub fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

pub fn redirect_home() -> Response {
    redirect("/")
}

/// Extractor for handlers that require a signed-in user.
///
/// Anonymous requests are rejected with a flash message and a redirect
/// to the index, before the handler body runs.
#[derive(Debug, Clone)]
pub struct SignedIn(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for SignedIn
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match signed_in_user(&session).await {
            Ok(Some(username)) => Ok(SignedIn(username)),
            Ok(None) => {
                tracing::debug!(path = parts.uri.path(), "rejecting anonymous request");
                set_flash(&session, SIGNED_OUT_MESSAGE)
                    .await
                    .map_err(IntoResponse::into_response)?;
                Err(redirect_home())
            }
            Err(e) => Err(e.into_response()),
        }
    }
}
