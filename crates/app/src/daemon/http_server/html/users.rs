use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::daemon::http_server::session::{
    redirect_home, set_flash, sign_in, sign_out, PageContext,
};
use crate::daemon::http_server::AppError;
use crate::ServiceState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Template)]
#[template(path = "users/signin.html")]
pub struct SigninTemplate {
    pub page: PageContext,
    pub username: String,
}

#[derive(Template)]
#[template(path = "users/signup.html")]
pub struct SignupTemplate {
    pub page: PageContext,
    pub username: String,
}

/// Username/password form body. Deliberately not `Debug`, so the
/// password can't end up in a span.
#[derive(Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[instrument(skip(session))]
pub async fn signin_form(session: Session) -> Result<Response, AppError> {
    let page = PageContext::load(&session).await?;
    Ok(SigninTemplate {
        page,
        username: String::new(),
    }
    .into_response())
}

#[instrument(skip(session))]
pub async fn signup_form(session: Session) -> Result<Response, AppError> {
    let page = PageContext::load(&session).await?;
    Ok(SignupTemplate {
        page,
        username: String::new(),
    }
    .into_response())
}

#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn signup(
    State(state): State<ServiceState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    match state
        .credentials()
        .create(&form.username, &form.password)
        .await
    {
        Ok(()) => {
            set_flash(&session, "Account created. Please sign in.").await?;
            Ok(redirect_home())
        }
        // rejected signups re-render the form with a plain 200
        Err(e) if e.is_validation() => {
            tracing::debug!("signup rejected: {}", e);
            let page = PageContext::load(&session).await?.with_message(e.to_string());
            let template = SignupTemplate {
                page,
                username: form.username,
            };
            Ok((StatusCode::OK, template).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn signin(
    State(state): State<ServiceState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let valid = state
        .credentials()
        .validate(&form.username, &form.password)
        .await?;

    if !valid {
        tracing::info!("failed sign in");
        let page = PageContext::load(&session).await?.with_message(INVALID_CREDENTIALS);
        let template = SigninTemplate {
            page,
            username: form.username,
        };
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
    }

    sign_in(&session, &form.username).await?;
    set_flash(&session, "Welcome!").await?;
    tracing::info!("signed in");
    Ok(redirect_home())
}

#[instrument(skip(session))]
pub async fn signout(session: Session) -> Result<Response, AppError> {
    sign_out(&session).await?;
    set_flash(&session, "You have been signed out").await?;
    Ok(redirect_home())
}
