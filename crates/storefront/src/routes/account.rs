//! Account route handlers.
//!
//! Authentication is handled by an external service; the storefront only
//! receives an issued customer token, checks it against the backend, and
//! keeps it in the session to gate checkout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::{clear_customer_token, set_customer_token};
use crate::state::AppState;

/// Sign-in page template.
#[derive(Template, WebTemplate)]
#[template(path = "account.html")]
pub struct AccountTemplate {
    pub invalid_token: bool,
}

/// Sign-in form data: the token issued by the external auth service.
#[derive(Debug, Deserialize)]
pub struct SignInForm {
    pub token: String,
}

/// Display the sign-in page.
pub async fn show() -> impl IntoResponse {
    AccountTemplate {
        invalid_token: false,
    }
}

/// Accept an externally issued customer token.
///
/// The token is validated against the backend before it is stored; an
/// invalid one re-renders the form with a notice.
#[instrument(skip(app, session, form))]
pub async fn sign_in(
    State(app): State<AppState>,
    session: Session,
    Form(form): Form<SignInForm>,
) -> Result<Response> {
    let token = form.token.trim();

    let valid = app
        .backend()
        .check_token_validity(token)
        .await
        .unwrap_or(false);

    if !valid {
        return Ok(AccountTemplate {
            invalid_token: true,
        }
        .into_response());
    }

    set_customer_token(&session, token).await?;
    Ok(Redirect::to("/checkout").into_response())
}

/// Drop the customer token (sign out).
#[instrument(skip(session))]
pub async fn sign_out(session: Session) -> Result<Redirect> {
    clear_customer_token(&session).await?;
    Ok(Redirect::to("/shop"))
}
