//! Authentication middleware and extractors.
//!
//! Authentication itself is an external collaborator: a separate login
//! flow places a customer token in the session, and the only thing the
//! storefront does is check that token's validity before letting a
//! visitor into checkout or profile routes.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::state::AppState;

/// Session key for the customer token.
pub const TOKEN_KEY: &str = "customer_token";

/// Extractor that requires a valid customer token.
///
/// If the token is missing or no longer valid, the visitor is redirected
/// back to the cart page.
///
/// # Example
///
/// ```rust,ignore
/// async fn checkout(
///     CheckoutToken(token): CheckoutToken,
/// ) -> impl IntoResponse {
///     // token has been validated against the backend
/// }
/// ```
pub struct CheckoutToken(pub String);

/// Error returned when the token gate rejects a request.
pub enum TokenRejection {
    /// Redirect to the sign-in page (for HTML requests).
    RedirectToSignIn,
    /// Unauthorized response (for fragment requests).
    Unauthorized,
}

impl IntoResponse for TokenRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToSignIn => Redirect::to("/account").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for CheckoutToken {
    type Rejection = TokenRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(TokenRejection::Unauthorized)?;

        let token: String = session
            .get(TOKEN_KEY)
            .await
            .ok()
            .flatten()
            .ok_or(TokenRejection::RedirectToSignIn)?;

        // A backend hiccup counts as invalid rather than a 502: the
        // visitor lands on the sign-in page and can retry
        let valid = state
            .backend()
            .check_token_validity(&token)
            .await
            .unwrap_or(false);

        if valid {
            Ok(Self(token))
        } else {
            Err(TokenRejection::RedirectToSignIn)
        }
    }
}

/// Helper to set the customer token in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_customer_token(
    session: &Session,
    token: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(TOKEN_KEY, token).await
}

/// Helper to clear the customer token from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_customer_token(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session.remove::<String>(TOKEN_KEY).await?;
    Ok(())
}
