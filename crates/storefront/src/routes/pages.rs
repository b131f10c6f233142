//! Static page handlers.

use axum::response::Redirect;

/// The home page currently forwards to the shop listing.
pub async fn home() -> Redirect {
    Redirect::to("/shop")
}
