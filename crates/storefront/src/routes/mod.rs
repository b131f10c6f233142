//! Route handlers for the storefront.

pub mod account;
pub mod cart;
pub mod checkout;
pub mod gallery;
pub mod listing;
pub mod pages;
pub mod search;
pub mod shop;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the storefront router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/shop", get(shop::index))
        .route("/shop/retry", post(shop::retry_fetch))
        .route("/search", get(search::index))
        .route("/listing/filter", post(listing::toggle_filter))
        .route("/listing/price", post(listing::set_price))
        .route("/listing/clear", post(listing::clear_filters))
        .route("/cart", get(cart::show))
        .route("/cart/add", post(cart::add))
        .route("/cart/update", post(cart::update))
        .route("/cart/remove", post(cart::remove))
        .route("/cart/count", get(cart::count))
        .route("/checkout", get(checkout::show))
        .route("/checkout/place", post(checkout::place))
        .route("/account", get(account::show))
        .route("/account/sign-in", post(account::sign_in))
        .route("/account/sign-out", post(account::sign_out))
        .route("/gallery", get(gallery::index))
}
