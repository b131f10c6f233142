//! Shop view handlers.
//!
//! The Shop view runs the full listing cascade over the whole catalog.
//! Sort and page changes arrive as query parameters; filter mutations go
//! through the shared fragment handlers in [`super::listing`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::{self, SortOrder, ViewKind};
use crate::error::Result;
use crate::state::AppState;

use super::listing::{ListingView, load_listing, save_listing};

/// Shop page query parameters.
#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    pub sort: Option<String>,
    pub page: Option<usize>,
}

/// Shop page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop.html")]
pub struct ShopTemplate {
    pub listing: ListingView,
}

/// Display the shop page.
#[instrument(skip(app, session))]
pub async fn index(
    State(app): State<AppState>,
    session: Session,
    Query(query): Query<ShopQuery>,
) -> Result<Response> {
    let mut state = load_listing(&session, ViewKind::Shop).await;

    if let Some(sort) = query.sort.as_deref() {
        state.set_sort(SortOrder::parse(sort));
    }
    if let Some(page) = query.page {
        state.set_page(page);
    }
    save_listing(&session, &state).await?;

    let listing = catalog::recompute(&app.products().products(), &state);

    Ok(ShopTemplate {
        listing: ListingView::build(&app, &state, &listing),
    }
    .into_response())
}

/// Retry the catalog fetch after a failure, then return to the shop.
#[instrument(skip(app))]
pub async fn retry_fetch(State(app): State<AppState>) -> Redirect {
    match catalog::refresh::refresh(app.products(), app.backend(), app.snapshot_path()).await {
        Ok(count) => tracing::info!(count, "Catalog fetched on retry"),
        Err(e) => {
            tracing::error!(error = %e, "Catalog retry failed");
            app.products().mark_failed();
        }
    }
    Redirect::to("/shop")
}
