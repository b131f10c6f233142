//! Search view handlers.
//!
//! Search applies a case-insensitive title-substring pre-filter on the
//! raw collection, then follows the identical sort -> filter -> paginate
//! cascade as the Shop view.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::{self, SortOrder, ViewKind};
use crate::error::Result;
use crate::state::AppState;

use super::listing::{ListingView, load_listing, save_listing};

/// Search page query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub sort: Option<String>,
    pub page: Option<usize>,
}

/// Search page template.
#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub listing: ListingView,
}

/// Display the search page.
#[instrument(skip(app, session))]
pub async fn index(
    State(app): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> Result<Response> {
    let mut state = load_listing(&session, ViewKind::Search).await;

    state.set_query(query.q.trim());
    if let Some(sort) = query.sort.as_deref() {
        state.set_sort(SortOrder::parse(sort));
    }
    if let Some(page) = query.page {
        state.set_page(page);
    }
    save_listing(&session, &state).await?;

    let listing = catalog::recompute(&app.products().products(), &state);

    Ok(SearchTemplate {
        listing: ListingView::build(&app, &state, &listing),
    }
    .into_response())
}
