//! Shared listing orchestration for the Shop and Search views.
//!
//! Both views keep a per-session [`ListingState`] and run the same
//! sort -> filter -> paginate cascade; the handlers here mutate the
//! criteria via HTMX form posts and re-render the listing section.

use std::collections::{BTreeMap, BTreeSet};

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::{IntoResponse, Response}};
use heartwood_core::{CategoryGroup, Price, Product};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::{self, Listing, ListingState, PriceRange, ViewKind};
use crate::error::Result;
use crate::state::AppState;

/// Session key for the listing state.
const LISTING_KEY: &str = "listing";

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the listing state for a view, resetting it when the stored state
/// belongs to the other view (filters never leak between Shop and Search).
pub async fn load_listing(session: &Session, view: ViewKind) -> ListingState {
    session
        .get::<ListingState>(LISTING_KEY)
        .await
        .ok()
        .flatten()
        .map_or_else(|| ListingState::new(view), |state| state.for_view(view))
}

/// Save the listing state to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_listing(
    session: &Session,
    state: &ListingState,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(LISTING_KEY, state).await
}

// =============================================================================
// View Models
// =============================================================================

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub title: String,
    pub price: String,
    pub discounted_price: String,
    pub has_discount: bool,
    pub image_url: String,
    pub in_stock: bool,
    pub color_names: Vec<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            title: product.title.clone(),
            price: product.price.display(),
            discounted_price: product.discounted_price().display(),
            has_discount: !product.discount.is_zero(),
            image_url: product.image_url.clone().unwrap_or_default(),
            in_stock: product.stock > 0,
            color_names: product.variants.iter().map(|v| v.name.clone()).collect(),
        }
    }
}

/// One page button.
#[derive(Clone)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

/// One sort dropdown entry.
#[derive(Clone)]
pub struct SortOption {
    pub label: &'static str,
    pub href: String,
    pub selected: bool,
}

/// One toggleable subcategory checkbox.
#[derive(Clone)]
pub struct FacetOption {
    pub subcategory: String,
    pub selected: bool,
}

/// One category group with its subcategory options.
#[derive(Clone)]
pub struct FacetGroup {
    pub group: String,
    pub options: Vec<FacetOption>,
}

/// Everything the listing section template needs.
#[derive(Clone)]
pub struct ListingView {
    pub view: &'static str,
    pub view_path: &'static str,
    pub query: String,
    pub products: Vec<ProductView>,
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
    pub pages: Vec<PageLink>,
    pub sorts: Vec<SortOption>,
    pub facets: Vec<FacetGroup>,
    pub price_min: String,
    pub price_max: String,
    pub bounds_min: Decimal,
    pub bounds_max: Decimal,
    pub fetch_error: bool,
}

impl ListingView {
    /// Build the view model from a pipeline run.
    #[must_use]
    pub fn build(app: &AppState, state: &ListingState, listing: &Listing) -> Self {
        let view_path = state.view().path();
        let query = state.query().to_string();

        let href = |sort: catalog::SortOrder, page: usize| -> String {
            let mut href = format!("{view_path}?sort={}&page={page}", sort.as_str());
            if !query.is_empty() {
                href.push_str("&q=");
                href.push_str(&urlencoding::encode(&query));
            }
            href
        };

        let pages = (1..=listing.page_count)
            .map(|number| PageLink {
                number,
                href: href(state.sort(), number),
                current: number == listing.page,
            })
            .collect();

        let sorts = catalog::SortOrder::ALL
            .into_iter()
            .map(|sort| SortOption {
                label: sort.label(),
                href: href(sort, 1),
                selected: sort == state.sort(),
            })
            .collect();

        let bounds = app.products().price_bounds();
        let (price_min, price_max) = state.criteria().price_range().map_or_else(
            || (String::new(), String::new()),
            |range| {
                (
                    range.min.amount().to_string(),
                    range.max.map(|m| m.amount().to_string()).unwrap_or_default(),
                )
            },
        );

        Self {
            view: state.view().as_str(),
            view_path,
            query,
            products: listing.page_items.iter().map(ProductView::from).collect(),
            total: listing.filtered.len(),
            page: listing.page,
            page_count: listing.page_count,
            pages,
            sorts,
            facets: build_facets(&app.products().products(), state),
            price_min,
            price_max,
            bounds_min: bounds.min.amount(),
            bounds_max: bounds.max.amount(),
            fetch_error: app.products().fetch_error(),
        }
    }
}

/// Collect the subcategory options per group across the raw collection,
/// marking the currently selected ones.
fn build_facets(products: &[Product], state: &ListingState) -> Vec<FacetGroup> {
    let mut by_group: BTreeMap<CategoryGroup, BTreeSet<String>> = BTreeMap::new();
    for product in products {
        for (group, subs) in &product.categories {
            by_group.entry(*group).or_default().extend(subs.iter().cloned());
        }
    }

    CategoryGroup::ALL
        .into_iter()
        .filter_map(|group| {
            let subs = by_group.remove(&group)?;
            Some(FacetGroup {
                group: group.as_str().to_string(),
                options: subs
                    .into_iter()
                    .map(|subcategory| FacetOption {
                        selected: state.criteria().is_selected(group, &subcategory),
                        subcategory,
                    })
                    .collect(),
            })
        })
        .collect()
}

// =============================================================================
// Fragment Handlers
// =============================================================================

/// Listing section fragment template (for HTMX swaps).
#[derive(Template, WebTemplate)]
#[template(path = "partials/listing.html")]
pub struct ListingFragmentTemplate {
    pub listing: ListingView,
}

/// Filter toggle form data.
#[derive(Debug, Deserialize)]
pub struct ToggleFilterForm {
    pub view: String,
    pub group: String,
    pub subcategory: String,
}

/// Price range form data.
#[derive(Debug, Deserialize)]
pub struct PriceRangeForm {
    pub view: String,
    #[serde(default)]
    pub min: String,
    #[serde(default)]
    pub max: String,
}

/// Clear-filters form data.
#[derive(Debug, Deserialize)]
pub struct ClearFiltersForm {
    pub view: String,
}

fn parse_view(s: &str) -> ViewKind {
    ViewKind::parse(s).unwrap_or(ViewKind::Shop)
}

/// Recompute and render the listing fragment after a criteria mutation.
async fn render_fragment(
    app: &AppState,
    session: &Session,
    state: ListingState,
) -> Result<Response> {
    save_listing(session, &state).await?;
    let listing = catalog::recompute(&app.products().products(), &state);
    Ok(ListingFragmentTemplate {
        listing: ListingView::build(app, &state, &listing),
    }
    .into_response())
}

/// Toggle a (group, subcategory) filter pair (HTMX).
#[instrument(skip(app, session))]
pub async fn toggle_filter(
    State(app): State<AppState>,
    session: Session,
    Form(form): Form<ToggleFilterForm>,
) -> Result<Response> {
    let mut state = load_listing(&session, parse_view(&form.view)).await;
    if let Some(group) = CategoryGroup::parse(&form.group) {
        state.toggle_pair(group, form.subcategory);
    }
    render_fragment(&app, &session, state).await
}

/// Replace the price range (HTMX).
///
/// A range spanning the full catalog bounds clears the price filter,
/// matching the "slider dragged back to the extremes" semantics.
#[instrument(skip(app, session))]
pub async fn set_price(
    State(app): State<AppState>,
    session: Session,
    Form(form): Form<PriceRangeForm>,
) -> Result<Response> {
    let mut state = load_listing(&session, parse_view(&form.view)).await;

    let bounds = app.products().price_bounds();
    let min = form
        .min
        .trim()
        .parse::<Decimal>()
        .map_or(bounds.min, |d| Price::new(d));
    let max = form.max.trim().parse::<Decimal>().ok().map(Price::new);

    let range = PriceRange::new(min, max).normalized(&bounds);
    state.set_price_range(range);

    render_fragment(&app, &session, state).await
}

/// Clear all filters (HTMX).
#[instrument(skip(app, session))]
pub async fn clear_filters(
    State(app): State<AppState>,
    session: Session,
    Form(form): Form<ClearFiltersForm>,
) -> Result<Response> {
    let mut state = load_listing(&session, parse_view(&form.view)).await;
    state.clear_filters();
    render_fragment(&app, &session, state).await
}
