//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page
//! reloads. The cart itself lives in the session; quantity changes are
//! additionally synced to the backend behind a single-flight guard so
//! rapid clicks cannot produce out-of-order network responses.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use heartwood_core::{CartLine, LineKey, ProductId};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{self, Cart};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: i32,
    pub title: String,
    pub color: String,
    pub wood_type: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
    pub image_url: String,
    /// Display clamp only; checkout validation is the hard gate.
    pub over_stock: bool,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: Decimal,
    pub item_count: u32,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let totals = cart::aggregate(cart.lines());
        let items = cart
            .lines()
            .iter()
            .zip(&totals.lines)
            .map(|(line, line_totals)| CartItemView {
                product_id: line.product_id.as_i32(),
                title: line.title.clone(),
                color: line.color.clone().unwrap_or_default(),
                wood_type: line.wood_type.clone().unwrap_or_default(),
                quantity: line.quantity,
                unit_price: line_totals.discounted_unit_price.display(),
                line_total: format!("${:.2}", line_totals.line_total),
                image_url: line.image_url.clone().unwrap_or_default(),
                over_stock: line.quantity > line.stock,
            })
            .collect();

        Self {
            items,
            subtotal: totals.total_price,
            item_count: totals.total_quantity,
        }
    }
}

// =============================================================================
// Forms & Templates
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub quantity: Option<u32>,
    pub color: Option<String>,
    pub wood_type: Option<String>,
}

/// Update cart form data (increment/decrement).
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub color: Option<String>,
    pub delta: i32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i32,
    pub color: Option<String>,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

fn normalize_color(color: Option<String>) -> Option<String> {
    color.filter(|c| !c.is_empty())
}

/// Fire a background quantity sync for a line, single-flight per key.
fn sync_quantity_async(app: &AppState, key: LineKey, quantity: u32, wood_type: Option<String>) {
    let backend = app.backend().clone();
    tokio::spawn(async move {
        match backend
            .sync_cart_quantity(&key, quantity, wood_type.as_deref())
            .await
        {
            Ok(outcome) => tracing::debug!(?outcome, "Cart quantity sync finished"),
            Err(e) => tracing::warn!(error = %e, "Cart quantity sync failed"),
        }
    });
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let cart = cart::get_cart(&session).await;
    CartShowTemplate {
        cart: CartView::from(&cart),
    }
}

/// Add item to cart (HTMX).
///
/// Captures the product's current price, discount, and stock into the
/// line. Returns an HTMX trigger to update the cart count badge.
#[instrument(skip(app, session))]
pub async fn add(
    State(app): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product_id = ProductId::new(form.product_id);
    let product = app
        .products()
        .get(product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let color = normalize_color(form.color);
    let quantity = form.quantity.unwrap_or(1).max(1);
    let stock = product.stock_for_color(color.as_deref());

    let image_url = color
        .as_deref()
        .and_then(|name| {
            product
                .variants
                .iter()
                .find(|v| v.name == name)
                .and_then(|v| v.image_url.clone())
        })
        .or_else(|| product.image_url.clone());

    let line = CartLine {
        product_id,
        title: product.title.clone(),
        quantity,
        unit_price: product.price,
        discount: product.discount,
        color,
        wood_type: form.wood_type.filter(|w| !w.is_empty()),
        stock,
        image_url,
    };
    let key = line.key();
    let wood_type = line.wood_type.clone();

    let mut cart = cart::get_cart(&session).await;
    cart.add(line);
    cart::save_cart(&session, &cart).await?;

    let synced_quantity = cart.get(&key).map_or(quantity, |l| l.quantity);
    sync_quantity_async(&app, key, synced_quantity, wood_type);

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.total_quantity(),
        },
    )
        .into_response())
}

/// Increment or decrement a line's quantity (HTMX).
///
/// A quantity that would drop below 1 removes the line.
#[instrument(skip(app, session))]
pub async fn update(
    State(app): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let key = LineKey::new(ProductId::new(form.product_id), normalize_color(form.color));

    let mut cart = cart::get_cart(&session).await;
    let wood_type = cart.get(&key).and_then(|l| l.wood_type.clone());
    let new_quantity = cart.adjust_quantity(&key, form.delta);
    cart::save_cart(&session, &cart).await?;

    sync_quantity_async(&app, key, new_quantity.unwrap_or(0), wood_type);

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response())
}

/// Remove item from cart (HTMX).
#[instrument(skip(app, session))]
pub async fn remove(
    State(app): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let key = LineKey::new(ProductId::new(form.product_id), normalize_color(form.color));

    let mut cart = cart::get_cart(&session).await;
    let wood_type = cart.get(&key).and_then(|l| l.wood_type.clone());
    cart.remove(&key);
    cart::save_cart(&session, &cart).await?;

    sync_quantity_async(&app, key, 0, wood_type);

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response())
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = cart::get_cart(&session).await;
    CartCountTemplate {
        count: cart.total_quantity(),
    }
}
