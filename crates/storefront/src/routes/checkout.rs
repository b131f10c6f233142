//! Checkout route handlers.
//!
//! Checkout is token-gated. Before anything touches the network the cart
//! is validated against live stock; a violating line blocks submission
//! with a user-facing warning and no order call is made.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use heartwood_core::CartLine;
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::backend::{OrderLine, OrderPayload};
use crate::cart::{self, ShippingRate, validate_for_checkout};
use crate::catalog::refresh;
use crate::error::Result;
use crate::filters;
use crate::middleware::CheckoutToken;
use crate::state::AppState;

use super::cart::CartView;

/// One shipping option row.
#[derive(Clone)]
pub struct ShippingOption {
    pub value: &'static str,
    pub label: String,
    pub selected: bool,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    pub shipping_options: Vec<ShippingOption>,
    pub shipping: Decimal,
    pub total: Decimal,
    pub warnings: Vec<String>,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout_complete.html")]
pub struct CheckoutCompleteTemplate {
    pub order_id: i32,
    pub total: Decimal,
}

/// Checkout page query parameters.
#[derive(Debug, Deserialize)]
pub struct CheckoutQuery {
    pub shipping: Option<String>,
}

/// Place order form data.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderForm {
    #[serde(default)]
    pub shipping: String,
}

fn build_template(
    cart_view: CartView,
    rate: ShippingRate,
    warnings: Vec<String>,
) -> CheckoutTemplate {
    let shipping = rate.contribution(cart_view.item_count);
    let total = cart_view.subtotal + shipping;

    let shipping_options = [ShippingRate::Standard, ShippingRate::Express, ShippingRate::Free]
        .into_iter()
        .map(|option| ShippingOption {
            value: option.as_str(),
            label: format!(
                "{} ({} per item)",
                option.as_str(),
                option.per_unit().display()
            ),
            selected: option == rate,
        })
        .collect();

    CheckoutTemplate {
        cart: cart_view,
        shipping_options,
        shipping,
        total,
        warnings,
    }
}

/// Resolve the live stock for a cart line's (product, color) selection.
/// Lines whose product vanished from the catalog resolve to 0.
fn live_stock(app: &AppState) -> impl Fn(&CartLine) -> u32 {
    let store = app.products().clone();
    move |line| {
        store
            .get(line.product_id)
            .map_or(0, |p| p.stock_for_color(line.color.as_deref()))
    }
}

/// Display the checkout page.
#[instrument(skip(app, session, _token))]
pub async fn show(
    State(app): State<AppState>,
    _token: CheckoutToken,
    session: Session,
    Query(query): Query<CheckoutQuery>,
) -> Result<Response> {
    let cart = cart::get_cart(&session).await;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let rate = ShippingRate::parse(query.shipping.as_deref().unwrap_or_default());

    // Surface stock problems already on the page, before submission
    let warnings = validate_for_checkout(cart.lines(), live_stock(&app))
        .err()
        .map(|blocked| {
            blocked
                .violations
                .into_iter()
                .map(|v| {
                    format!(
                        "Only {} of \"{}\" in stock (cart has {})",
                        v.stock, v.title, v.quantity
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(build_template(CartView::from(&cart), rate, warnings).into_response())
}

/// Place the order.
///
/// Blocks with a warning when any line's quantity exceeds live stock;
/// otherwise submits, empties the cart, and re-fetches the catalog so the
/// listing reflects the updated stock.
#[instrument(skip(app, session, _token))]
pub async fn place(
    State(app): State<AppState>,
    _token: CheckoutToken,
    session: Session,
    Form(form): Form<PlaceOrderForm>,
) -> Result<Response> {
    let cart = cart::get_cart(&session).await;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let rate = ShippingRate::parse(&form.shipping);

    if let Err(blocked) = validate_for_checkout(cart.lines(), live_stock(&app)) {
        tracing::info!(
            violations = blocked.violations.len(),
            "Checkout blocked by stock validation"
        );
        let warnings = blocked
            .violations
            .into_iter()
            .map(|v| {
                format!(
                    "Only {} of \"{}\" in stock (cart has {})",
                    v.stock, v.title, v.quantity
                )
            })
            .collect();
        return Ok(build_template(CartView::from(&cart), rate, warnings).into_response());
    }

    let totals = cart::aggregate(cart.lines());
    let payload = OrderPayload {
        lines: cart
            .lines()
            .iter()
            .map(|line| OrderLine {
                product_id: line.product_id,
                quantity: line.quantity,
                color: line.color.clone(),
                wood_type: line.wood_type.clone(),
                unit_price: line.unit_price,
                discount_percent: line.discount.as_u8(),
            })
            .collect(),
        shipping: rate.as_str().to_string(),
        total_price: totals.total_price + rate.contribution(totals.total_quantity),
    };

    // A failed submission is transient: warn and keep the page interactive
    let receipt = match app.backend().place_order(&payload).await {
        Ok(receipt) => receipt,
        Err(e) => {
            tracing::error!(error = %e, "Order submission failed");
            let warnings =
                vec!["Something went wrong placing your order. Please try again.".to_string()];
            return Ok(build_template(CartView::from(&cart), rate, warnings).into_response());
        }
    };
    tracing::info!(order_id = %receipt.order.id, "Order placed");

    cart::clear_cart(&session).await?;

    // Stock changed server-side; re-fetch so the listing catches up
    refresh::refresh_async(
        app.products().clone(),
        app.backend().clone(),
        app.snapshot_path_owned(),
    );

    Ok(CheckoutCompleteTemplate {
        order_id: receipt.order.id.as_i32(),
        total: receipt.order.total,
    }
    .into_response())
}
