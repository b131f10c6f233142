//! Cart storage and aggregation.
//!
//! The cart lives in the visitor's session. Lines are keyed by
//! (product id, color); quantity changes below 1 remove the line.

pub mod aggregate;

use heartwood_core::{CartLine, LineKey};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

pub use aggregate::{
    CartTotals, CheckoutBlocked, LineTotals, ShippingRate, StockViolation, aggregate,
    validate_for_checkout,
};

/// Session key for the cart.
const CART_KEY: &str = "cart";

/// The visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// The cart lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Look up a line by key.
    #[must_use]
    pub fn get(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.key() == *key)
    }

    /// Add a line. If a line with the same (id, color) key exists, its
    /// quantity is increased instead of creating a duplicate.
    pub fn add(&mut self, line: CartLine) {
        match self.lines.iter_mut().find(|l| l.key() == line.key()) {
            Some(existing) => existing.quantity += line.quantity,
            None => self.lines.push(line),
        }
    }

    /// Apply an increment/decrement to a line's quantity.
    ///
    /// A result below 1 removes the line. Returns the new quantity, or
    /// `None` when the line was removed or never existed.
    pub fn adjust_quantity(&mut self, key: &LineKey, delta: i32) -> Option<u32> {
        let pos = self.lines.iter().position(|l| l.key() == *key)?;
        let line = self.lines.get_mut(pos)?;

        let current = i64::from(line.quantity);
        let next = current + i64::from(delta);
        if next < 1 {
            self.lines.remove(pos);
            return None;
        }

        line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        Some(line.quantity)
    }

    /// Remove a line explicitly.
    pub fn remove(&mut self, key: &LineKey) {
        self.lines.retain(|l| l.key() != *key);
    }

    /// Total quantity across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart from the session, or an empty one.
pub async fn get_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(CART_KEY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Save the cart to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(CART_KEY, cart).await
}

/// Empty the cart (after a successful checkout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_cart(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<Cart>(CART_KEY).await?;
    Ok(())
}
