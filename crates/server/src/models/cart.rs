//! Cart domain types and line-item semantics.
//!
//! The line-item list is a plain value persisted wholesale (read, mutate
//! in memory, write back), so all merge/update/remove semantics live here
//! as pure functions on `Vec<CartItem>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use comptoir_core::{CartId, CompanyId, ProductId, UserId};

use super::product::Product;

/// One (product, quantity, price-snapshot) entry within a cart.
///
/// The price is captured once at add time and never re-derived from the
/// product on later reads or merges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: ProductId,
    pub quantity: u32,
    pub price: f64,
}

/// A persisted cart, keyed uniquely by (user, company).
#[derive(Debug, Clone)]
pub struct Cart {
    pub id: CartId,
    pub user: UserId,
    pub company: CompanyId,
    pub items: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Merge an item into the list.
///
/// An existing line for the same product gets its quantity incremented
/// and keeps its original price snapshot; otherwise a new line is
/// appended with the given snapshot.
pub fn merge_item(items: &mut Vec<CartItem>, product: ProductId, quantity: u32, price: f64) {
    if let Some(existing) = items.iter_mut().find(|item| item.product == product) {
        existing.quantity += quantity;
    } else {
        items.push(CartItem {
            product,
            quantity,
            price,
        });
    }
}

/// Overwrite the quantity of an existing line in place.
///
/// Returns `false` without touching the list when the product is not in
/// the cart (the caller still reports success; see the cart engine).
pub fn set_quantity(items: &mut [CartItem], product: ProductId, quantity: u32) -> bool {
    items
        .iter_mut()
        .find(|item| item.product == product)
        .map(|item| item.quantity = quantity)
        .is_some()
}

/// Remove the line for a product, if present. Idempotent.
pub fn remove_item(items: &mut Vec<CartItem>, product: ProductId) {
    items.retain(|item| item.product != product);
}

/// A cart line with its product resolved to full catalogue data.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub product: Product,
    pub quantity: u32,
    pub price: f64,
}

/// Cart representation returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
}

impl CartView {
    /// The empty-cart representation used when no cart exists yet.
    #[must_use]
    pub const fn empty() -> Self {
        Self { items: Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product: i32, quantity: u32, price: f64) -> CartItem {
        CartItem {
            product: ProductId::new(product),
            quantity,
            price,
        }
    }

    #[test]
    fn test_merge_appends_new_line() {
        let mut items = vec![item(1, 1, 10.0)];
        merge_item(&mut items, ProductId::new(2), 3, 25.0);
        assert_eq!(items, vec![item(1, 1, 10.0), item(2, 3, 25.0)]);
    }

    #[test]
    fn test_merge_increments_and_keeps_first_price() {
        let mut items = Vec::new();
        merge_item(&mut items, ProductId::new(7), 2, 10.0);
        // Second add carries a different price; it must be ignored.
        merge_item(&mut items, ProductId::new(7), 3, 99.0);

        assert_eq!(items, vec![item(7, 5, 10.0)]);
    }

    #[test]
    fn test_merge_two_sequential_adds_same_price() {
        let mut items = Vec::new();
        merge_item(&mut items, ProductId::new(1), 1, 10.0);
        merge_item(&mut items, ProductId::new(1), 1, 10.0);
        assert_eq!(items, vec![item(1, 2, 10.0)]);
    }

    #[test]
    fn test_set_quantity_overwrites_in_place() {
        let mut items = vec![item(1, 2, 10.0), item(2, 1, 5.0)];
        assert!(set_quantity(&mut items, ProductId::new(1), 9));
        assert_eq!(items, vec![item(1, 9, 10.0), item(2, 1, 5.0)]);
    }

    #[test]
    fn test_set_quantity_missing_product_is_a_no_op() {
        let mut items = vec![item(1, 2, 10.0)];
        assert!(!set_quantity(&mut items, ProductId::new(42), 9));
        assert_eq!(items, vec![item(1, 2, 10.0)]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut items = vec![item(1, 2, 10.0), item(2, 1, 5.0)];
        remove_item(&mut items, ProductId::new(1));
        assert_eq!(items, vec![item(2, 1, 5.0)]);

        // Removing a product that is not there leaves the cart unchanged.
        remove_item(&mut items, ProductId::new(1));
        assert_eq!(items, vec![item(2, 1, 5.0)]);
    }

    #[test]
    fn test_cart_item_json_shape() {
        let json = serde_json::to_value(item(3, 2, 46.0)).expect("serialize");
        assert_eq!(json["product"], 3);
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["price"], 46.0);
    }
}
