//! Tier-based price resolution.
//!
//! Every company carries a pricing tier; the price a user sees for a
//! product is the product's price column for that tier. Absent columns
//! resolve to `None` so callers can distinguish "no price published"
//! from a zero price.

use comptoir_core::Tier;

use crate::models::Product;

/// Resolve the unit price of `product` for a company on `tier`.
///
/// Returns `None` when the product has no price published for that tier.
#[must_use]
pub const fn resolve_price(product: &Product, tier: Tier) -> Option<f64> {
    match tier {
        Tier::Tier1 => product.pricet1,
        Tier::Tier2 => product.pricet2,
        Tier::Tier3 => product.pricet3,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use comptoir_core::{Category, ProductId, ProductSpecs};

    use super::*;

    fn product(t1: Option<f64>, t2: Option<f64>, t3: Option<f64>) -> Product {
        Product {
            id: ProductId::new(1),
            sku: "PC001".to_owned(),
            gn: false,
            name: "Latitude 5430".to_owned(),
            brand: String::new(),
            kind: String::new(),
            model: String::new(),
            description: String::new(),
            description2: String::new(),
            price: None,
            pricet1: t1,
            pricet2: t2,
            pricet3: t3,
            category: Category::Computers,
            image: String::new(),
            guarantee: "1 an".to_owned(),
            specs: ProductSpecs::empty(Category::Computers),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_resolves_matching_tier_column() {
        let p = product(Some(100.0), Some(120.0), Some(140.0));
        assert_eq!(resolve_price(&p, Tier::Tier1), Some(100.0));
        assert_eq!(resolve_price(&p, Tier::Tier2), Some(120.0));
        assert_eq!(resolve_price(&p, Tier::Tier3), Some(140.0));
    }

    #[test]
    fn test_missing_column_resolves_to_none() {
        let p = product(Some(100.0), None, Some(140.0));
        assert_eq!(resolve_price(&p, Tier::Tier2), None);
    }
}
