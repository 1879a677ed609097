//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use comptoir_core::{Category, ProductId, ProductSpecs};

/// A catalogue product.
///
/// Prices are IEEE doubles: `None` means the price was never set (which
/// the tariff resolver treats as a data-integrity error, never as zero).
/// The category is serialized under the historical `role` key, and the
/// physical type under `type`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    /// True when the product is sold under the GN brand line.
    pub gn: bool,
    pub name: String,
    pub brand: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub model: String,
    pub description: String,
    pub description2: String,
    /// Base cost price (never tier-rounded).
    pub price: Option<f64>,
    pub pricet1: Option<f64>,
    pub pricet2: Option<f64>,
    pub pricet3: Option<f64>,
    #[serde(rename = "role")]
    pub category: Category,
    pub image: String,
    pub guarantee: String,
    pub specs: ProductSpecs,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating or fully overwriting a product.
///
/// Used both by the spreadsheet importer (upsert by SKU) and the admin
/// product-management routes.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub sku: String,
    pub gn: bool,
    pub name: String,
    pub brand: String,
    pub kind: String,
    pub model: String,
    pub description: String,
    pub description2: String,
    pub price: Option<f64>,
    pub pricet1: Option<f64>,
    pub pricet2: Option<f64>,
    pub pricet3: Option<f64>,
    pub category: Category,
    pub image: String,
    pub guarantee: String,
    pub specs: ProductSpecs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_serializes_category_as_role() {
        let product = Product {
            id: ProductId::new(1),
            sku: "PC001".to_owned(),
            gn: true,
            name: "Poste fixe".to_owned(),
            brand: "HP".to_owned(),
            kind: "tour".to_owned(),
            model: "ProDesk".to_owned(),
            description: String::new(),
            description2: String::new(),
            price: Some(400.0),
            pricet1: Some(500.0),
            pricet2: Some(488.0),
            pricet3: Some(475.0),
            category: Category::Computers,
            image: "https://example.com/uploads/pc001.jpg".to_owned(),
            guarantee: "1 an".to_owned(),
            specs: ProductSpecs::empty(Category::Computers),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&product).expect("serialize");
        assert_eq!(value["role"], "ordinateurs");
        assert_eq!(value["type"], "tour");
        assert!(value.get("category").is_none());
    }
}
