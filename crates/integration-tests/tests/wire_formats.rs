//! Wire-format contracts shared with the existing frontend.
//!
//! The JSON keys here (`role`, `type`, `taux`, camelCase timestamps, the
//! French category labels) predate this codebase and must not drift.

use chrono::Utc;

use comptoir_core::{Category, CompanyId, Tier};
use comptoir_integration_tests::sample_product;
use comptoir_server::models::Company;
use comptoir_server::services::resolve_price;

#[test]
fn test_product_wire_keys() {
    let product = sample_product("PC001", 500.0, 488.0, 475.0);
    let value = serde_json::to_value(&product).expect("serialize");

    assert_eq!(value["sku"], "PC001");
    assert_eq!(value["role"], "ordinateurs");
    assert_eq!(value["type"], "tour");
    assert_eq!(value["pricet2"], 488.0);
    assert!(value.get("category").is_none(), "category must ship as role");
    assert!(value.get("kind").is_none(), "kind must ship as type");
    assert!(value.get("createdAt").is_some());
    assert!(value.get("created_at").is_none());
}

#[test]
fn test_company_wire_keys() {
    let company = Company {
        id: CompanyId::new(1),
        glpi_id: "42".to_owned(),
        name: "Cabinet Dupont".to_owned(),
        tier: Tier::Tier3,
        created_at: Utc::now(),
    };
    let value = serde_json::to_value(&company).expect("serialize");

    assert_eq!(value["glpiId"], "42");
    assert_eq!(value["taux"], "taux3");
    assert!(value.get("tier").is_none());
}

#[test]
fn test_category_labels_round_trip() {
    for label in [
        "ordinateurs",
        "écrans",
        "réseaux - nas",
        "accessoires",
        "robot epson",
        "onduleurs",
        "imprimantes & scanners",
        "câbles",
        "téléphone ip",
        "occasions",
        "logiciels",
    ] {
        let category = Category::from_label(label).expect(label);
        assert_eq!(category.as_label(), label);
    }
    assert!(Category::from_label("meubles").is_none());
}

#[test]
fn test_tier_selects_matching_price_field() {
    let product = sample_product("PC001", 500.0, 488.0, 475.0);

    assert_eq!(resolve_price(&product, Tier::Tier1), Some(500.0));
    assert_eq!(resolve_price(&product, Tier::Tier2), Some(488.0));
    assert_eq!(resolve_price(&product, Tier::Tier3), Some(475.0));
}

#[test]
fn test_missing_tier_price_resolves_to_none() {
    let mut product = sample_product("PC001", 500.0, 488.0, 475.0);
    product.pricet3 = None;

    assert_eq!(resolve_price(&product, Tier::Tier3), None);
    assert_eq!(resolve_price(&product, Tier::Tier1), Some(500.0));
}
