//! Company domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use comptoir_core::{CompanyId, Tier};

/// A client company.
///
/// The tariff tier determines which product price field applies to this
/// company's carts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    /// External GLPI entity identifier (unique).
    pub glpi_id: String,
    pub name: String,
    /// Serialized under its historical wire name `taux`.
    #[serde(rename = "taux")]
    pub tier: Tier,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_wire_shape() {
        let company = Company {
            id: CompanyId::new(3),
            glpi_id: "42".to_owned(),
            name: "ACME Santé".to_owned(),
            tier: Tier::Tier2,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&company).expect("serialize");
        assert_eq!(value["glpiId"], "42");
        assert_eq!(value["taux"], "taux2");
    }
}
