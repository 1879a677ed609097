//! Catalogue categories and their per-category spec shapes.
//!
//! Every product belongs to exactly one category from a closed
//! enumeration, and carries a spec bag whose shape is fixed by that
//! category. The wire labels are the French catalogue names used by the
//! source spreadsheets and the frontend, so they round-trip unchanged.

use serde::{Deserialize, Serialize};

/// Catalogue category (closed enumeration).
///
/// Serialized with the French wire labels the catalogue has always used,
/// e.g. `Category::Computers` is `"ordinateurs"` on the wire and in the
/// database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "ordinateurs")]
    Computers,
    #[serde(rename = "écrans")]
    Monitors,
    #[serde(rename = "réseaux - nas")]
    NetworkNas,
    #[serde(rename = "accessoires")]
    Accessories,
    #[serde(rename = "robot epson")]
    EpsonRobot,
    #[serde(rename = "onduleurs")]
    Ups,
    #[serde(rename = "imprimantes & scanners")]
    PrintersScanners,
    #[serde(rename = "câbles")]
    Cables,
    #[serde(rename = "téléphone ip")]
    IpTelephony,
    #[serde(rename = "occasions")]
    UsedEquipment,
    #[serde(rename = "logiciels")]
    Software,
}

impl Category {
    /// All categories, in catalogue order.
    pub const ALL: [Self; 11] = [
        Self::Computers,
        Self::Monitors,
        Self::NetworkNas,
        Self::Accessories,
        Self::EpsonRobot,
        Self::Ups,
        Self::PrintersScanners,
        Self::Cables,
        Self::IpTelephony,
        Self::UsedEquipment,
        Self::Software,
    ];

    /// The wire label for this category.
    #[must_use]
    pub const fn as_label(&self) -> &'static str {
        match self {
            Self::Computers => "ordinateurs",
            Self::Monitors => "écrans",
            Self::NetworkNas => "réseaux - nas",
            Self::Accessories => "accessoires",
            Self::EpsonRobot => "robot epson",
            Self::Ups => "onduleurs",
            Self::PrintersScanners => "imprimantes & scanners",
            Self::Cables => "câbles",
            Self::IpTelephony => "téléphone ip",
            Self::UsedEquipment => "occasions",
            Self::Software => "logiciels",
        }
    }

    /// Parse a wire label back into a category.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_label() == label)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// Error converting a raw spec bag into a typed one.
#[derive(Debug, thiserror::Error)]
#[error("invalid specs for category {category}: {source}")]
pub struct SpecsError {
    /// The category the specs were validated against.
    pub category: Category,
    #[source]
    source: serde_json::Error,
}

/// Specs for the `ordinateurs` category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputerSpecs {
    #[serde(default)]
    pub cpu: String,
    #[serde(default)]
    pub cputype: String,
    #[serde(default)]
    pub ram: String,
    #[serde(default)]
    pub stockage: String,
    #[serde(default)]
    pub gpu: String,
    #[serde(default)]
    pub screen: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub burner: String,
    #[serde(default)]
    pub connections: String,
    #[serde(default)]
    pub alim: String,
    #[serde(default)]
    pub os: String,
}

/// Specs for the `écrans` category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorSpecs {
    #[serde(default)]
    pub displaysize: String,
    #[serde(default)]
    pub connections: String,
    #[serde(default)]
    pub resolution: String,
    #[serde(default)]
    pub contrast: String,
    #[serde(default, rename = "medicalCE")]
    pub medical_ce: String,
    #[serde(default)]
    pub support: String,
    #[serde(default)]
    pub cord: String,
    #[serde(default)]
    pub captor: String,
}

/// Specs for the `réseaux - nas` category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkNasSpecs {
    #[serde(default)]
    pub racks: String,
    #[serde(default)]
    pub poe: String,
    #[serde(default, rename = "poePower")]
    pub poe_power: String,
    #[serde(default)]
    pub alim: String,
}

/// Specs for the `accessoires` and `robot epson` categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CableOnlySpecs {
    #[serde(default)]
    pub cable: String,
}

/// Specs for the `onduleurs` and `occasions` categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraDescriptionSpecs {
    #[serde(default)]
    pub description3: String,
}

/// Specs for the `imprimantes & scanners` category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterSpecs {
    #[serde(default)]
    pub rectoverso: String,
    #[serde(default)]
    pub charger: String,
    #[serde(default)]
    pub norm: String,
    #[serde(default)]
    pub cable: String,
    #[serde(default)]
    pub cord: String,
    #[serde(default)]
    pub optionbac: String,
    #[serde(default)]
    pub alim: String,
}

/// Specs for the `câbles` category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CableSpecs {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub cord: String,
    #[serde(default)]
    pub norme: String,
    #[serde(default)]
    pub longueur: String,
    #[serde(default)]
    pub connecteur: String,
}

/// Specs for the `téléphone ip` category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpPhoneSpecs {
    #[serde(default)]
    pub alim: String,
    #[serde(default)]
    pub description2: String,
}

/// Specs for the `logiciels` category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftwareSpecs {
    #[serde(default)]
    pub description2: String,
}

/// Category-specific product specs.
///
/// The variant is picked from the product's [`Category`], never from a
/// tag inside the JSON: stored and transmitted spec bags are the bare
/// objects. Keys not in the category's shape are dropped on the way in;
/// missing keys default to the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProductSpecs {
    Computers(ComputerSpecs),
    Monitors(MonitorSpecs),
    NetworkNas(NetworkNasSpecs),
    Accessories(CableOnlySpecs),
    EpsonRobot(CableOnlySpecs),
    Ups(ExtraDescriptionSpecs),
    PrintersScanners(PrinterSpecs),
    Cables(CableSpecs),
    IpTelephony(IpPhoneSpecs),
    UsedEquipment(ExtraDescriptionSpecs),
    Software(SoftwareSpecs),
}

impl ProductSpecs {
    /// Validate a raw spec bag against a category's shape.
    ///
    /// Unknown keys are dropped, missing keys become empty strings.
    ///
    /// # Errors
    ///
    /// Returns [`SpecsError`] if the value is not a JSON object with
    /// string-compatible fields (e.g. a nested object where a string is
    /// expected).
    pub fn from_value(category: Category, value: serde_json::Value) -> Result<Self, SpecsError> {
        let wrap = |source| SpecsError { category, source };
        Ok(match category {
            Category::Computers => {
                Self::Computers(serde_json::from_value(value).map_err(wrap)?)
            }
            Category::Monitors => Self::Monitors(serde_json::from_value(value).map_err(wrap)?),
            Category::NetworkNas => {
                Self::NetworkNas(serde_json::from_value(value).map_err(wrap)?)
            }
            Category::Accessories => {
                Self::Accessories(serde_json::from_value(value).map_err(wrap)?)
            }
            Category::EpsonRobot => {
                Self::EpsonRobot(serde_json::from_value(value).map_err(wrap)?)
            }
            Category::Ups => Self::Ups(serde_json::from_value(value).map_err(wrap)?),
            Category::PrintersScanners => {
                Self::PrintersScanners(serde_json::from_value(value).map_err(wrap)?)
            }
            Category::Cables => Self::Cables(serde_json::from_value(value).map_err(wrap)?),
            Category::IpTelephony => {
                Self::IpTelephony(serde_json::from_value(value).map_err(wrap)?)
            }
            Category::UsedEquipment => {
                Self::UsedEquipment(serde_json::from_value(value).map_err(wrap)?)
            }
            Category::Software => Self::Software(serde_json::from_value(value).map_err(wrap)?),
        })
    }

    /// An empty spec bag for a category (all fields defaulted).
    #[must_use]
    pub fn empty(category: Category) -> Self {
        match category {
            Category::Computers => Self::Computers(ComputerSpecs::default()),
            Category::Monitors => Self::Monitors(MonitorSpecs::default()),
            Category::NetworkNas => Self::NetworkNas(NetworkNasSpecs::default()),
            Category::Accessories => Self::Accessories(CableOnlySpecs::default()),
            Category::EpsonRobot => Self::EpsonRobot(CableOnlySpecs::default()),
            Category::Ups => Self::Ups(ExtraDescriptionSpecs::default()),
            Category::PrintersScanners => Self::PrintersScanners(PrinterSpecs::default()),
            Category::Cables => Self::Cables(CableSpecs::default()),
            Category::IpTelephony => Self::IpTelephony(IpPhoneSpecs::default()),
            Category::UsedEquipment => Self::UsedEquipment(ExtraDescriptionSpecs::default()),
            Category::Software => Self::Software(SoftwareSpecs::default()),
        }
    }

    /// The category this spec bag belongs to.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Computers(_) => Category::Computers,
            Self::Monitors(_) => Category::Monitors,
            Self::NetworkNas(_) => Category::NetworkNas,
            Self::Accessories(_) => Category::Accessories,
            Self::EpsonRobot(_) => Category::EpsonRobot,
            Self::Ups(_) => Category::Ups,
            Self::PrintersScanners(_) => Category::PrintersScanners,
            Self::Cables(_) => Category::Cables,
            Self::IpTelephony(_) => Category::IpTelephony,
            Self::UsedEquipment(_) => Category::UsedEquipment,
            Self::Software(_) => Category::Software,
        }
    }

    /// Serialize to the bare JSON object stored in the database.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.as_label()), Some(category));
        }
    }

    #[test]
    fn test_category_serde_uses_wire_labels() {
        let json = serde_json::to_string(&Category::Computers).expect("serialize");
        assert_eq!(json, "\"ordinateurs\"");

        let cat: Category = serde_json::from_str("\"réseaux - nas\"").expect("deserialize");
        assert_eq!(cat, Category::NetworkNas);
    }

    #[test]
    fn test_category_rejects_unknown_label() {
        let result: Result<Category, _> = serde_json::from_str("\"bureautique\"");
        assert!(result.is_err());
        assert!(Category::from_label("bureautique").is_none());
    }

    #[test]
    fn test_specs_unknown_keys_are_dropped() {
        let raw = json!({
            "racks": "8",
            "poe": "oui",
            "couleur": "noir",
            "poids": "3 kg"
        });
        let specs = ProductSpecs::from_value(Category::NetworkNas, raw).expect("valid specs");

        let ProductSpecs::NetworkNas(nas) = &specs else {
            panic!("wrong variant");
        };
        assert_eq!(nas.racks, "8");
        assert_eq!(nas.poe, "oui");

        // The stored object contains exactly the category's whitelist.
        let value = specs.to_value();
        let obj = value.as_object().expect("object");
        assert_eq!(obj.len(), 4);
        assert!(!obj.contains_key("couleur"));
    }

    #[test]
    fn test_specs_missing_keys_default_to_empty() {
        let specs = ProductSpecs::from_value(Category::Computers, json!({"cpu": "i5"}))
            .expect("valid specs");
        let ProductSpecs::Computers(pc) = specs else {
            panic!("wrong variant");
        };
        assert_eq!(pc.cpu, "i5");
        assert_eq!(pc.ram, "");
    }

    #[test]
    fn test_specs_renamed_fields() {
        let specs = ProductSpecs::from_value(
            Category::Cables,
            json!({"type": "HDMI", "longueur": "2m"}),
        )
        .expect("valid specs");
        let ProductSpecs::Cables(cable) = &specs else {
            panic!("wrong variant");
        };
        assert_eq!(cable.kind, "HDMI");

        let value = specs.to_value();
        assert_eq!(value["type"], "HDMI");
    }

    #[test]
    fn test_specs_invalid_shape_is_an_error() {
        let err = ProductSpecs::from_value(Category::Software, json!({"description2": {}}))
            .expect_err("nested object should fail");
        assert_eq!(err.category, Category::Software);
    }
}
