//! Company tariff tiers.

use serde::{Deserialize, Serialize};

/// Pricing tier assigned to a company.
///
/// Determines which product price field applies to that company's carts.
/// Wire labels keep the historical French names (`taux1`..`taux3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tier {
    #[default]
    #[serde(rename = "taux1")]
    Tier1,
    #[serde(rename = "taux2")]
    Tier2,
    #[serde(rename = "taux3")]
    Tier3,
}

impl Tier {
    /// The wire label for this tier.
    #[must_use]
    pub const fn as_label(&self) -> &'static str {
        match self {
            Self::Tier1 => "taux1",
            Self::Tier2 => "taux2",
            Self::Tier3 => "taux3",
        }
    }

    /// Parse a wire label back into a tier.
    #[must_use]
    pub const fn from_label(label: &str) -> Option<Self> {
        match label.as_bytes() {
            b"taux1" => Some(Self::Tier1),
            b"taux2" => Some(Self::Tier2),
            b"taux3" => Some(Self::Tier3),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("unknown tier: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_tier1() {
        assert_eq!(Tier::default(), Tier::Tier1);
    }

    #[test]
    fn test_labels_round_trip() {
        for tier in [Tier::Tier1, Tier::Tier2, Tier::Tier3] {
            assert_eq!(Tier::from_label(tier.as_label()), Some(tier));
        }
        assert_eq!(Tier::from_label("taux4"), None);
    }

    #[test]
    fn test_serde_wire_labels() {
        assert_eq!(
            serde_json::to_string(&Tier::Tier2).expect("serialize"),
            "\"taux2\""
        );
        let tier: Tier = serde_json::from_str("\"taux3\"").expect("deserialize");
        assert_eq!(tier, Tier::Tier3);
    }
}
