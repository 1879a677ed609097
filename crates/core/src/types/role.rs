//! User roles.

use serde::{Deserialize, Serialize};

/// Account role with different permission levels.
///
/// Replaces the runtime string-set validation of the legacy system:
/// unknown roles are rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// End customer ordering on behalf of their companies.
    Client,
    /// Regular staff account.
    #[default]
    User,
    /// Full administrative access.
    Admin,
    /// Read-mostly administrative access.
    Moderator,
}

impl UserRole {
    /// True for roles allowed on the admin surface.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client => write!(f, "client"),
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
            Self::Moderator => write!(f, "moderator"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "moderator" => Ok(Self::Moderator),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display_round_trip() {
        for role in [
            UserRole::Client,
            UserRole::User,
            UserRole::Admin,
            UserRole::Moderator,
        ] {
            assert_eq!(UserRole::from_str(&role.to_string()), Ok(role));
        }
        assert!(UserRole::from_str("superuser").is_err());
    }

    #[test]
    fn test_only_admin_is_admin() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Moderator.is_admin());
        assert!(!UserRole::User.is_admin());
        assert!(!UserRole::Client.is_admin());
    }
}
