//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use comptoir_core::{CompanyId, Email, UserId, UserRole};

/// A user account (domain type).
///
/// The password hash deliberately lives outside this struct; repositories
/// hand it out only to the authentication path.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    /// External GLPI user identifier (unique).
    pub glpi_id: String,
    pub role: UserRole,
    /// Role-keyed attribute bag.
    pub specs: serde_json::Map<String, serde_json::Value>,
    /// Companies this user may act on behalf of.
    pub companies: Vec<CompanyId>,
    /// The single company the user is currently acting for, if any.
    pub selected_company: Option<CompanyId>,
    pub created_at: DateTime<Utc>,
}

/// Mutation payload for creating or updating a user.
///
/// [`UserDraft::normalize`] is applied before every persist, so the
/// selected-company and client-spec invariants hold no matter which
/// route produced the draft.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub email: Email,
    pub name: String,
    pub glpi_id: String,
    pub role: UserRole,
    pub specs: serde_json::Map<String, serde_json::Value>,
    pub companies: Vec<CompanyId>,
    pub selected_company: Option<CompanyId>,
}

impl UserDraft {
    /// Enforce the user invariants:
    /// - the selected company, when set, must be an element of the
    ///   company set (auto-added if missing);
    /// - client accounts get a lazily-initialised `client` spec bag.
    pub fn normalize(&mut self) {
        if let Some(selected) = self.selected_company
            && !self.companies.contains(&selected)
        {
            self.companies.push(selected);
        }

        if self.role == UserRole::Client && !self.specs.contains_key("client") {
            self.specs.insert(
                "client".to_owned(),
                serde_json::Value::Object(serde_json::Map::new()),
            );
        }
    }
}

/// Authenticated identity snapshot stored in the session.
///
/// `selected_company` is re-read from the database on every request so a
/// selection made in one request is seen by the next.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
    pub glpi_id: String,
    pub selected_company: Option<CompanyId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(role: UserRole) -> UserDraft {
        UserDraft {
            email: Email::parse("user@example.com").expect("valid"),
            name: "Test".to_owned(),
            glpi_id: "77".to_owned(),
            role,
            specs: serde_json::Map::new(),
            companies: vec![CompanyId::new(1)],
            selected_company: None,
        }
    }

    #[test]
    fn test_selected_company_auto_added() {
        let mut d = draft(UserRole::User);
        d.selected_company = Some(CompanyId::new(9));
        d.normalize();
        assert!(d.companies.contains(&CompanyId::new(9)));

        // Already-listed companies are not duplicated.
        d.normalize();
        assert_eq!(
            d.companies.iter().filter(|c| **c == CompanyId::new(9)).count(),
            1
        );
    }

    #[test]
    fn test_client_specs_lazily_initialised() {
        let mut d = draft(UserRole::Client);
        d.normalize();
        assert!(d.specs.get("client").is_some_and(serde_json::Value::is_object));

        // Existing bag is left alone.
        d.specs
            .insert("client".to_owned(), serde_json::json!({"phone": "0102"}));
        d.normalize();
        assert_eq!(d.specs["client"]["phone"], "0102");
    }

    #[test]
    fn test_non_client_specs_untouched() {
        let mut d = draft(UserRole::Admin);
        d.normalize();
        assert!(d.specs.is_empty());
    }
}
