//! GLPI helpdesk bridge.
//!
//! Orders are not persisted locally: placing one opens a GLPI ticket
//! through the REST API, scoped to the buyer's company entity and
//! assigned to the sales group. Each order runs a short-lived API
//! session (init, ticket creation, assignment, kill).

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::GlpiConfig;

/// GLPI ticket type for "request" (as opposed to incident).
const TICKET_TYPE_REQUEST: u8 = 2;
/// GLPI status "processing (assigned)".
const TICKET_STATUS_ASSIGNED: u8 = 2;
/// GLPI priority "medium".
const TICKET_PRIORITY_MEDIUM: u8 = 3;
/// ITIL category under which order tickets are filed.
const TICKET_CATEGORY_ORDERS: u8 = 20;
/// Group the ticket is assigned to (sales).
const ASSIGNED_GROUP_ID: u8 = 16;
/// `Ticket_User` link type "requester".
const LINK_TYPE_REQUESTER: u8 = 1;

/// Errors from the GLPI REST API bridge.
#[derive(Debug, thiserror::Error)]
pub enum GlpiError {
    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GLPI answered with a non-success status.
    #[error("GLPI API error (status {status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// GLPI answered 2xx but the body was not the expected shape.
    #[error("malformed GLPI response: {0}")]
    MalformedResponse(String),
}

/// How the order should be shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    /// Ship directly to the end client.
    Client,
    /// Ship to the technician.
    Technician,
    /// Ship to the IMP360 office.
    Imp360,
}

impl DeliveryType {
    fn label(self) -> &'static str {
        match self {
            Self::Client => "Envoi chez le client",
            Self::Technician => "Envoi chez le technicien",
            Self::Imp360 => "Envoi chez IMP360",
        }
    }
}

/// One ordered line as sent by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

/// An order to be turned into a GLPI ticket.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderTicket {
    pub title: String,
    pub items: Vec<OrderLine>,
    pub total: f64,
    #[serde(rename = "deliveryType")]
    pub delivery_type: DeliveryType,
    /// Free-text company name shown in the ticket body, if the client
    /// sent one.
    pub company: Option<String>,
    #[serde(rename = "clientName")]
    pub client_name: String,
    #[serde(rename = "clientPhone")]
    pub client_phone: String,
    #[serde(rename = "clientEmail")]
    pub client_email: String,
}

impl OrderTicket {
    /// Render the plain-text ticket body.
    #[must_use]
    pub fn content(&self) -> String {
        let lines: String = self
            .items
            .iter()
            .map(|item| format!("- {} ({} × {}€)", item.name, item.quantity, item.price))
            .collect::<Vec<_>>()
            .join("\n");

        let company = self
            .company
            .as_ref()
            .map(|name| format!("\nEntreprise : {name}"))
            .unwrap_or_default();

        format!(
            "Informations du client :\n\
             Nom et Prénom : {name}\n\
             Téléphone : {phone}\n\
             Email : {email}\n\
             \n\
             Commande de produits :\n\
             {lines}\n\
             \n\
             Total de la commande : {total:.2}€{company}\n\
             Mode de livraison : {delivery}",
            name = self.client_name,
            phone = self.client_phone,
            email = self.client_email,
            total = self.total,
            delivery = self.delivery_type.label(),
        )
    }
}

#[derive(Deserialize)]
struct SessionResponse {
    session_token: String,
}

#[derive(Deserialize)]
struct TicketResponse {
    id: i64,
}

#[derive(Serialize)]
struct Input<T: Serialize> {
    input: T,
}

/// Client for the GLPI REST API.
#[derive(Clone)]
pub struct GlpiClient {
    client: reqwest::Client,
    config: GlpiConfig,
}

impl GlpiClient {
    /// Create a new GLPI client from configuration.
    #[must_use]
    pub fn new(config: &GlpiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: config.clone(),
        }
    }

    /// File an order ticket: open a session, create the ticket in the
    /// company's entity, assign the sales group and the requesting user,
    /// then close the session.
    ///
    /// Returns the GLPI ticket id.
    ///
    /// # Errors
    ///
    /// Returns [`GlpiError`] if any API call up to and including the
    /// requester link fails. A failure to close the session is only
    /// logged; the ticket exists at that point.
    #[instrument(skip(self, order), fields(title = %order.title))]
    pub async fn create_order_ticket(
        &self,
        order: &OrderTicket,
        entity_id: i64,
        requester_glpi_id: &str,
    ) -> Result<i64, GlpiError> {
        let session = self.init_session().await?;

        let result = self
            .file_ticket(&session, order, entity_id, requester_glpi_id)
            .await;

        if let Err(err) = self.kill_session(&session).await {
            warn!(error = %err, "failed to close GLPI session");
        }

        result
    }

    async fn file_ticket(
        &self,
        session: &str,
        order: &OrderTicket,
        entity_id: i64,
        requester_glpi_id: &str,
    ) -> Result<i64, GlpiError> {
        let ticket: TicketResponse = self
            .post_json(
                session,
                "Ticket",
                &Input {
                    input: serde_json::json!({
                        "name": order.title,
                        "content": order.content(),
                        "entities_id": entity_id,
                        "type": TICKET_TYPE_REQUEST,
                        "status": TICKET_STATUS_ASSIGNED,
                        "priority": TICKET_PRIORITY_MEDIUM,
                        "itilcategories_id": TICKET_CATEGORY_ORDERS,
                    }),
                },
            )
            .await?;

        debug!(ticket_id = ticket.id, "GLPI ticket created");

        // Assign the sales group.
        let response = self
            .client
            .put(format!("{}/Ticket/{}", self.config.api_url, ticket.id))
            .header("Session-Token", session)
            .header("App-Token", self.config.app_token.expose_secret())
            .json(&Input {
                input: serde_json::json!({ "_groups_id_assign": ASSIGNED_GROUP_ID }),
            })
            .send()
            .await?;
        Self::check_status(response).await?;

        // Link the buyer as requester.
        let response = self
            .client
            .post(format!("{}/Ticket_User", self.config.api_url))
            .header("Session-Token", session)
            .header("App-Token", self.config.app_token.expose_secret())
            .json(&Input {
                input: serde_json::json!({
                    "tickets_id": ticket.id,
                    "users_id": requester_glpi_id,
                    "type": LINK_TYPE_REQUESTER,
                }),
            })
            .send()
            .await?;
        Self::check_status(response).await?;

        Ok(ticket.id)
    }

    async fn init_session(&self) -> Result<String, GlpiError> {
        let response = self
            .client
            .get(format!("{}/initSession", self.config.api_url))
            .basic_auth(
                &self.config.username,
                Some(self.config.password.expose_secret()),
            )
            .header("App-Token", self.config.app_token.expose_secret())
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| GlpiError::MalformedResponse(e.to_string()))?;

        Ok(session.session_token)
    }

    async fn kill_session(&self, session: &str) -> Result<(), GlpiError> {
        let response = self
            .client
            .get(format!("{}/killSession", self.config.api_url))
            .header("Session-Token", session)
            .header("App-Token", self.config.app_token.expose_secret())
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        session: &str,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, GlpiError> {
        let response = self
            .client
            .post(format!("{}/{path}", self.config.api_url))
            .header("Session-Token", session)
            .header("App-Token", self.config.app_token.expose_secret())
            .json(body)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| GlpiError::MalformedResponse(e.to_string()))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GlpiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(GlpiError::Api { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> OrderTicket {
        OrderTicket {
            title: "Commande Latitude".to_owned(),
            items: vec![
                OrderLine {
                    name: "Latitude 5430".to_owned(),
                    quantity: 2,
                    price: 850.0,
                },
                OrderLine {
                    name: "Dock WD19S".to_owned(),
                    quantity: 1,
                    price: 120.5,
                },
            ],
            total: 1820.5,
            delivery_type: DeliveryType::Technician,
            company: Some("ACME Santé".to_owned()),
            client_name: "Jeanne Martin".to_owned(),
            client_phone: "0601020304".to_owned(),
            client_email: "jeanne@acme.example".to_owned(),
        }
    }

    #[test]
    fn test_ticket_content_layout() {
        let content = order().content();

        assert!(content.starts_with("Informations du client :\nNom et Prénom : Jeanne Martin"));
        assert!(content.contains("- Latitude 5430 (2 × 850€)"));
        assert!(content.contains("- Dock WD19S (1 × 120.5€)"));
        assert!(content.contains("Total de la commande : 1820.50€"));
        assert!(content.contains("Entreprise : ACME Santé"));
        assert!(content.ends_with("Mode de livraison : Envoi chez le technicien"));
    }

    #[test]
    fn test_ticket_content_without_company() {
        let mut o = order();
        o.company = None;
        let content = o.content();

        assert!(!content.contains("Entreprise :"));
        assert!(content.contains("Total de la commande : 1820.50€\nMode de livraison :"));
    }

    #[test]
    fn test_delivery_type_deserializes_lowercase() {
        assert_eq!(
            serde_json::from_str::<DeliveryType>("\"imp360\"").expect("parse"),
            DeliveryType::Imp360
        );
        assert_eq!(
            serde_json::from_str::<DeliveryType>("\"client\"").expect("parse"),
            DeliveryType::Client
        );
    }
}
