//! Tests for the order-ticket payload as sent by the web client.
//!
//! The JSON shape and the rendered French ticket body are a wire contract
//! with the existing frontend and the GLPI helpdesk; these tests pin both.

use comptoir_server::services::OrderTicket;

fn payload(company: &str) -> serde_json::Value {
    serde_json::json!({
        "title": "Commande M. Dupont",
        "items": [
            { "name": "Poste fixe HP", "quantity": 2, "price": 488.0 },
            { "name": "Écran 24\"", "quantity": 1, "price": 95.5 }
        ],
        "total": 1071.5,
        "deliveryType": "client",
        "company": company,
        "clientName": "Jean Dupont",
        "clientPhone": "06 12 34 56 78",
        "clientEmail": "jean.dupont@example.com"
    })
}

#[test]
fn test_order_payload_deserializes() {
    let order: OrderTicket = serde_json::from_value(payload("Cabinet Dupont")).expect("payload");

    assert_eq!(order.title, "Commande M. Dupont");
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].quantity, 2);
    assert_eq!(order.company.as_deref(), Some("Cabinet Dupont"));
}

#[test]
fn test_ticket_body_layout() {
    let order: OrderTicket = serde_json::from_value(payload("Cabinet Dupont")).expect("payload");
    let content = order.content();

    assert!(content.starts_with("Informations du client :\nNom et Prénom : Jean Dupont\n"));
    assert!(content.contains("- Poste fixe HP (2 × 488€)"));
    assert!(content.contains("Total de la commande : 1071.50€"));
    assert!(content.contains("Entreprise : Cabinet Dupont"));
    assert!(content.ends_with("Mode de livraison : Envoi chez le client"));
}

#[test]
fn test_ticket_body_without_company() {
    let mut value = payload("");
    value["company"] = serde_json::Value::Null;
    let order: OrderTicket = serde_json::from_value(value).expect("payload");

    assert!(!order.content().contains("Entreprise"));
}

#[test]
fn test_delivery_type_labels() {
    for (wire, label) in [
        ("client", "Envoi chez le client"),
        ("technician", "Envoi chez le technicien"),
        ("imp360", "Envoi chez IMP360"),
    ] {
        let mut value = payload("X");
        value["deliveryType"] = serde_json::Value::String(wire.to_owned());
        let order: OrderTicket = serde_json::from_value(value).expect("payload");
        assert!(order.content().contains(label), "missing label for {wire}");
    }
}

#[test]
fn test_unknown_delivery_type_is_rejected() {
    let mut value = payload("X");
    value["deliveryType"] = serde_json::Value::String("pigeon".to_owned());
    assert!(serde_json::from_value::<OrderTicket>(value).is_err());
}
