//! Ticket payloads
//!
//! Fully formed by the server or the caller. Amounts are already computed;
//! nothing here is validated against business rules.

use serde::{Deserialize, Deserializer, Serialize};

/// A ticket to render, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TicketPayload {
    Receipt(ReceiptTicket),
    Kitchen(KitchenTicket),
}

impl TicketPayload {
    /// Interpret the content of a queued print job
    ///
    /// Content may arrive as an object or as a JSON-encoded string. Content
    /// without a `kind` tag is a kitchen ticket, which is what the queue
    /// carries by default.
    pub fn from_job_content(content: &serde_json::Value) -> Result<Self, serde_json::Error> {
        let decoded;
        let value = match content {
            serde_json::Value::String(raw) => {
                decoded = serde_json::from_str::<serde_json::Value>(raw)?;
                &decoded
            }
            other => other,
        };

        if value.get("kind").is_some() {
            TicketPayload::deserialize(value)
        } else {
            KitchenTicket::deserialize(value).map(TicketPayload::Kitchen)
        }
    }

    /// Short label for logs and document titles
    pub fn label(&self) -> String {
        match self {
            TicketPayload::Receipt(r) => format!("receipt-{}", r.order_id),
            TicketPayload::Kitchen(k) => format!("kitchen-{}", k.table),
        }
    }
}

/// Customer receipt (payment ticket)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptTicket {
    #[serde(alias = "order", deserialize_with = "string_or_number")]
    pub order_id: String,
    /// Server / cashier attending the order
    #[serde(default, alias = "cashier")]
    pub server_name: Option<String>,
    #[serde(default, alias = "items")]
    pub lines: Vec<ReceiptLine>,
    pub subtotal: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub tip: f64,
    /// Amount due, computed upstream
    pub total: f64,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub change_due: f64,
    /// The order was already printed once; marks the copy as a reprint
    #[serde(default)]
    pub reprint: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptLine {
    #[serde(alias = "name")]
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(alias = "method")]
    pub method_name: String,
    pub amount: f64,
}

/// Kitchen / bar order ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenTicket {
    #[serde(default, alias = "titulo")]
    pub title: String,
    /// Table or order label
    #[serde(
        default,
        alias = "numero_mesa",
        alias = "table_label",
        deserialize_with = "string_or_number"
    )]
    pub table: String,
    #[serde(default, alias = "mozo", alias = "waiter")]
    pub preparer: Option<String>,
    #[serde(default, alias = "fecha")]
    pub timestamp: Option<String>,
    #[serde(default, alias = "lines")]
    pub items: Vec<KitchenLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenLine {
    #[serde(alias = "qty", alias = "cantidad")]
    pub quantity: f64,
    #[serde(alias = "name", alias = "producto")]
    pub item_name: String,
    #[serde(default, alias = "nota")]
    pub note: Option<String>,
}

impl KitchenLine {
    /// The note, if it has any visible text
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

/// Labels and ids are sent as either strings or numbers
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_untagged_content_is_kitchen() {
        let content = json!({
            "title": "NEW ORDER",
            "table": "5",
            "items": [{"qty": 2, "name": "Burger", "note": "no onion"}]
        });

        let TicketPayload::Kitchen(ticket) = TicketPayload::from_job_content(&content).unwrap()
        else {
            panic!("expected kitchen ticket");
        };
        assert_eq!(ticket.title, "NEW ORDER");
        assert_eq!(ticket.table, "5");
        assert_eq!(ticket.items[0].quantity, 2.0);
        assert_eq!(ticket.items[0].note(), Some("no onion"));
    }

    #[test]
    fn test_legacy_kitchen_fields_and_numeric_table() {
        let content = json!({
            "titulo": "NUEVO PEDIDO",
            "numero_mesa": 12,
            "mozo": "Ana",
            "fecha": "17-10-2026 20:15",
            "items": [{"cantidad": 1, "producto": "Lomo", "nota": ""}]
        });

        let TicketPayload::Kitchen(ticket) = TicketPayload::from_job_content(&content).unwrap()
        else {
            panic!("expected kitchen ticket");
        };
        assert_eq!(ticket.table, "12");
        assert_eq!(ticket.preparer.as_deref(), Some("Ana"));
        assert_eq!(ticket.items[0].item_name, "Lomo");
        assert_eq!(ticket.items[0].note(), None);
    }

    #[test]
    fn test_string_encoded_content() {
        let content = json!(r#"{"title":"BAR","table":"3","items":[]}"#);
        let payload = TicketPayload::from_job_content(&content).unwrap();
        assert_eq!(payload.label(), "kitchen-3");
    }

    #[test]
    fn test_tagged_receipt_content() {
        let content = json!({
            "kind": "receipt",
            "order_id": 1001,
            "lines": [{"description": "Coffee", "quantity": 2, "unit_price": 1500}],
            "subtotal": 3000,
            "total": 3000
        });

        let TicketPayload::Receipt(receipt) = TicketPayload::from_job_content(&content).unwrap()
        else {
            panic!("expected receipt");
        };
        assert_eq!(receipt.order_id, "1001");
        assert_eq!(receipt.discount, 0.0);
        assert!(!receipt.reprint);
    }

    #[test]
    fn test_malformed_content() {
        assert!(TicketPayload::from_job_content(&json!({"items": "nope"})).is_err());
        assert!(TicketPayload::from_job_content(&json!("{not json")).is_err());
    }
}
