//! Ticket ledger data types.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a ticket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Paid,
    Canceled,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Paid => "PAID",
            TicketStatus::Canceled => "CANCELED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PAID" => Some(TicketStatus::Paid),
            "CANCELED" => Some(TicketStatus::Canceled),
            _ => None,
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ticket row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: i64,
    pub ticket_uid: String,
    pub username: String,
    pub flight_number: String,
    pub price: i64,
    pub status: TicketStatus,
}

/// Creation request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    /// Left empty by callers that want the ledger to generate one.
    #[serde(default)]
    pub ticket_uid: String,
    pub flight_number: String,
    pub username: String,
    pub price: i64,
    pub status: TicketStatus,
}

/// Ticket as listed to its owner, and the body of an update by UID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TicketDescriptor {
    pub ticket_uid: String,
    pub flight_number: String,
    pub price: i64,
    pub status: TicketStatus,
}

impl From<Ticket> for TicketDescriptor {
    fn from(ticket: Ticket) -> Self {
        Self {
            ticket_uid: ticket.ticket_uid,
            flight_number: ticket.flight_number,
            price: ticket.price,
            status: ticket.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_value(TicketStatus::Paid).unwrap(), "PAID");
        assert_eq!(
            serde_json::to_value(TicketStatus::Canceled).unwrap(),
            "CANCELED"
        );
        assert_eq!(TicketStatus::parse("CANCELED"), Some(TicketStatus::Canceled));
        assert_eq!(TicketStatus::parse("paid"), None);
    }

    #[test]
    fn test_new_ticket_uid_is_optional() {
        let ticket: NewTicket = serde_json::from_str(
            r#"{"flightNumber":"SU100","username":"alice","price":1000,"status":"PAID"}"#,
        )
        .unwrap();
        assert!(ticket.ticket_uid.is_empty());
        assert_eq!(ticket.flight_number, "SU100");
    }
}
