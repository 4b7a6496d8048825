//! Gateway request and response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::flight::FlightDescriptor;
use crate::privilege::{HistoryEntry, PrivilegeSnapshot};
use crate::ticket::{TicketDescriptor, TicketStatus};

/// Body of a purchase request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub flight_number: String,
    pub price: i64,
    #[serde(default)]
    pub paid_from_balance: bool,
}

/// Loyalty account as shown to its owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrivilegeInfo {
    pub balance: i64,
    pub status: String,
}

impl From<PrivilegeSnapshot> for PrivilegeInfo {
    fn from(snapshot: PrivilegeSnapshot) -> Self {
        Self {
            balance: snapshot.balance,
            status: snapshot.status,
        }
    }
}

/// Outcome of a completed purchase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResult {
    pub ticket_uid: String,
    pub flight_number: String,
    pub from_airport: String,
    pub to_airport: String,
    pub date: DateTime<Utc>,
    pub price: i64,
    pub paid_by_money: i64,
    pub paid_by_bonuses: i64,
    pub status: TicketStatus,
    pub privilege: PrivilegeInfo,
}

/// A ticket joined with its flight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TicketInfo {
    pub ticket_uid: String,
    pub flight_number: String,
    pub from_airport: String,
    pub to_airport: String,
    pub date: DateTime<Utc>,
    pub price: i64,
    pub status: TicketStatus,
}

impl TicketInfo {
    pub fn compose(ticket: TicketDescriptor, flight: FlightDescriptor) -> Self {
        Self {
            ticket_uid: ticket.ticket_uid,
            flight_number: ticket.flight_number,
            from_airport: flight.from_airport,
            to_airport: flight.to_airport,
            date: flight.date,
            price: ticket.price,
            status: ticket.status,
        }
    }
}

/// The `/me` view: all tickets plus the loyalty account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub tickets: Vec<TicketInfo>,
    pub privilege: PrivilegeInfo,
}

/// Loyalty account with its full history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrivilegeSummary {
    pub balance: i64,
    pub status: String,
    pub history: Vec<HistoryEntry>,
}

/// Paginated flight listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightsPage {
    pub page: u32,
    pub page_size: u32,
    pub total_elements: i64,
    pub items: Vec<FlightDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_request_defaults_to_money() {
        let request: PurchaseRequest =
            serde_json::from_str(r#"{"flightNumber":"SU100","price":1000}"#).unwrap();
        assert!(!request.paid_from_balance);
    }

    #[test]
    fn test_purchase_result_wire_format() {
        let result = PurchaseResult {
            ticket_uid: "uid".to_string(),
            flight_number: "SU100".to_string(),
            from_airport: "Москва Шереметьево".to_string(),
            to_airport: "Санкт-Петербург Пулково".to_string(),
            date: "2021-10-08T20:00:00Z".parse().unwrap(),
            price: 1000,
            paid_by_money: 700,
            paid_by_bonuses: 300,
            status: TicketStatus::Paid,
            privilege: PrivilegeInfo {
                balance: 0,
                status: "BRONZE".to_string(),
            },
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["ticketUid"], "uid");
        assert_eq!(json["paidByMoney"], 700);
        assert_eq!(json["paidByBonuses"], 300);
        assert_eq!(json["status"], "PAID");
        assert_eq!(json["privilege"]["balance"], 0);
        assert_eq!(json["privilege"]["status"], "BRONZE");
    }

    #[test]
    fn test_flights_page_wire_format() {
        let page = FlightsPage {
            page: 1,
            page_size: 10,
            total_elements: 0,
            items: vec![],
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["totalElements"], 0);
    }
}
