//! Flight directory data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest page the paginated listing will return.
pub const MAX_PAGE_SIZE: u32 = 100;

/// An airport row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Airport {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub country: String,
}

/// Airport fields supplied on creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAirport {
    pub name: String,
    pub city: String,
    pub country: String,
}

/// A flight row as stored, with airports by reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: i64,
    pub flight_number: String,
    pub date_time: DateTime<Utc>,
    pub from_airport_id: i64,
    pub to_airport_id: i64,
    pub price: i64,
}

/// Flight fields supplied on creation or full update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewFlight {
    pub flight_number: String,
    pub date_time: DateTime<Utc>,
    pub from_airport_id: i64,
    pub to_airport_id: i64,
    pub price: i64,
}

/// Flight as exposed over the wire, airports rendered as "<city> <name>".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightDescriptor {
    pub flight_number: String,
    pub from_airport: String,
    pub to_airport: String,
    pub date: DateTime<Utc>,
    pub price: i64,
}

/// Normalized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: u32,
    pub size: u32,
}

impl Paging {
    /// Normalize raw query values: page < 1 becomes 1, size is clamped to
    /// `1..=MAX_PAGE_SIZE` with missing or non-positive values becoming 1.
    pub fn from_query(page: Option<i64>, size: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p > 0 => p.min(u32::MAX as i64) as u32,
            _ => 1,
        };
        let size = match size {
            Some(s) if s > 0 => s.min(MAX_PAGE_SIZE as i64) as u32,
            _ => 1,
        };
        Self { page, size }
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.size as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paging_defaults() {
        assert_eq!(Paging::from_query(None, None), Paging { page: 1, size: 1 });
        assert_eq!(
            Paging::from_query(Some(0), Some(-5)),
            Paging { page: 1, size: 1 }
        );
    }

    #[test]
    fn test_paging_clamps_size() {
        let paging = Paging::from_query(Some(3), Some(500));
        assert_eq!(paging.size, MAX_PAGE_SIZE);
        assert_eq!(paging.offset(), 200);
    }

    #[test]
    fn test_paging_offset() {
        assert_eq!(Paging::from_query(Some(2), Some(10)).offset(), 10);
        assert_eq!(Paging::from_query(Some(1), Some(10)).offset(), 0);
    }

    #[test]
    fn test_descriptor_wire_format() {
        let descriptor = FlightDescriptor {
            flight_number: "AFL031".to_string(),
            from_airport: "Санкт-Петербург Пулково".to_string(),
            to_airport: "Москва Шереметьево".to_string(),
            date: "2021-10-08T20:00:00Z".parse().unwrap(),
            price: 1500,
        };
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["flightNumber"], "AFL031");
        assert_eq!(json["fromAirport"], "Санкт-Петербург Пулково");
        assert_eq!(json["price"], 1500);
        assert!(json["date"].as_str().unwrap().starts_with("2021-10-08T20:00:00"));
    }
}
