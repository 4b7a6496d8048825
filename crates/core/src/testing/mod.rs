//! Testing utilities and mock implementations of the downstream clients.
//!
//! The mocks let the booking orchestrator and the gateway router be exercised
//! without running the flight, ticket and bonus services.
//!
//! # Example
//!
//! ```rust,ignore
//! use skyward_core::testing::{fixtures, MockFlightDirectory, MockPrivilegeLedger, MockTicketLedger};
//!
//! let flights = MockFlightDirectory::with_flights(vec![fixtures::su100()]);
//! let tickets = MockTicketLedger::new();
//! let privileges = MockPrivilegeLedger::new();
//! privileges.add_account("alice", 300).await;
//!
//! // Fail the balance overwrite
//! privileges.fail(PrivilegeOp::Update, fixtures::unavailable("bonus")).await;
//! ```

mod mock_flight_directory;
mod mock_privilege_ledger;
mod mock_ticket_ledger;

pub use mock_flight_directory::MockFlightDirectory;
pub use mock_privilege_ledger::{MockPrivilegeLedger, PrivilegeOp};
pub use mock_ticket_ledger::{MockTicketLedger, TicketOp};

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::clients::UpstreamError;
    use crate::flight::FlightDescriptor;

    /// A flight descriptor with a fixed departure time.
    pub fn flight(number: &str, from: &str, to: &str, price: i64) -> FlightDescriptor {
        FlightDescriptor {
            flight_number: number.to_string(),
            from_airport: from.to_string(),
            to_airport: to.to_string(),
            date: Utc
                .with_ymd_and_hms(2021, 10, 8, 20, 0, 0)
                .single()
                .unwrap_or_else(Utc::now),
            price,
        }
    }

    /// Moscow to Saint Petersburg at 1000.
    pub fn su100() -> FlightDescriptor {
        flight(
            "SU100",
            "Москва Шереметьево",
            "Санкт-Петербург Пулково",
            1000,
        )
    }

    /// Saint Petersburg to Moscow at 1500.
    pub fn afl031() -> FlightDescriptor {
        flight(
            "AFL031",
            "Санкт-Петербург Пулково",
            "Москва Шереметьево",
            1500,
        )
    }

    pub fn unavailable(service: &'static str) -> UpstreamError {
        UpstreamError::Unavailable {
            service,
            message: "connection refused".to_string(),
        }
    }

    pub fn timeout(service: &'static str) -> UpstreamError {
        UpstreamError::Timeout { service }
    }
}
