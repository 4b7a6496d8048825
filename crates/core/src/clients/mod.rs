//! Downstream service clients used by the gateway.
//!
//! Each ledger service is reached only through its REST contract. The traits
//! here are the seams the booking orchestrator depends on; the `Http*`
//! implementations talk to the real services and `crate::testing` provides
//! in-memory mocks.

mod flight;
mod http;
mod privilege;
mod ticket;

pub use flight::HttpFlightDirectory;
pub use http::build_client;
pub use privilege::HttpPrivilegeLedger;
pub use ticket::HttpTicketLedger;

use async_trait::async_trait;
use thiserror::Error;

use crate::flight::{FlightDescriptor, Paging};
use crate::privilege::{HistoryEntry, NewHistoryEntry, PrivilegeSnapshot};
use crate::ticket::{NewTicket, TicketDescriptor};

/// Header carrying the acting user.
pub const USER_HEADER: &str = "X-User-Name";
/// Header carrying a ticket UID, on creation responses and UID lookups.
pub const TICKET_UID_HEADER: &str = "X-Ticket-UID";
/// Header selecting flights by number.
pub const FLIGHT_NUMBER_HEADER: &str = "flightNumber";
/// Header carrying the unpaged row count of a paginated listing.
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// Errors from a downstream service call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UpstreamError {
    /// The call did not complete within the configured timeout.
    #[error("{service} service timed out")]
    Timeout { service: &'static str },

    /// Connection failed or the request could not be sent.
    #[error("{service} service unavailable: {message}")]
    Unavailable {
        service: &'static str,
        message: String,
    },

    /// The service answered with a non-success status.
    #[error("{service} service returned {status}: {message}")]
    Status {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Failed to parse {service} response: {message}")]
    Parse {
        service: &'static str,
        message: String,
    },

    /// A required response header was absent.
    #[error("{service} response missing header {header}")]
    MissingHeader {
        service: &'static str,
        header: &'static str,
    },

    /// The request could not be built from the given input, so nothing was sent.
    #[error("invalid {service} request: {message}")]
    InvalidRequest {
        service: &'static str,
        message: String,
    },
}

impl UpstreamError {
    pub fn service(&self) -> &'static str {
        match self {
            UpstreamError::Timeout { service }
            | UpstreamError::Unavailable { service, .. }
            | UpstreamError::Status { service, .. }
            | UpstreamError::Parse { service, .. }
            | UpstreamError::MissingHeader { service, .. }
            | UpstreamError::InvalidRequest { service, .. } => service,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Timeout { .. })
    }
}

/// One page of the flight listing plus the unpaged total.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightPage {
    pub items: Vec<FlightDescriptor>,
    pub total: i64,
}

/// Read access to the flight directory.
#[async_trait]
pub trait FlightDirectory: Send + Sync {
    /// Look up a flight by number. `None` when the directory has no match.
    async fn find_flight(
        &self,
        flight_number: &str,
    ) -> Result<Option<FlightDescriptor>, UpstreamError>;

    /// One page of the flight listing.
    async fn list_flights(&self, paging: Paging) -> Result<FlightPage, UpstreamError>;
}

/// Access to the ticket ledger.
#[async_trait]
pub trait TicketLedger: Send + Sync {
    /// Create a ticket, returning the UID the ledger assigned.
    async fn create_ticket(&self, ticket: &NewTicket) -> Result<String, UpstreamError>;

    /// All tickets owned by `username`.
    async fn list_tickets(&self, username: &str) -> Result<Vec<TicketDescriptor>, UpstreamError>;

    /// A ticket by UID, only if owned by `username`.
    async fn find_ticket(
        &self,
        username: &str,
        ticket_uid: &str,
    ) -> Result<Option<TicketDescriptor>, UpstreamError>;

    /// Overwrite the ticket with the descriptor's UID.
    async fn update_ticket(&self, ticket: &TicketDescriptor) -> Result<(), UpstreamError>;
}

/// Access to the privilege (loyalty) ledger.
#[async_trait]
pub trait PrivilegeLedger: Send + Sync {
    /// The user's loyalty account. `None` when no account exists.
    async fn get_privilege(
        &self,
        username: &str,
    ) -> Result<Option<PrivilegeSnapshot>, UpstreamError>;

    /// Overwrite the account's balance and status.
    async fn update_privilege(&self, privilege: &PrivilegeSnapshot) -> Result<(), UpstreamError>;

    /// Append one balance history entry.
    async fn append_history(&self, entry: &NewHistoryEntry) -> Result<(), UpstreamError>;

    /// The account's full history, oldest first.
    async fn history(&self, username: &str) -> Result<Vec<HistoryEntry>, UpstreamError>;
}
