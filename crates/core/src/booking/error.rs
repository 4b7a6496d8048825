//! Booking error taxonomy.

use thiserror::Error;

use crate::clients::UpstreamError;

/// Errors surfaced by the booking orchestrator.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BookingError {
    /// The flight directory has no flight with this number.
    #[error("cannot locate flight {0}")]
    FlightNotFound(String),

    /// The flight directory could not be queried.
    #[error("cannot locate flight {flight_number}: {source}")]
    FlightLookupFailed {
        flight_number: String,
        source: UpstreamError,
    },

    /// No ticket with this UID belongs to the user.
    #[error("ticket {0} not found")]
    TicketNotFound(String),

    /// The user has no loyalty account.
    #[error("no privilege account for user {0}")]
    PrivilegeNotFound(String),

    /// The request was rejected before any downstream call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A downstream call failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The ticket was issued but the loyalty ledger could not be updated;
    /// the ticket has been canceled in compensation.
    #[error("loyalty ledger update failed for ticket {ticket_uid}: {source}")]
    LoyaltySyncFailed {
        ticket_uid: String,
        source: UpstreamError,
    },
}

impl BookingError {
    /// The underlying downstream failure, if any.
    pub fn upstream(&self) -> Option<&UpstreamError> {
        match self {
            BookingError::FlightLookupFailed { source, .. }
            | BookingError::LoyaltySyncFailed { source, .. }
            | BookingError::Upstream(source) => Some(source),
            _ => None,
        }
    }
}
