//! Ticket storage trait.

use crate::store::StoreError;
use crate::ticket::{NewTicket, Ticket, TicketDescriptor};

/// Trait for ticket storage backends.
pub trait TicketStore: Send + Sync {
    /// Create a ticket. An empty `ticket_uid` gets a freshly generated UUID.
    fn create(&self, ticket: NewTicket) -> Result<Ticket, StoreError>;

    /// Get a ticket by internal ID.
    fn get(&self, id: i64) -> Result<Option<Ticket>, StoreError>;

    /// Get a ticket by its UID, only if it belongs to `username`.
    fn get_by_uid(&self, username: &str, ticket_uid: &str) -> Result<Option<Ticket>, StoreError>;

    /// List tickets, optionally only those owned by `username`.
    fn list(&self, username: Option<&str>) -> Result<Vec<Ticket>, StoreError>;

    /// Overwrite flight number, price and status of the ticket with the given UID.
    fn update_by_uid(&self, update: &TicketDescriptor) -> Result<Ticket, StoreError>;

    /// Delete a ticket, returning the removed row.
    fn delete(&self, id: i64) -> Result<Ticket, StoreError>;
}
