//! Ticket ledger: issued tickets and their status.

mod sqlite_store;
mod store;
mod types;

pub use sqlite_store::SqliteTicketStore;
pub use store::TicketStore;
pub use types::{NewTicket, Ticket, TicketDescriptor, TicketStatus};
