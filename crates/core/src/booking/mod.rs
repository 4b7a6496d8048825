//! Ticket purchase orchestration and the gateway's read views.

mod decision;
mod error;
mod locks;
mod orchestrator;
mod types;

pub use decision::PurchaseDecision;
pub use error::BookingError;
pub use locks::AccountLocks;
pub use orchestrator::{BookingConfig, BookingOrchestrator};
pub use types::{
    FlightsPage, PrivilegeInfo, PrivilegeSummary, PurchaseRequest, PurchaseResult, TicketInfo,
    UserInfo,
};
