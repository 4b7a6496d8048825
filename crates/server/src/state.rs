//! Shared application state, one struct per service role.

use std::sync::Arc;

use skyward_core::booking::BookingOrchestrator;
use skyward_core::flight::FlightStore;
use skyward_core::privilege::PrivilegeStore;
use skyward_core::ticket::TicketStore;

/// Gateway state: the orchestrator and its downstream clients.
pub struct GatewayState {
    orchestrator: BookingOrchestrator,
}

impl GatewayState {
    pub fn new(orchestrator: BookingOrchestrator) -> Self {
        Self { orchestrator }
    }

    pub fn orchestrator(&self) -> &BookingOrchestrator {
        &self.orchestrator
    }
}

/// Flight directory service state.
pub struct FlightServiceState {
    store: Arc<dyn FlightStore>,
}

impl FlightServiceState {
    pub fn new(store: Arc<dyn FlightStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn FlightStore {
        self.store.as_ref()
    }
}

/// Ticket ledger service state.
pub struct TicketServiceState {
    store: Arc<dyn TicketStore>,
}

impl TicketServiceState {
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn TicketStore {
        self.store.as_ref()
    }
}

/// Privilege ledger service state.
pub struct BonusServiceState {
    store: Arc<dyn PrivilegeStore>,
}

impl BonusServiceState {
    pub fn new(store: Arc<dyn PrivilegeStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn PrivilegeStore {
        self.store.as_ref()
    }
}
