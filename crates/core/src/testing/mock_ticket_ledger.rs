//! Mock ticket ledger for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::clients::{TicketLedger, UpstreamError};
use crate::ticket::{NewTicket, TicketDescriptor};

/// Ticket ledger operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketOp {
    Create,
    List,
    Find,
    Update,
}

#[derive(Debug, Clone)]
struct StoredTicket {
    username: String,
    ticket: TicketDescriptor,
}

/// Mock implementation of the TicketLedger trait.
///
/// Keeps tickets in memory, records creations and updates, and fails
/// individual operations on request.
#[derive(Debug, Default)]
pub struct MockTicketLedger {
    tickets: Arc<RwLock<Vec<StoredTicket>>>,
    /// Every creation request received, including failed ones.
    created: Arc<RwLock<Vec<NewTicket>>>,
    /// Every update request received, including failed ones.
    updates: Arc<RwLock<Vec<TicketDescriptor>>>,
    failures: Arc<RwLock<HashMap<TicketOp, UpstreamError>>>,
}

impl MockTicketLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a ticket owned by `username`.
    pub async fn insert(&self, username: &str, ticket: TicketDescriptor) {
        self.tickets.write().await.push(StoredTicket {
            username: username.to_string(),
            ticket,
        });
    }

    /// Make `op` fail with `error` until cleared.
    pub async fn fail(&self, op: TicketOp, error: UpstreamError) {
        self.failures.write().await.insert(op, error);
    }

    pub async fn clear_failure(&self, op: TicketOp) {
        self.failures.write().await.remove(&op);
    }

    pub async fn created(&self) -> Vec<NewTicket> {
        self.created.read().await.clone()
    }

    pub async fn updates(&self) -> Vec<TicketDescriptor> {
        self.updates.read().await.clone()
    }

    /// Current state of a ticket regardless of owner.
    pub async fn get(&self, ticket_uid: &str) -> Option<TicketDescriptor> {
        self.tickets
            .read()
            .await
            .iter()
            .find(|stored| stored.ticket.ticket_uid == ticket_uid)
            .map(|stored| stored.ticket.clone())
    }

    async fn check(&self, op: TicketOp) -> Result<(), UpstreamError> {
        match self.failures.read().await.get(&op) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TicketLedger for MockTicketLedger {
    async fn create_ticket(&self, ticket: &NewTicket) -> Result<String, UpstreamError> {
        self.created.write().await.push(ticket.clone());
        self.check(TicketOp::Create).await?;

        let ticket_uid = if ticket.ticket_uid.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            ticket.ticket_uid.clone()
        };
        self.insert(
            &ticket.username,
            TicketDescriptor {
                ticket_uid: ticket_uid.clone(),
                flight_number: ticket.flight_number.clone(),
                price: ticket.price,
                status: ticket.status,
            },
        )
        .await;

        Ok(ticket_uid)
    }

    async fn list_tickets(&self, username: &str) -> Result<Vec<TicketDescriptor>, UpstreamError> {
        self.check(TicketOp::List).await?;
        Ok(self
            .tickets
            .read()
            .await
            .iter()
            .filter(|stored| stored.username == username)
            .map(|stored| stored.ticket.clone())
            .collect())
    }

    async fn find_ticket(
        &self,
        username: &str,
        ticket_uid: &str,
    ) -> Result<Option<TicketDescriptor>, UpstreamError> {
        self.check(TicketOp::Find).await?;
        Ok(self
            .tickets
            .read()
            .await
            .iter()
            .find(|stored| stored.username == username && stored.ticket.ticket_uid == ticket_uid)
            .map(|stored| stored.ticket.clone()))
    }

    async fn update_ticket(&self, ticket: &TicketDescriptor) -> Result<(), UpstreamError> {
        self.updates.write().await.push(ticket.clone());
        self.check(TicketOp::Update).await?;

        let mut tickets = self.tickets.write().await;
        let stored = tickets
            .iter_mut()
            .find(|stored| stored.ticket.ticket_uid == ticket.ticket_uid)
            .ok_or_else(|| UpstreamError::Status {
                service: "ticket",
                status: 404,
                message: format!("ticket {} not found", ticket.ticket_uid),
            })?;
        stored.ticket = ticket.clone();
        Ok(())
    }
}
