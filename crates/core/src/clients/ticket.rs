//! HTTP client for the ticket ledger service.

use async_trait::async_trait;
use reqwest::Client;

use super::http::ServiceClient;
use super::{TicketLedger, UpstreamError, TICKET_UID_HEADER, USER_HEADER};
use crate::ticket::{NewTicket, TicketDescriptor};

pub struct HttpTicketLedger {
    inner: ServiceClient,
}

impl HttpTicketLedger {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            inner: ServiceClient::new(client, base_url, "ticket"),
        }
    }
}

#[async_trait]
impl TicketLedger for HttpTicketLedger {
    async fn create_ticket(&self, ticket: &NewTicket) -> Result<String, UpstreamError> {
        let request = self.inner.post("/api/v1/tickets").json(ticket);
        let response = self.inner.send("create_ticket", request).await?;
        let response = self.inner.ensure_success(response).await?;
        self.inner.header(&response, TICKET_UID_HEADER)
    }

    async fn list_tickets(&self, username: &str) -> Result<Vec<TicketDescriptor>, UpstreamError> {
        let request = self
            .inner
            .get("/api/v1/tickets")
            .header(USER_HEADER, username);
        let response = self.inner.send("list_tickets", request).await?;
        self.inner.json(response).await
    }

    async fn find_ticket(
        &self,
        username: &str,
        ticket_uid: &str,
    ) -> Result<Option<TicketDescriptor>, UpstreamError> {
        let request = self
            .inner
            .get("/api/v1/ticketsByUID")
            .header(USER_HEADER, username)
            .header(TICKET_UID_HEADER, ticket_uid);
        let response = self.inner.send("find_ticket", request).await?;
        self.inner.optional_json(response).await
    }

    async fn update_ticket(&self, ticket: &TicketDescriptor) -> Result<(), UpstreamError> {
        let request = self.inner.patch("/api/v1/tickets").json(ticket);
        let response = self.inner.send("update_ticket", request).await?;
        self.inner.ensure_success(response).await?;
        Ok(())
    }
}
