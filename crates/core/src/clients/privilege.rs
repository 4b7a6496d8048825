//! HTTP client for the privilege (bonus) ledger service.

use async_trait::async_trait;
use reqwest::Client;

use super::http::ServiceClient;
use super::{PrivilegeLedger, UpstreamError, USER_HEADER};
use crate::privilege::{HistoryEntry, NewHistoryEntry, PrivilegeSnapshot};

pub struct HttpPrivilegeLedger {
    inner: ServiceClient,
}

impl HttpPrivilegeLedger {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            inner: ServiceClient::new(client, base_url, "bonus"),
        }
    }
}

#[async_trait]
impl PrivilegeLedger for HttpPrivilegeLedger {
    async fn get_privilege(
        &self,
        username: &str,
    ) -> Result<Option<PrivilegeSnapshot>, UpstreamError> {
        let request = self
            .inner
            .get("/api/v1/privileges")
            .header(USER_HEADER, username);
        let response = self.inner.send("get_privilege", request).await?;
        self.inner.optional_json(response).await
    }

    async fn update_privilege(&self, privilege: &PrivilegeSnapshot) -> Result<(), UpstreamError> {
        let request = self.inner.patch("/api/v1/privileges").json(privilege);
        let response = self.inner.send("update_privilege", request).await?;
        self.inner.ensure_success(response).await?;
        Ok(())
    }

    async fn append_history(&self, entry: &NewHistoryEntry) -> Result<(), UpstreamError> {
        let request = self.inner.post("/api/v1/privileges/history").json(entry);
        let response = self.inner.send("append_history", request).await?;
        self.inner.ensure_success(response).await?;
        Ok(())
    }

    async fn history(&self, username: &str) -> Result<Vec<HistoryEntry>, UpstreamError> {
        let request = self
            .inner
            .get("/api/v1/privilegeHistory")
            .header(USER_HEADER, username);
        let response = self.inner.send("history", request).await?;
        self.inner.json(response).await
    }
}
