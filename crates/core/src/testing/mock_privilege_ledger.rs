//! Mock privilege ledger for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Barrier, RwLock};

use crate::clients::{PrivilegeLedger, UpstreamError};
use crate::privilege::{HistoryEntry, NewHistoryEntry, PrivilegeSnapshot, DEFAULT_STATUS};

/// Privilege ledger operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrivilegeOp {
    Get,
    Update,
    AppendHistory,
    History,
}

#[derive(Debug, Clone)]
struct Account {
    username: String,
    snapshot: PrivilegeSnapshot,
}

/// Mock implementation of the PrivilegeLedger trait.
///
/// Accounts and history live in memory. Balance overwrites are
/// last-write-wins, like the real service.
///
/// A read barrier can be installed so that concurrent `get_privilege` calls
/// all return before any caller proceeds, which makes read-modify-write
/// races deterministic.
#[derive(Debug, Default)]
pub struct MockPrivilegeLedger {
    accounts: Arc<RwLock<Vec<Account>>>,
    history: Arc<RwLock<Vec<NewHistoryEntry>>>,
    /// Every balance overwrite received, including failed ones.
    updates: Arc<RwLock<Vec<PrivilegeSnapshot>>>,
    get_calls: Arc<RwLock<usize>>,
    append_calls: Arc<RwLock<usize>>,
    failures: Arc<RwLock<HashMap<PrivilegeOp, UpstreamError>>>,
    read_barrier: Arc<RwLock<Option<Arc<Barrier>>>>,
}

impl MockPrivilegeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an account, returning its ID.
    pub async fn add_account(&self, username: &str, balance: i64) -> i64 {
        let mut accounts = self.accounts.write().await;
        let id = accounts.len() as i64 + 1;
        accounts.push(Account {
            username: username.to_string(),
            snapshot: PrivilegeSnapshot {
                id,
                balance,
                status: DEFAULT_STATUS.to_string(),
            },
        });
        id
    }

    pub async fn balance(&self, username: &str) -> Option<i64> {
        self.accounts
            .read()
            .await
            .iter()
            .find(|a| a.username == username)
            .map(|a| a.snapshot.balance)
    }

    /// Make `op` fail with `error` until cleared.
    pub async fn fail(&self, op: PrivilegeOp, error: UpstreamError) {
        self.failures.write().await.insert(op, error);
    }

    pub async fn clear_failure(&self, op: PrivilegeOp) {
        self.failures.write().await.remove(&op);
    }

    /// Hold each `get_privilege` caller until `parties` callers have read.
    pub async fn set_read_barrier(&self, parties: usize) {
        *self.read_barrier.write().await = Some(Arc::new(Barrier::new(parties)));
    }

    pub async fn history_entries(&self) -> Vec<NewHistoryEntry> {
        self.history.read().await.clone()
    }

    pub async fn updates(&self) -> Vec<PrivilegeSnapshot> {
        self.updates.read().await.clone()
    }

    pub async fn get_calls(&self) -> usize {
        *self.get_calls.read().await
    }

    /// Number of attempted writes (history appends plus balance overwrites).
    pub async fn mutation_calls(&self) -> usize {
        *self.append_calls.read().await + self.updates.read().await.len()
    }

    async fn check(&self, op: PrivilegeOp) -> Result<(), UpstreamError> {
        match self.failures.read().await.get(&op) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn bad_request(message: String) -> UpstreamError {
    UpstreamError::Status {
        service: "bonus",
        status: 400,
        message,
    }
}

fn not_found(message: String) -> UpstreamError {
    UpstreamError::Status {
        service: "bonus",
        status: 404,
        message,
    }
}

#[async_trait]
impl PrivilegeLedger for MockPrivilegeLedger {
    async fn get_privilege(
        &self,
        username: &str,
    ) -> Result<Option<PrivilegeSnapshot>, UpstreamError> {
        *self.get_calls.write().await += 1;
        self.check(PrivilegeOp::Get).await?;

        let snapshot = self
            .accounts
            .read()
            .await
            .iter()
            .find(|a| a.username == username)
            .map(|a| a.snapshot.clone());

        let barrier = self.read_barrier.read().await.clone();
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }

        Ok(snapshot)
    }

    async fn update_privilege(&self, privilege: &PrivilegeSnapshot) -> Result<(), UpstreamError> {
        self.updates.write().await.push(privilege.clone());
        self.check(PrivilegeOp::Update).await?;

        if privilege.balance < 0 {
            return Err(bad_request(format!(
                "balance cannot be negative: {}",
                privilege.balance
            )));
        }

        let mut accounts = self.accounts.write().await;
        let account = accounts
            .iter_mut()
            .find(|a| a.snapshot.id == privilege.id)
            .ok_or_else(|| not_found(format!("privilege {} not found", privilege.id)))?;
        account.snapshot = privilege.clone();
        Ok(())
    }

    async fn append_history(&self, entry: &NewHistoryEntry) -> Result<(), UpstreamError> {
        *self.append_calls.write().await += 1;
        self.check(PrivilegeOp::AppendHistory).await?;

        let known = self
            .accounts
            .read()
            .await
            .iter()
            .any(|a| a.snapshot.id == entry.privilege_id);
        if !known {
            return Err(not_found(format!(
                "privilege {} not found",
                entry.privilege_id
            )));
        }

        self.history.write().await.push(entry.clone());
        Ok(())
    }

    async fn history(&self, username: &str) -> Result<Vec<HistoryEntry>, UpstreamError> {
        self.check(PrivilegeOp::History).await?;

        let id = self
            .accounts
            .read()
            .await
            .iter()
            .find(|a| a.username == username)
            .map(|a| a.snapshot.id);

        let Some(id) = id else {
            return Ok(Vec::new());
        };

        Ok(self
            .history
            .read()
            .await
            .iter()
            .filter(|entry| entry.privilege_id == id)
            .map(|entry| HistoryEntry {
                date: entry.date,
                ticket_uid: entry.ticket_uid.clone(),
                balance_diff: entry.balance_diff,
                operation_type: entry.operation_type,
            })
            .collect())
    }
}
