//! Privilege storage trait.

use crate::privilege::{HistoryEntry, NewHistoryEntry, NewPrivilege, Privilege, PrivilegeSnapshot};
use crate::store::StoreError;

/// Trait for loyalty account storage backends.
pub trait PrivilegeStore: Send + Sync {
    /// Open an account. Usernames are unique.
    fn create(&self, privilege: NewPrivilege) -> Result<Privilege, StoreError>;

    fn get(&self, id: i64) -> Result<Option<Privilege>, StoreError>;

    fn get_by_username(&self, username: &str) -> Result<Option<Privilege>, StoreError>;

    fn list(&self) -> Result<Vec<Privilege>, StoreError>;

    /// Overwrite balance and status of the account with the snapshot's ID.
    /// A negative balance is rejected.
    fn update(&self, snapshot: &PrivilegeSnapshot) -> Result<Privilege, StoreError>;

    /// Delete an account and its history, returning the removed account.
    fn delete(&self, id: i64) -> Result<Privilege, StoreError>;

    /// Append one history entry. The referenced account must exist.
    fn append_history(&self, entry: &NewHistoryEntry) -> Result<i64, StoreError>;

    /// History of the user's account, oldest first.
    fn history(&self, username: &str) -> Result<Vec<HistoryEntry>, StoreError>;
}
