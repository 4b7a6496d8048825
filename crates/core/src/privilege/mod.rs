//! Privilege ledger: per-user loyalty accounts and their balance history.

mod sqlite_store;
mod store;
mod types;

pub use sqlite_store::SqlitePrivilegeStore;
pub use store::PrivilegeStore;
pub use types::{
    HistoryEntry, NewHistoryEntry, NewPrivilege, OperationType, Privilege, PrivilegeSnapshot,
    DEFAULT_STATUS,
};
