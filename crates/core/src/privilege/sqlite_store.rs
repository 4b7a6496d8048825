//! SQLite-backed privilege ledger.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use super::{
    HistoryEntry, NewHistoryEntry, NewPrivilege, OperationType, Privilege, PrivilegeSnapshot,
    PrivilegeStore,
};
use crate::store::{parse_timestamp, StoreError};

/// SQLite-backed privilege store.
pub struct SqlitePrivilegeStore {
    conn: Mutex<Connection>,
}

impl SqlitePrivilegeStore {
    /// Open (or create) the database file and its tables.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS privilege (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                status TEXT NOT NULL DEFAULT 'BRONZE',
                balance INTEGER NOT NULL DEFAULT 0 CHECK (balance >= 0)
            );

            CREATE TABLE IF NOT EXISTS privilege_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                privilege_id INTEGER NOT NULL REFERENCES privilege(id) ON DELETE CASCADE,
                ticket_uid TEXT NOT NULL,
                datetime TEXT NOT NULL,
                balance_diff INTEGER NOT NULL,
                operation_type TEXT NOT NULL
                    CHECK (operation_type IN ('FILL_IN_BALANCE', 'DEBIT_THE_ACCOUNT'))
            );

            CREATE INDEX IF NOT EXISTS idx_history_privilege ON privilege_history(privilege_id);
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("privilege store lock poisoned".to_string()))
    }

    fn row_to_privilege(row: &rusqlite::Row) -> rusqlite::Result<Privilege> {
        Ok(Privilege {
            id: row.get(0)?,
            username: row.get(1)?,
            status: row.get(2)?,
            balance: row.get(3)?,
        })
    }

    fn row_to_history(row: &rusqlite::Row) -> rusqlite::Result<HistoryEntry> {
        let datetime: String = row.get(0)?;
        let operation: String = row.get(3)?;
        let operation_type = OperationType::parse(&operation).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                format!("unknown operation type: {}", operation).into(),
            )
        })?;

        Ok(HistoryEntry {
            date: parse_timestamp(0, &datetime)?,
            ticket_uid: row.get(1)?,
            balance_diff: row.get(2)?,
            operation_type,
        })
    }

    fn get_with(conn: &Connection, id: i64) -> Result<Option<Privilege>, StoreError> {
        Ok(conn
            .query_row(
                "SELECT id, username, status, balance FROM privilege WHERE id = ?",
                params![id],
                Self::row_to_privilege,
            )
            .optional()?)
    }

    fn check_balance(balance: i64) -> Result<(), StoreError> {
        if balance < 0 {
            return Err(StoreError::Invalid(format!(
                "balance cannot be negative: {}",
                balance
            )));
        }
        Ok(())
    }
}

impl PrivilegeStore for SqlitePrivilegeStore {
    fn create(&self, privilege: NewPrivilege) -> Result<Privilege, StoreError> {
        Self::check_balance(privilege.balance)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO privilege (username, status, balance) VALUES (?, ?, ?)",
            params![privilege.username, privilege.status, privilege.balance],
        )?;

        Ok(Privilege {
            id: conn.last_insert_rowid(),
            username: privilege.username,
            status: privilege.status,
            balance: privilege.balance,
        })
    }

    fn get(&self, id: i64) -> Result<Option<Privilege>, StoreError> {
        let conn = self.conn()?;
        Self::get_with(&conn, id)
    }

    fn get_by_username(&self, username: &str) -> Result<Option<Privilege>, StoreError> {
        let conn = self.conn()?;
        Ok(conn
            .query_row(
                "SELECT id, username, status, balance FROM privilege WHERE username = ?",
                params![username],
                Self::row_to_privilege,
            )
            .optional()?)
    }

    fn list(&self) -> Result<Vec<Privilege>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, username, status, balance FROM privilege ORDER BY id")?;
        let rows = stmt.query_map([], Self::row_to_privilege)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn update(&self, snapshot: &PrivilegeSnapshot) -> Result<Privilege, StoreError> {
        Self::check_balance(snapshot.balance)?;

        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE privilege SET balance = ?, status = ? WHERE id = ?",
            params![snapshot.balance, snapshot.status, snapshot.id],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("privilege", snapshot.id));
        }

        Self::get_with(&conn, snapshot.id)?
            .ok_or_else(|| StoreError::not_found("privilege", snapshot.id))
    }

    fn delete(&self, id: i64) -> Result<Privilege, StoreError> {
        let conn = self.conn()?;
        let privilege =
            Self::get_with(&conn, id)?.ok_or_else(|| StoreError::not_found("privilege", id))?;
        conn.execute("DELETE FROM privilege WHERE id = ?", params![id])?;
        Ok(privilege)
    }

    fn append_history(&self, entry: &NewHistoryEntry) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        if Self::get_with(&conn, entry.privilege_id)?.is_none() {
            return Err(StoreError::not_found("privilege", entry.privilege_id));
        }

        conn.execute(
            "INSERT INTO privilege_history (privilege_id, ticket_uid, datetime, balance_diff, operation_type) VALUES (?, ?, ?, ?, ?)",
            params![
                entry.privilege_id,
                entry.ticket_uid,
                entry.date.to_rfc3339(),
                entry.balance_diff,
                entry.operation_type.as_str(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn history(&self, username: &str) -> Result<Vec<HistoryEntry>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT h.datetime, h.ticket_uid, h.balance_diff, h.operation_type
            FROM privilege_history h
            JOIN privilege p ON p.id = h.privilege_id
            WHERE p.username = ?
            ORDER BY h.id
            "#,
        )?;
        let rows = stmt.query_map(params![username], Self::row_to_history)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
