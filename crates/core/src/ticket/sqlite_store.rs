//! SQLite-backed ticket ledger.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{NewTicket, Ticket, TicketDescriptor, TicketStatus, TicketStore};
use crate::store::StoreError;

const TICKET_COLUMNS: &str = "id, ticket_uid, username, flight_number, price, status";

/// SQLite-backed ticket store.
pub struct SqliteTicketStore {
    conn: Mutex<Connection>,
}

impl SqliteTicketStore {
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
            CREATE TABLE IF NOT EXISTS ticket (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticket_uid TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL,
                flight_number TEXT NOT NULL,
                price INTEGER NOT NULL,
                status TEXT NOT NULL CHECK (status IN ('PAID', 'CANCELED'))
            );

            CREATE INDEX IF NOT EXISTS idx_ticket_username ON ticket(username);
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("ticket store lock poisoned".to_string()))
    }

    fn row_to_ticket(row: &rusqlite::Row) -> rusqlite::Result<Ticket> {
        let status: String = row.get(5)?;
        let status = TicketStatus::parse(&status).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                format!("unknown ticket status: {}", status).into(),
            )
        })?;

        Ok(Ticket {
            id: row.get(0)?,
            ticket_uid: row.get(1)?,
            username: row.get(2)?,
            flight_number: row.get(3)?,
            price: row.get(4)?,
            status,
        })
    }

    fn get_with(conn: &Connection, id: i64) -> Result<Option<Ticket>, StoreError> {
        let sql = format!("SELECT {} FROM ticket WHERE id = ?", TICKET_COLUMNS);
        Ok(conn
            .query_row(&sql, params![id], Self::row_to_ticket)
            .optional()?)
    }
}

impl TicketStore for SqliteTicketStore {
    fn create(&self, ticket: NewTicket) -> Result<Ticket, StoreError> {
        let ticket_uid = if ticket.ticket_uid.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            ticket.ticket_uid
        };

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO ticket (ticket_uid, username, flight_number, price, status) VALUES (?, ?, ?, ?, ?)",
            params![
                ticket_uid,
                ticket.username,
                ticket.flight_number,
                ticket.price,
                ticket.status.as_str(),
            ],
        )?;

        Ok(Ticket {
            id: conn.last_insert_rowid(),
            ticket_uid,
            username: ticket.username,
            flight_number: ticket.flight_number,
            price: ticket.price,
            status: ticket.status,
        })
    }

    fn get(&self, id: i64) -> Result<Option<Ticket>, StoreError> {
        let conn = self.conn()?;
        Self::get_with(&conn, id)
    }

    fn get_by_uid(&self, username: &str, ticket_uid: &str) -> Result<Option<Ticket>, StoreError> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM ticket WHERE ticket_uid = ? AND username = ?",
            TICKET_COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![ticket_uid, username], Self::row_to_ticket)
            .optional()?)
    }

    fn list(&self, username: Option<&str>) -> Result<Vec<Ticket>, StoreError> {
        let conn = self.conn()?;

        let tickets = match username {
            Some(user) => {
                let sql = format!(
                    "SELECT {} FROM ticket WHERE username = ? ORDER BY id",
                    TICKET_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![user], Self::row_to_ticket)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let sql = format!("SELECT {} FROM ticket ORDER BY id", TICKET_COLUMNS);
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([], Self::row_to_ticket)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(tickets)
    }

    fn update_by_uid(&self, update: &TicketDescriptor) -> Result<Ticket, StoreError> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE ticket SET flight_number = ?, price = ?, status = ? WHERE ticket_uid = ?",
            params![
                update.flight_number,
                update.price,
                update.status.as_str(),
                update.ticket_uid,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("ticket", &update.ticket_uid));
        }

        let sql = format!("SELECT {} FROM ticket WHERE ticket_uid = ?", TICKET_COLUMNS);
        Ok(conn.query_row(&sql, params![update.ticket_uid], Self::row_to_ticket)?)
    }

    fn delete(&self, id: i64) -> Result<Ticket, StoreError> {
        let conn = self.conn()?;
        let ticket = Self::get_with(&conn, id)?.ok_or_else(|| StoreError::not_found("ticket", id))?;
        conn.execute("DELETE FROM ticket WHERE id = ?", params![id])?;
        Ok(ticket)
    }
}
