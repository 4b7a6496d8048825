//! SQLite-backed flight directory.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use super::{Airport, Flight, FlightDescriptor, FlightStore, NewAirport, NewFlight, Paging};
use crate::store::{parse_timestamp, StoreError};

const DESCRIPTOR_SELECT: &str = r#"
    SELECT f.flight_number, f.datetime, f.price,
           fa.city, fa.name, ta.city, ta.name
    FROM flight f
    JOIN airport fa ON fa.id = f.from_airport_id
    JOIN airport ta ON ta.id = f.to_airport_id
"#;

/// SQLite-backed flight store.
pub struct SqliteFlightStore {
    conn: Mutex<Connection>,
}

impl SqliteFlightStore {
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
            CREATE TABLE IF NOT EXISTS airport (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                city TEXT NOT NULL,
                country TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS flight (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                flight_number TEXT NOT NULL,
                datetime TEXT NOT NULL,
                from_airport_id INTEGER NOT NULL REFERENCES airport(id),
                to_airport_id INTEGER NOT NULL REFERENCES airport(id),
                price INTEGER NOT NULL CHECK (price >= 0)
            );

            CREATE INDEX IF NOT EXISTS idx_flight_number ON flight(flight_number);
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("flight store lock poisoned".to_string()))
    }

    fn airport_exists(conn: &Connection, id: i64) -> Result<bool, StoreError> {
        let found: Option<i64> = conn
            .query_row("SELECT id FROM airport WHERE id = ?", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    fn check_airports(conn: &Connection, flight: &NewFlight) -> Result<(), StoreError> {
        for id in [flight.from_airport_id, flight.to_airport_id] {
            if !Self::airport_exists(conn, id)? {
                return Err(StoreError::Invalid(format!("unknown airport id {}", id)));
            }
        }
        if flight.price < 0 {
            return Err(StoreError::Invalid("price cannot be negative".to_string()));
        }
        Ok(())
    }

    fn row_to_flight(row: &rusqlite::Row) -> rusqlite::Result<Flight> {
        let datetime: String = row.get(2)?;
        Ok(Flight {
            id: row.get(0)?,
            flight_number: row.get(1)?,
            date_time: parse_timestamp(2, &datetime)?,
            from_airport_id: row.get(3)?,
            to_airport_id: row.get(4)?,
            price: row.get(5)?,
        })
    }

    fn row_to_descriptor(row: &rusqlite::Row) -> rusqlite::Result<FlightDescriptor> {
        let datetime: String = row.get(1)?;
        let from = format!("{} {}", row.get::<_, String>(3)?, row.get::<_, String>(4)?);
        let to = format!("{} {}", row.get::<_, String>(5)?, row.get::<_, String>(6)?);
        Ok(FlightDescriptor {
            flight_number: row.get(0)?,
            date: parse_timestamp(1, &datetime)?,
            price: row.get(2)?,
            from_airport: from,
            to_airport: to,
        })
    }

    fn get_with(conn: &Connection, id: i64) -> Result<Option<Flight>, StoreError> {
        let flight = conn
            .query_row(
                "SELECT id, flight_number, datetime, from_airport_id, to_airport_id, price FROM flight WHERE id = ?",
                params![id],
                Self::row_to_flight,
            )
            .optional()?;
        Ok(flight)
    }
}

impl FlightStore for SqliteFlightStore {
    fn create_airport(&self, airport: NewAirport) -> Result<Airport, StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO airport (name, city, country) VALUES (?, ?, ?)",
            params![airport.name, airport.city, airport.country],
        )?;

        Ok(Airport {
            id: conn.last_insert_rowid(),
            name: airport.name,
            city: airport.city,
            country: airport.country,
        })
    }

    fn create(&self, flight: NewFlight) -> Result<Flight, StoreError> {
        let conn = self.conn()?;
        Self::check_airports(&conn, &flight)?;

        conn.execute(
            "INSERT INTO flight (flight_number, datetime, from_airport_id, to_airport_id, price) VALUES (?, ?, ?, ?, ?)",
            params![
                flight.flight_number,
                flight.date_time.to_rfc3339(),
                flight.from_airport_id,
                flight.to_airport_id,
                flight.price,
            ],
        )?;

        Ok(Flight {
            id: conn.last_insert_rowid(),
            flight_number: flight.flight_number,
            date_time: flight.date_time,
            from_airport_id: flight.from_airport_id,
            to_airport_id: flight.to_airport_id,
            price: flight.price,
        })
    }

    fn get(&self, id: i64) -> Result<Option<Flight>, StoreError> {
        let conn = self.conn()?;
        Self::get_with(&conn, id)
    }

    fn update(&self, id: i64, flight: NewFlight) -> Result<Flight, StoreError> {
        let conn = self.conn()?;
        if Self::get_with(&conn, id)?.is_none() {
            return Err(StoreError::not_found("flight", id));
        }
        Self::check_airports(&conn, &flight)?;

        conn.execute(
            "UPDATE flight SET flight_number = ?, datetime = ?, from_airport_id = ?, to_airport_id = ?, price = ? WHERE id = ?",
            params![
                flight.flight_number,
                flight.date_time.to_rfc3339(),
                flight.from_airport_id,
                flight.to_airport_id,
                flight.price,
                id,
            ],
        )?;

        Ok(Flight {
            id,
            flight_number: flight.flight_number,
            date_time: flight.date_time,
            from_airport_id: flight.from_airport_id,
            to_airport_id: flight.to_airport_id,
            price: flight.price,
        })
    }

    fn delete(&self, id: i64) -> Result<Flight, StoreError> {
        let conn = self.conn()?;
        let flight = Self::get_with(&conn, id)?.ok_or_else(|| StoreError::not_found("flight", id))?;
        conn.execute("DELETE FROM flight WHERE id = ?", params![id])?;
        Ok(flight)
    }

    fn list(&self, flight_number: Option<&str>) -> Result<Vec<FlightDescriptor>, StoreError> {
        let conn = self.conn()?;

        let rows = match flight_number {
            Some(number) => {
                let sql = format!("{} WHERE f.flight_number = ? ORDER BY f.id", DESCRIPTOR_SELECT);
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![number], Self::row_to_descriptor)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let sql = format!("{} ORDER BY f.id", DESCRIPTOR_SELECT);
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([], Self::row_to_descriptor)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(rows)
    }

    fn list_page(&self, paging: Paging) -> Result<Vec<FlightDescriptor>, StoreError> {
        let conn = self.conn()?;
        let sql = format!("{} ORDER BY f.id LIMIT ? OFFSET ?", DESCRIPTOR_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![paging.size as i64, paging.offset()],
            Self::row_to_descriptor,
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn count(&self) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM flight", [], |row| row.get(0))?;
        Ok(count)
    }
}
