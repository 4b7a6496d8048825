//! Flight directory: flights, airports and the descriptors served to the gateway.

mod sqlite_store;
mod store;
mod types;

pub use sqlite_store::SqliteFlightStore;
pub use store::FlightStore;
pub use types::{Airport, Flight, FlightDescriptor, NewAirport, NewFlight, Paging, MAX_PAGE_SIZE};
