//! Flight storage trait.

use crate::flight::{Airport, Flight, FlightDescriptor, NewAirport, NewFlight, Paging};
use crate::store::StoreError;

/// Trait for flight directory storage backends.
pub trait FlightStore: Send + Sync {
    /// Create an airport.
    fn create_airport(&self, airport: NewAirport) -> Result<Airport, StoreError>;

    /// Create a flight. Both airports must exist.
    fn create(&self, flight: NewFlight) -> Result<Flight, StoreError>;

    /// Get a flight row by ID.
    fn get(&self, id: i64) -> Result<Option<Flight>, StoreError>;

    /// Overwrite all fields of an existing flight.
    fn update(&self, id: i64, flight: NewFlight) -> Result<Flight, StoreError>;

    /// Delete a flight, returning the removed row.
    fn delete(&self, id: i64) -> Result<Flight, StoreError>;

    /// Descriptors for every flight, or only those with the given number.
    fn list(&self, flight_number: Option<&str>) -> Result<Vec<FlightDescriptor>, StoreError>;

    /// One page of descriptors ordered by ID.
    fn list_page(&self, paging: Paging) -> Result<Vec<FlightDescriptor>, StoreError>;

    /// Total number of flights.
    fn count(&self) -> Result<i64, StoreError>;
}
