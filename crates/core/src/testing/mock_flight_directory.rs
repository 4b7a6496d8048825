//! Mock flight directory for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::{FlightDirectory, FlightPage, UpstreamError};
use crate::flight::{FlightDescriptor, Paging};

/// Mock implementation of the FlightDirectory trait.
///
/// Holds a fixed list of flights, records every lookup and can be told to
/// fail all calls.
///
/// # Example
///
/// ```rust,ignore
/// let flights = MockFlightDirectory::with_flights(vec![fixtures::su100()]);
/// let flight = flights.find_flight("SU100").await?;
/// assert!(flight.is_some());
/// assert_eq!(flights.lookups().await, vec!["SU100"]);
/// ```
#[derive(Debug, Default)]
pub struct MockFlightDirectory {
    flights: Arc<RwLock<Vec<FlightDescriptor>>>,
    /// Flight numbers passed to `find_flight`.
    lookups: Arc<RwLock<Vec<String>>>,
    /// When set, every call fails with this error.
    failure: Arc<RwLock<Option<UpstreamError>>>,
}

impl MockFlightDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flights(flights: Vec<FlightDescriptor>) -> Self {
        Self {
            flights: Arc::new(RwLock::new(flights)),
            ..Self::default()
        }
    }

    pub async fn add_flight(&self, flight: FlightDescriptor) {
        self.flights.write().await.push(flight);
    }

    /// Make every subsequent call fail (or succeed again with `None`).
    pub async fn set_failure(&self, error: Option<UpstreamError>) {
        *self.failure.write().await = error;
    }

    pub async fn lookups(&self) -> Vec<String> {
        self.lookups.read().await.clone()
    }

    async fn check_failure(&self) -> Result<(), UpstreamError> {
        match self.failure.read().await.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl FlightDirectory for MockFlightDirectory {
    async fn find_flight(
        &self,
        flight_number: &str,
    ) -> Result<Option<FlightDescriptor>, UpstreamError> {
        self.lookups.write().await.push(flight_number.to_string());
        self.check_failure().await?;

        Ok(self
            .flights
            .read()
            .await
            .iter()
            .find(|f| f.flight_number == flight_number)
            .cloned())
    }

    async fn list_flights(&self, paging: Paging) -> Result<FlightPage, UpstreamError> {
        self.check_failure().await?;

        let flights = self.flights.read().await;
        let items = flights
            .iter()
            .skip(paging.offset() as usize)
            .take(paging.size as usize)
            .cloned()
            .collect();

        Ok(FlightPage {
            items,
            total: flights.len() as i64,
        })
    }
}
