//! HTTP client for the flight directory service.

use async_trait::async_trait;
use reqwest::Client;

use super::http::ServiceClient;
use super::{FlightDirectory, FlightPage, UpstreamError, FLIGHT_NUMBER_HEADER, TOTAL_COUNT_HEADER};
use crate::flight::{FlightDescriptor, Paging};

pub struct HttpFlightDirectory {
    inner: ServiceClient,
}

impl HttpFlightDirectory {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            inner: ServiceClient::new(client, base_url, "flight"),
        }
    }
}

#[async_trait]
impl FlightDirectory for HttpFlightDirectory {
    async fn find_flight(
        &self,
        flight_number: &str,
    ) -> Result<Option<FlightDescriptor>, UpstreamError> {
        let request = self
            .inner
            .get("/api/v1/flights")
            .header(FLIGHT_NUMBER_HEADER, flight_number);
        let response = self.inner.send("find_flight", request).await?;
        let flights: Vec<FlightDescriptor> = self.inner.json(response).await?;
        Ok(flights.into_iter().next())
    }

    async fn list_flights(&self, paging: Paging) -> Result<FlightPage, UpstreamError> {
        let request = self
            .inner
            .get("/api/v1/flightsPaginate")
            .query(&[("page", paging.page), ("size", paging.size)]);
        let response = self.inner.send("list_flights", request).await?;

        let total = response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<i64>().ok());
        let items: Vec<FlightDescriptor> = self.inner.json(response).await?;
        let total = total.unwrap_or(items.len() as i64);

        Ok(FlightPage { items, total })
    }
}
