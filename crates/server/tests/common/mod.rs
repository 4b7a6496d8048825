//! Common test utilities for in-process router testing.
//!
//! Each fixture builds one service's router with its real state: the
//! gateway over mock downstream clients, the ledger services over
//! in-memory SQLite stores.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use skyward_core::booking::{BookingConfig, BookingOrchestrator};
use skyward_core::flight::{FlightStore, NewAirport, NewFlight, SqliteFlightStore};
use skyward_core::privilege::SqlitePrivilegeStore;
use skyward_core::testing::{MockFlightDirectory, MockPrivilegeLedger, MockTicketLedger};
use skyward_core::ticket::SqliteTicketStore;
use skyward_server::api::{
    create_bonus_router, create_flight_router, create_gateway_router, create_ticket_router,
};
use skyward_server::state::{
    BonusServiceState, FlightServiceState, GatewayState, TicketServiceState,
};

/// Re-export fixtures for test convenience
pub use skyward_core::testing::fixtures;

/// Header carrying the acting user.
pub const USER: &str = "X-User-Name";

/// An in-process router plus request helpers.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Gateway router over controllable mock ledgers.
///
/// `alice` starts with a 300 point balance; the directory knows SU100 and AFL031.
pub struct GatewayFixture {
    pub server: TestFixture,
    pub flights: Arc<MockFlightDirectory>,
    pub tickets: Arc<MockTicketLedger>,
    pub privileges: Arc<MockPrivilegeLedger>,
}

impl GatewayFixture {
    pub async fn new() -> Self {
        Self::with_config(BookingConfig::default()).await
    }

    pub async fn with_config(config: BookingConfig) -> Self {
        let flights = Arc::new(MockFlightDirectory::with_flights(vec![
            fixtures::su100(),
            fixtures::afl031(),
        ]));
        let tickets = Arc::new(MockTicketLedger::new());
        let privileges = Arc::new(MockPrivilegeLedger::new());
        privileges.add_account("alice", 300).await;

        let orchestrator = BookingOrchestrator::new(
            flights.clone(),
            tickets.clone(),
            privileges.clone(),
            config,
        );
        let router = create_gateway_router(Arc::new(GatewayState::new(orchestrator)));

        Self {
            server: TestFixture { router },
            flights,
            tickets,
            privileges,
        }
    }
}

impl std::ops::Deref for GatewayFixture {
    type Target = TestFixture;

    fn deref(&self) -> &TestFixture {
        &self.server
    }
}

impl TestFixture {
    /// Flight directory service with two airports and SU100 / AFL031 seeded.
    pub fn flight_service() -> Self {
        let store = SqliteFlightStore::in_memory().expect("Failed to create flight store");
        seed_flights(&store);
        Self {
            router: create_flight_router(Arc::new(FlightServiceState::new(Arc::new(store)))),
        }
    }

    /// Empty ticket ledger service.
    pub fn ticket_service() -> Self {
        let store = SqliteTicketStore::in_memory().expect("Failed to create ticket store");
        Self {
            router: create_ticket_router(Arc::new(TicketServiceState::new(Arc::new(store)))),
        }
    }

    /// Empty privilege ledger service.
    pub fn bonus_service() -> Self {
        let store = SqlitePrivilegeStore::in_memory().expect("Failed to create privilege store");
        Self {
            router: create_bonus_router(Arc::new(BonusServiceState::new(Arc::new(store)))),
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, &[], None).await
    }

    /// Send a GET request on behalf of `user`.
    pub async fn get_as(&self, user: &str, path: &str) -> TestResponse {
        self.request("GET", path, &[(USER, user)], None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, &[], Some(body)).await
    }

    /// Send a POST request with JSON body on behalf of `user`.
    pub async fn post_as(&self, user: &str, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, &[(USER, user)], Some(body)).await
    }

    /// Send a PATCH request with JSON body.
    pub async fn patch(&self, path: &str, body: Value) -> TestResponse {
        self.request("PATCH", path, &[], Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, &[], None).await
    }

    /// Send a DELETE request on behalf of `user`.
    pub async fn delete_as(&self, user: &str, path: &str) -> TestResponse {
        self.request("DELETE", path, &[(USER, user)], None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, headers: &[(&str, &str)], path: &str, body: &str) -> TestResponse {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        self.send(request).await
    }

    /// Send a request with arbitrary headers.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json_body) = body {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Seed Шереметьево (id 1), Пулково (id 2), SU100 (1 → 2, 1500) and AFL031 (2 → 1, 1500).
pub fn seed_flights(store: &dyn FlightStore) {
    let svo = store
        .create_airport(NewAirport {
            name: "Шереметьево".to_string(),
            city: "Москва".to_string(),
            country: "Россия".to_string(),
        })
        .unwrap();
    let led = store
        .create_airport(NewAirport {
            name: "Пулково".to_string(),
            city: "Санкт-Петербург".to_string(),
            country: "Россия".to_string(),
        })
        .unwrap();

    let date = Utc.with_ymd_and_hms(2021, 10, 8, 20, 0, 0).unwrap();
    for (number, from, to) in [("SU100", svo.id, led.id), ("AFL031", led.id, svo.id)] {
        store
            .create(NewFlight {
                flight_number: number.to_string(),
                date_time: date,
                from_airport_id: from,
                to_airport_id: to,
                price: 1500,
            })
            .unwrap();
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
