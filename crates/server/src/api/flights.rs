//! Flight directory endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use skyward_core::clients::{FLIGHT_NUMBER_HEADER, TOTAL_COUNT_HEADER};
use skyward_core::flight::{Airport, Flight, FlightDescriptor, NewAirport, NewFlight, Paging};
use skyward_core::StoreError;
use std::sync::Arc;

use super::error::{json_rejection, store_error, ApiError};
use super::gateway::PageQuery;
use super::middleware::header_value;
use crate::state::FlightServiceState;

/// GET /api/v1/flights, optionally narrowed by the `flightNumber` header.
pub async fn list_flights(
    State(state): State<Arc<FlightServiceState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<FlightDescriptor>>, ApiError> {
    let flight_number = header_value(&headers, FLIGHT_NUMBER_HEADER);

    state
        .store()
        .list(flight_number.as_deref())
        .map(Json)
        .map_err(store_error)
}

/// GET /api/v1/flightsPaginate?page=&size=
pub async fn list_flights_page(
    State(state): State<Arc<FlightServiceState>>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let paging = Paging::from_query(query.page, query.size);
    let store = state.store();

    let items = store.list_page(paging).map_err(store_error)?;
    let total = store.count().map_err(store_error)?;

    Ok(([(TOTAL_COUNT_HEADER, total.to_string())], Json(items)))
}

/// GET /api/v1/flights/{id}
pub async fn get_flight(
    State(state): State<Arc<FlightServiceState>>,
    Path(id): Path<i64>,
) -> Result<Json<Flight>, ApiError> {
    state
        .store()
        .get(id)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| store_error(StoreError::not_found("flight", id)))
}

/// POST /api/v1/flights
pub async fn create_flight(
    State(state): State<Arc<FlightServiceState>>,
    payload: Result<Json<NewFlight>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(flight) = payload.map_err(json_rejection)?;
    let flight = state.store().create(flight).map_err(store_error)?;

    tracing::info!(id = flight.id, flight = %flight.flight_number, "Flight created");

    let location = format!("/api/v1/flights/{}", flight.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(flight),
    ))
}

/// PATCH /api/v1/flights/{id}
pub async fn update_flight(
    State(state): State<Arc<FlightServiceState>>,
    Path(id): Path<i64>,
    payload: Result<Json<NewFlight>, JsonRejection>,
) -> Result<Json<Flight>, ApiError> {
    let Json(flight) = payload.map_err(json_rejection)?;

    state
        .store()
        .update(id, flight)
        .map(Json)
        .map_err(store_error)
}

/// DELETE /api/v1/flights/{id}
pub async fn delete_flight(
    State(state): State<Arc<FlightServiceState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store().delete(id).map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/airports
pub async fn create_airport(
    State(state): State<Arc<FlightServiceState>>,
    payload: Result<Json<NewAirport>, JsonRejection>,
) -> Result<(StatusCode, Json<Airport>), ApiError> {
    let Json(airport) = payload.map_err(json_rejection)?;
    let airport = state.store().create_airport(airport).map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(airport)))
}
