//! Gateway endpoints: the user-facing surface backed by the booking orchestrator.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use skyward_core::booking::{
    FlightsPage, PurchaseRequest, PurchaseResult, PrivilegeSummary, TicketInfo, UserInfo,
};
use std::sync::Arc;

use super::error::{booking_error, json_rejection, ApiError};
use super::middleware::UserName;
use crate::state::GatewayState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// GET /api/v1/flights?page=&size=
pub async fn list_flights(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<FlightsPage>, ApiError> {
    state
        .orchestrator()
        .list_flights(query.page, query.size)
        .await
        .map(Json)
        .map_err(booking_error)
}

/// GET /api/v1/me
pub async fn me(
    State(state): State<Arc<GatewayState>>,
    UserName(user): UserName,
) -> Result<Json<UserInfo>, ApiError> {
    state
        .orchestrator()
        .user_info(&user)
        .await
        .map(Json)
        .map_err(booking_error)
}

/// GET /api/v1/tickets
pub async fn list_tickets(
    State(state): State<Arc<GatewayState>>,
    UserName(user): UserName,
) -> Result<Json<Vec<TicketInfo>>, ApiError> {
    state
        .orchestrator()
        .my_tickets(&user)
        .await
        .map(Json)
        .map_err(booking_error)
}

/// POST /api/v1/tickets
pub async fn purchase(
    State(state): State<Arc<GatewayState>>,
    UserName(user): UserName,
    payload: Result<Json<PurchaseRequest>, JsonRejection>,
) -> Result<Json<PurchaseResult>, ApiError> {
    let Json(request) = payload.map_err(json_rejection)?;

    state
        .orchestrator()
        .purchase(&user, &request)
        .await
        .map(Json)
        .map_err(booking_error)
}

/// GET /api/v1/tickets/{ticketUid}
pub async fn get_ticket(
    State(state): State<Arc<GatewayState>>,
    UserName(user): UserName,
    Path(ticket_uid): Path<String>,
) -> Result<Json<TicketInfo>, ApiError> {
    state
        .orchestrator()
        .ticket(&user, &ticket_uid)
        .await
        .map(Json)
        .map_err(booking_error)
}

/// DELETE /api/v1/tickets/{ticketUid}
pub async fn cancel_ticket(
    State(state): State<Arc<GatewayState>>,
    UserName(user): UserName,
    Path(ticket_uid): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .orchestrator()
        .cancel_ticket(&user, &ticket_uid)
        .await
        .map_err(booking_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/privilege
pub async fn privilege(
    State(state): State<Arc<GatewayState>>,
    UserName(user): UserName,
) -> Result<Json<PrivilegeSummary>, ApiError> {
    state
        .orchestrator()
        .privilege_summary(&user)
        .await
        .map(Json)
        .map_err(booking_error)
}
