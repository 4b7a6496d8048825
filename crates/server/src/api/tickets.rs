//! Ticket ledger endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use skyward_core::clients::TICKET_UID_HEADER;
use skyward_core::ticket::{NewTicket, Ticket, TicketDescriptor};
use skyward_core::StoreError;
use std::sync::Arc;

use super::error::{api_error, json_rejection, store_error, ApiError};
use super::middleware::{header_value, OptionalUserName, UserName};
use crate::state::TicketServiceState;

/// POST /api/v1/tickets
///
/// Responds 201 with the new row's `Location` and its UID in `X-Ticket-UID`.
pub async fn create_ticket(
    State(state): State<Arc<TicketServiceState>>,
    payload: Result<Json<NewTicket>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(ticket) = payload.map_err(json_rejection)?;
    let ticket = state.store().create(ticket).map_err(store_error)?;

    tracing::info!(
        id = ticket.id,
        ticket = %ticket.ticket_uid,
        user = %ticket.username,
        flight = %ticket.flight_number,
        "Ticket created"
    );

    let location = format!("/api/v1/tickets/{}", ticket.id);
    Ok((
        StatusCode::CREATED,
        [
            (header::LOCATION.as_str(), location),
            (TICKET_UID_HEADER, ticket.ticket_uid.clone()),
        ],
        Json(ticket),
    ))
}

/// GET /api/v1/tickets, narrowed to one owner when `X-User-Name` is present.
pub async fn list_tickets(
    State(state): State<Arc<TicketServiceState>>,
    OptionalUserName(user): OptionalUserName,
) -> Result<Json<Vec<TicketDescriptor>>, ApiError> {
    let tickets = state.store().list(user.as_deref()).map_err(store_error)?;
    Ok(Json(tickets.into_iter().map(TicketDescriptor::from).collect()))
}

/// GET /api/v1/ticketsByUID
pub async fn get_ticket_by_uid(
    State(state): State<Arc<TicketServiceState>>,
    UserName(user): UserName,
    headers: HeaderMap,
) -> Result<Json<TicketDescriptor>, ApiError> {
    let ticket_uid = header_value(&headers, TICKET_UID_HEADER).ok_or_else(|| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("missing {} header", TICKET_UID_HEADER),
        )
    })?;

    state
        .store()
        .get_by_uid(&user, &ticket_uid)
        .map_err(store_error)?
        .map(|ticket| Json(ticket.into()))
        .ok_or_else(|| store_error(StoreError::not_found("ticket", ticket_uid)))
}

/// PATCH /api/v1/tickets
///
/// Located by `ticketUid`; the row's id and UID are never overwritten.
pub async fn update_ticket(
    State(state): State<Arc<TicketServiceState>>,
    payload: Result<Json<TicketDescriptor>, JsonRejection>,
) -> Result<Json<TicketDescriptor>, ApiError> {
    let Json(update) = payload.map_err(json_rejection)?;
    let ticket = state.store().update_by_uid(&update).map_err(store_error)?;

    tracing::info!(ticket = %ticket.ticket_uid, status = %ticket.status, "Ticket updated");

    Ok(Json(ticket.into()))
}

/// GET /api/v1/tickets/{id}
pub async fn get_ticket(
    State(state): State<Arc<TicketServiceState>>,
    Path(id): Path<i64>,
) -> Result<Json<Ticket>, ApiError> {
    state
        .store()
        .get(id)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| store_error(StoreError::not_found("ticket", id)))
}

/// DELETE /api/v1/tickets/{id}
pub async fn delete_ticket(
    State(state): State<Arc<TicketServiceState>>,
    Path(id): Path<i64>,
) -> Result<Json<Ticket>, ApiError> {
    state.store().delete(id).map(Json).map_err(store_error)
}
