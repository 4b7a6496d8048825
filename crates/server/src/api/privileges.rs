//! Privilege (bonus) ledger endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use skyward_core::privilege::{
    HistoryEntry, NewHistoryEntry, NewPrivilege, Privilege, PrivilegeSnapshot,
};
use skyward_core::StoreError;
use std::sync::Arc;

use super::error::{json_rejection, store_error, ApiError};
use super::middleware::{OptionalUserName, UserName};
use crate::state::BonusServiceState;

#[derive(Debug, Serialize)]
pub struct HistoryCreated {
    pub id: i64,
}

/// GET /api/v1/privileges
///
/// With `X-User-Name`: that user's `{id, balance, status}` or 404.
/// Without: every account.
pub async fn get_privileges(
    State(state): State<Arc<BonusServiceState>>,
    OptionalUserName(user): OptionalUserName,
) -> Result<Response, ApiError> {
    let store = state.store();

    match user {
        Some(user) => {
            let privilege = store
                .get_by_username(&user)
                .map_err(store_error)?
                .ok_or_else(|| store_error(StoreError::not_found("privilege", &user)))?;
            Ok(Json(PrivilegeSnapshot::from(privilege)).into_response())
        }
        None => {
            let all = store.list().map_err(store_error)?;
            Ok(Json(all).into_response())
        }
    }
}

/// POST /api/v1/privileges
pub async fn create_privilege(
    State(state): State<Arc<BonusServiceState>>,
    payload: Result<Json<NewPrivilege>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(privilege) = payload.map_err(json_rejection)?;
    let privilege = state.store().create(privilege).map_err(store_error)?;

    tracing::info!(id = privilege.id, user = %privilege.username, "Privilege account opened");

    let location = format!("/api/v1/privileges/{}", privilege.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(privilege),
    ))
}

/// PATCH /api/v1/privileges
///
/// Whole-record overwrite by id. A negative balance is rejected.
pub async fn update_privilege(
    State(state): State<Arc<BonusServiceState>>,
    payload: Result<Json<PrivilegeSnapshot>, JsonRejection>,
) -> Result<Json<PrivilegeSnapshot>, ApiError> {
    let Json(snapshot) = payload.map_err(json_rejection)?;
    let privilege = state.store().update(&snapshot).map_err(store_error)?;

    tracing::debug!(id = privilege.id, balance = privilege.balance, "Privilege updated");

    Ok(Json(privilege.into()))
}

/// GET /api/v1/privileges/{id}
pub async fn get_privilege(
    State(state): State<Arc<BonusServiceState>>,
    Path(id): Path<i64>,
) -> Result<Json<Privilege>, ApiError> {
    state
        .store()
        .get(id)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| store_error(StoreError::not_found("privilege", id)))
}

/// DELETE /api/v1/privileges/{id}
pub async fn delete_privilege(
    State(state): State<Arc<BonusServiceState>>,
    Path(id): Path<i64>,
) -> Result<Json<Privilege>, ApiError> {
    state.store().delete(id).map(Json).map_err(store_error)
}

/// POST /api/v1/privileges/history
pub async fn append_history(
    State(state): State<Arc<BonusServiceState>>,
    payload: Result<Json<NewHistoryEntry>, JsonRejection>,
) -> Result<(StatusCode, Json<HistoryCreated>), ApiError> {
    let Json(entry) = payload.map_err(json_rejection)?;
    let id = state.store().append_history(&entry).map_err(store_error)?;

    tracing::info!(
        privilege = entry.privilege_id,
        ticket = %entry.ticket_uid,
        operation = entry.operation_type.as_str(),
        diff = entry.balance_diff,
        "History entry appended"
    );

    Ok((StatusCode::CREATED, Json(HistoryCreated { id })))
}

/// GET /api/v1/privilegeHistory
pub async fn history(
    State(state): State<Arc<BonusServiceState>>,
    UserName(user): UserName,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    state.store().history(&user).map(Json).map_err(store_error)
}
