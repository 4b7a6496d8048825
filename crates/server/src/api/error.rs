//! Mapping of domain errors onto HTTP responses.

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use serde::Serialize;
use skyward_core::{BookingError, StoreError, UpstreamError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub fn booking_error(e: BookingError) -> ApiError {
    let status = match &e {
        BookingError::FlightNotFound(_)
        | BookingError::TicketNotFound(_)
        | BookingError::PrivilegeNotFound(_) => StatusCode::NOT_FOUND,
        BookingError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        BookingError::FlightLookupFailed { source, .. }
        | BookingError::LoyaltySyncFailed { source, .. }
        | BookingError::Upstream(source) => {
            tracing::error!(service = source.service(), error = %e, "Downstream failure");
            upstream_status(source)
        }
    };
    api_error(status, e.to_string())
}

fn upstream_status(e: &UpstreamError) -> StatusCode {
    match e {
        UpstreamError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        UpstreamError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    }
}

pub fn store_error(e: StoreError) -> ApiError {
    let status = match &e {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::Conflict(_) => StatusCode::CONFLICT,
        StoreError::Invalid(_) => StatusCode::BAD_REQUEST,
        StoreError::Database(_) => {
            tracing::error!(error = %e, "Store failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    api_error(status, e.to_string())
}

/// Malformed or missing JSON bodies are client errors.
pub fn json_rejection(rejection: JsonRejection) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, rejection.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_error_status() {
        let cases = [
            (
                BookingError::FlightNotFound("SU100".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                BookingError::InvalidRequest("price".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                BookingError::Upstream(UpstreamError::Timeout {
                    service: "bonus",
                }),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                BookingError::FlightLookupFailed {
                    flight_number: "SU100".to_string(),
                    source: UpstreamError::Unavailable {
                        service: "flight",
                        message: "connection refused".to_string(),
                    },
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                BookingError::Upstream(UpstreamError::InvalidRequest {
                    service: "ticket",
                    message: "builder error".to_string(),
                }),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, expected) in cases {
            let (status, _) = booking_error(error);
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_flight_not_found_message() {
        let (_, Json(body)) = booking_error(BookingError::FlightNotFound("SU100".to_string()));
        assert_eq!(body.error, "cannot locate flight SU100");
    }

    #[test]
    fn test_store_error_status() {
        assert_eq!(
            store_error(StoreError::not_found("ticket", "x")).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            store_error(StoreError::Conflict("dup".to_string())).0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            store_error(StoreError::Invalid("negative".to_string())).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            store_error(StoreError::Database("locked".to_string())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
