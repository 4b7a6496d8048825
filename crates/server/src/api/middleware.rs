//! Metrics middleware and caller-identity extractors for API routes.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use skyward_core::clients::USER_HEADER;
use std::future::Future;
use std::time::Instant;

use super::error::{api_error, ApiError};
use crate::metrics::{
    normalize_path, HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION,
};

/// Metrics middleware that tracks HTTP request duration and counts.
///
/// This middleware records:
/// - Request duration (histogram)
/// - Request count (counter)
/// - Requests in flight (gauge)
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    HTTP_REQUESTS_IN_FLIGHT.inc();

    let response = next.run(request).await;

    HTTP_REQUESTS_IN_FLIGHT.dec();

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUEST_DURATION
        .with_label_values(&[&method, &path, &status])
        .observe(duration);
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();

    response
}

/// A trimmed, non-empty header value.
pub fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Extractor for the caller's username from the `X-User-Name` header.
///
/// Rejects with 400 when the header is missing or blank.
#[derive(Debug, Clone)]
pub struct UserName(pub String);

impl<S> FromRequestParts<S> for UserName
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = header_value(&parts.headers, USER_HEADER).map(UserName).ok_or_else(|| {
            api_error(
                StatusCode::BAD_REQUEST,
                format!("missing {} header", USER_HEADER),
            )
        });
        std::future::ready(result)
    }
}

/// Like [`UserName`], for ledger endpoints where the header only narrows the result.
#[derive(Debug, Clone)]
pub struct OptionalUserName(pub Option<String>);

impl<S> FromRequestParts<S> for OptionalUserName
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        std::future::ready(Ok(OptionalUserName(header_value(&parts.headers, USER_HEADER))))
    }
}
