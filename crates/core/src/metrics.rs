//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Purchases (outcomes, loyalty ledger sync failures, compensations)
//! - Downstream services (flight, ticket and bonus calls)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Purchase Metrics
// =============================================================================

/// Purchases total by result.
pub static PURCHASES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("skyward_purchases_total", "Total ticket purchases"),
        &["result"], // "completed", "flight_not_found", "failed", "compensated"
    )
    .unwrap()
});

/// Failed writes to the loyalty ledger after a ticket was issued.
pub static LOYALTY_SYNC_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "skyward_loyalty_sync_failures_total",
            "Loyalty ledger writes that failed after ticket creation",
        ),
        &["step"], // "append_history", "update_balance"
    )
    .unwrap()
});

/// Tickets canceled to compensate a failed loyalty sync.
pub static COMPENSATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "skyward_compensations_total",
            "Compensating ticket cancellations",
        ),
        &["result"], // "success", "error"
    )
    .unwrap()
});

/// Tickets canceled through the gateway.
pub static CANCELLATIONS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("skyward_cancellations_total", "Tickets canceled by users").unwrap()
});

// =============================================================================
// Downstream Service Metrics
// =============================================================================

/// External service call duration.
pub static EXTERNAL_SERVICE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "skyward_external_service_duration_seconds",
            "Duration of downstream service calls",
        )
        .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["service", "operation"],
    )
    .unwrap()
});

/// External service requests total.
pub static EXTERNAL_SERVICE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "skyward_external_service_requests_total",
            "Total downstream service requests",
        ),
        &["service", "operation", "status"], // status: "success", "error", "timeout"
    )
    .unwrap()
});

/// Returns all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Purchases
        Box::new(PURCHASES_TOTAL.clone()),
        Box::new(LOYALTY_SYNC_FAILURES.clone()),
        Box::new(COMPENSATIONS.clone()),
        Box::new(CANCELLATIONS.clone()),
        // Downstream
        Box::new(EXTERNAL_SERVICE_DURATION.clone()),
        Box::new(EXTERNAL_SERVICE_REQUESTS.clone()),
    ]
}
