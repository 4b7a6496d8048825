//! Purchase flow integration tests.
//!
//! These tests drive the booking orchestrator against mock ledgers:
//! settlement, fail-fast ordering, loyalty failure policies and the
//! concurrent read-modify-write race on the loyalty balance.

use std::sync::Arc;

use skyward_core::{
    booking::{BookingConfig, BookingError, BookingOrchestrator, PurchaseRequest},
    privilege::OperationType,
    testing::{
        fixtures, MockFlightDirectory, MockPrivilegeLedger, MockTicketLedger, PrivilegeOp,
        TicketOp,
    },
    ticket::TicketStatus,
    LoyaltyFailurePolicy, UpstreamError,
};

/// Mocks plus an orchestrator wired to them.
struct TestHarness {
    flights: Arc<MockFlightDirectory>,
    tickets: Arc<MockTicketLedger>,
    privileges: Arc<MockPrivilegeLedger>,
}

impl TestHarness {
    async fn new() -> Self {
        let flights = Arc::new(MockFlightDirectory::with_flights(vec![
            fixtures::su100(),
            fixtures::afl031(),
        ]));
        let tickets = Arc::new(MockTicketLedger::new());
        let privileges = Arc::new(MockPrivilegeLedger::new());
        privileges.add_account("alice", 300).await;

        Self {
            flights,
            tickets,
            privileges,
        }
    }

    fn orchestrator(&self, config: BookingConfig) -> BookingOrchestrator {
        BookingOrchestrator::new(
            self.flights.clone(),
            self.tickets.clone(),
            self.privileges.clone(),
            config,
        )
    }

    fn best_effort(&self) -> BookingOrchestrator {
        self.orchestrator(BookingConfig::default())
    }

    fn compensating(&self) -> BookingOrchestrator {
        self.orchestrator(BookingConfig {
            loyalty_failure_policy: LoyaltyFailurePolicy::Compensate,
            serialize_purchases: false,
        })
    }
}

fn buy(flight_number: &str, price: i64, paid_from_balance: bool) -> PurchaseRequest {
    PurchaseRequest {
        flight_number: flight_number.to_string(),
        price,
        paid_from_balance,
    }
}

#[tokio::test]
async fn test_purchase_paid_from_balance() {
    let harness = TestHarness::new().await;
    let orchestrator = harness.best_effort();

    let result = orchestrator
        .purchase("alice", &buy("SU100", 1000, true))
        .await
        .unwrap();

    assert_eq!(result.paid_by_bonuses, 300);
    assert_eq!(result.paid_by_money, 700);
    assert_eq!(result.price, 1000);
    assert_eq!(result.status, TicketStatus::Paid);
    assert_eq!(result.privilege.balance, 0);
    assert_eq!(result.privilege.status, "BRONZE");
    assert_eq!(result.from_airport, "Москва Шереметьево");
    assert_eq!(result.to_airport, "Санкт-Петербург Пулково");

    assert_eq!(harness.privileges.balance("alice").await, Some(0));

    let history = harness.privileges.history_entries().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].operation_type, OperationType::DebitTheAccount);
    assert_eq!(history[0].balance_diff, 300);
    assert_eq!(history[0].ticket_uid, result.ticket_uid);

    let ticket = harness.tickets.get(&result.ticket_uid).await.unwrap();
    assert_eq!(ticket.status, TicketStatus::Paid);
    assert_eq!(ticket.price, 1000);
}

#[tokio::test]
async fn test_purchase_paid_with_money_accrues_bonus() {
    let harness = TestHarness::new().await;
    let orchestrator = harness.best_effort();

    let result = orchestrator
        .purchase("alice", &buy("SU100", 1000, false))
        .await
        .unwrap();

    assert_eq!(result.paid_by_bonuses, 0);
    assert_eq!(result.paid_by_money, 1000);
    assert_eq!(result.privilege.balance, 400);
    assert_eq!(harness.privileges.balance("alice").await, Some(400));

    let history = harness.privileges.history_entries().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].operation_type, OperationType::FillInBalance);
    assert_eq!(history[0].balance_diff, 100);
}

#[tokio::test]
async fn test_purchase_at_max_price_settles_without_overflow() {
    let harness = TestHarness::new().await;
    let orchestrator = harness.best_effort();

    let with_money = orchestrator
        .purchase("alice", &buy("SU100", i64::MAX, false))
        .await
        .unwrap();
    assert_eq!(with_money.paid_by_money, i64::MAX);
    assert_eq!(with_money.paid_by_bonuses, 0);
    let accrued = 300 + i64::MAX / 10 + 1;
    assert_eq!(with_money.privilege.balance, accrued);
    assert_eq!(harness.privileges.balance("alice").await, Some(accrued));

    let from_balance = orchestrator
        .purchase("alice", &buy("SU100", i64::MAX, true))
        .await
        .unwrap();
    assert_eq!(from_balance.paid_by_bonuses, accrued);
    assert_eq!(from_balance.paid_by_money, i64::MAX - accrued);
    assert_eq!(from_balance.privilege.balance, 0);
    assert_eq!(harness.privileges.balance("alice").await, Some(0));

    let history = harness.privileges.history_entries().await;
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|entry| entry.balance_diff >= 0));
}

#[tokio::test]
async fn test_purchase_with_balance_covering_price() {
    let harness = TestHarness::new().await;
    harness.privileges.add_account("bob", 2000).await;

    let result = harness
        .best_effort()
        .purchase("bob", &buy("AFL031", 1500, true))
        .await
        .unwrap();

    assert_eq!(result.paid_by_bonuses, 1500);
    assert_eq!(result.paid_by_money, 0);
    assert_eq!(harness.privileges.balance("bob").await, Some(500));
}

#[tokio::test]
async fn test_unknown_flight_makes_no_ticket_call() {
    let harness = TestHarness::new().await;

    let err = harness
        .best_effort()
        .purchase("alice", &buy("XX000", 1000, false))
        .await
        .unwrap_err();

    assert_eq!(err, BookingError::FlightNotFound("XX000".to_string()));
    assert_eq!(err.to_string(), "cannot locate flight XX000");
    assert!(harness.tickets.created().await.is_empty());
    assert_eq!(harness.privileges.get_calls().await, 0);
    assert_eq!(harness.privileges.mutation_calls().await, 0);
}

#[tokio::test]
async fn test_flight_lookup_failure_makes_no_ticket_call() {
    let harness = TestHarness::new().await;
    harness
        .flights
        .set_failure(Some(fixtures::unavailable("flight")))
        .await;

    let err = harness
        .best_effort()
        .purchase("alice", &buy("SU100", 1000, false))
        .await
        .unwrap_err();

    assert!(matches!(err, BookingError::FlightLookupFailed { .. }));
    assert!(err.to_string().starts_with("cannot locate flight SU100"));
    assert!(harness.tickets.created().await.is_empty());
    assert_eq!(harness.privileges.mutation_calls().await, 0);
}

#[tokio::test]
async fn test_missing_account_aborts_before_ticket() {
    let harness = TestHarness::new().await;

    let err = harness
        .best_effort()
        .purchase("nobody", &buy("SU100", 1000, false))
        .await
        .unwrap_err();

    assert_eq!(err, BookingError::PrivilegeNotFound("nobody".to_string()));
    assert!(harness.tickets.created().await.is_empty());
}

#[tokio::test]
async fn test_account_lookup_failure_aborts_before_ticket() {
    let harness = TestHarness::new().await;
    harness
        .privileges
        .fail(PrivilegeOp::Get, fixtures::timeout("bonus"))
        .await;

    let err = harness
        .best_effort()
        .purchase("alice", &buy("SU100", 1000, false))
        .await
        .unwrap_err();

    assert_eq!(err, BookingError::Upstream(fixtures::timeout("bonus")));
    assert!(harness.tickets.created().await.is_empty());
}

#[tokio::test]
async fn test_ticket_creation_failure_leaves_loyalty_untouched() {
    let harness = TestHarness::new().await;
    harness
        .tickets
        .fail(TicketOp::Create, fixtures::unavailable("ticket"))
        .await;

    let err = harness
        .best_effort()
        .purchase("alice", &buy("SU100", 1000, true))
        .await
        .unwrap_err();

    assert!(matches!(err, BookingError::Upstream(_)));
    assert_eq!(harness.tickets.created().await.len(), 1);
    assert_eq!(harness.privileges.mutation_calls().await, 0);
    assert_eq!(harness.privileges.balance("alice").await, Some(300));
}

#[tokio::test]
async fn test_invalid_requests_make_no_downstream_calls() {
    let harness = TestHarness::new().await;
    let orchestrator = harness.best_effort();

    for request in [buy("SU100", 0, false), buy("SU100", -10, true), buy("", 100, false)] {
        let err = orchestrator.purchase("alice", &request).await.unwrap_err();
        assert!(matches!(err, BookingError::InvalidRequest(_)));
    }

    assert!(harness.flights.lookups().await.is_empty());
    assert!(harness.tickets.created().await.is_empty());
}

#[tokio::test]
async fn test_best_effort_keeps_purchase_when_history_fails() {
    let harness = TestHarness::new().await;
    harness
        .privileges
        .fail(PrivilegeOp::AppendHistory, fixtures::unavailable("bonus"))
        .await;

    let result = harness
        .best_effort()
        .purchase("alice", &buy("SU100", 1000, false))
        .await
        .unwrap();

    // Balance still persisted even though history failed
    assert_eq!(result.privilege.balance, 400);
    assert_eq!(harness.privileges.balance("alice").await, Some(400));
    assert!(harness.privileges.history_entries().await.is_empty());

    let ticket = harness.tickets.get(&result.ticket_uid).await.unwrap();
    assert_eq!(ticket.status, TicketStatus::Paid);
    assert!(harness.tickets.updates().await.is_empty());
}

#[tokio::test]
async fn test_best_effort_keeps_purchase_when_balance_update_fails() {
    let harness = TestHarness::new().await;
    harness
        .privileges
        .fail(PrivilegeOp::Update, fixtures::unavailable("bonus"))
        .await;

    let result = harness
        .best_effort()
        .purchase("alice", &buy("SU100", 1000, true))
        .await
        .unwrap();

    assert_eq!(result.paid_by_bonuses, 300);
    assert_eq!(harness.privileges.history_entries().await.len(), 1);
    // Stale balance left behind
    assert_eq!(harness.privileges.balance("alice").await, Some(300));
}

#[tokio::test]
async fn test_compensate_cancels_ticket_when_balance_update_fails() {
    let harness = TestHarness::new().await;
    harness
        .privileges
        .fail(PrivilegeOp::Update, fixtures::unavailable("bonus"))
        .await;

    let err = harness
        .compensating()
        .purchase("alice", &buy("SU100", 1000, true))
        .await
        .unwrap_err();

    let (ticket_uid, source) = match err {
        BookingError::LoyaltySyncFailed { ticket_uid, source } => (ticket_uid, source),
        other => panic!("expected LoyaltySyncFailed, got {:?}", other),
    };
    assert_eq!(source, fixtures::unavailable("bonus"));

    let ticket = harness.tickets.get(&ticket_uid).await.unwrap();
    assert_eq!(ticket.status, TicketStatus::Canceled);

    // The appended history entry is not reversed
    assert_eq!(harness.privileges.history_entries().await.len(), 1);
    assert_eq!(harness.privileges.balance("alice").await, Some(300));
}

#[tokio::test]
async fn test_compensate_skips_balance_update_when_history_fails() {
    let harness = TestHarness::new().await;
    harness
        .privileges
        .fail(PrivilegeOp::AppendHistory, fixtures::unavailable("bonus"))
        .await;

    let err = harness
        .compensating()
        .purchase("alice", &buy("SU100", 1000, false))
        .await
        .unwrap_err();

    assert!(matches!(err, BookingError::LoyaltySyncFailed { .. }));
    assert!(harness.privileges.updates().await.is_empty());
    assert_eq!(harness.privileges.balance("alice").await, Some(300));

    let created = harness.tickets.created().await;
    assert_eq!(created.len(), 1);
    let updates = harness.tickets.updates().await;
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].status, TicketStatus::Canceled);
}

#[tokio::test]
async fn test_compensate_reports_failure_even_if_cancellation_fails() {
    let harness = TestHarness::new().await;
    harness
        .privileges
        .fail(PrivilegeOp::Update, fixtures::unavailable("bonus"))
        .await;
    harness
        .tickets
        .fail(TicketOp::Update, fixtures::unavailable("ticket"))
        .await;

    let err = harness
        .compensating()
        .purchase("alice", &buy("SU100", 1000, false))
        .await
        .unwrap_err();

    let ticket_uid = match err {
        BookingError::LoyaltySyncFailed { ticket_uid, .. } => ticket_uid,
        other => panic!("expected LoyaltySyncFailed, got {:?}", other),
    };
    // Cancellation was attempted but the ticket stays PAID
    assert_eq!(harness.tickets.updates().await.len(), 1);
    assert_eq!(
        harness.tickets.get(&ticket_uid).await.unwrap().status,
        TicketStatus::Paid
    );
}

#[tokio::test]
async fn test_concurrent_purchases_lose_an_update_without_serialization() {
    let harness = TestHarness::new().await;
    harness.privileges.set_read_barrier(2).await;
    let orchestrator = Arc::new(harness.best_effort());

    let first = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move {
            orchestrator
                .purchase("alice", &buy("SU100", 1000, false))
                .await
        })
    };
    let second = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move {
            orchestrator
                .purchase("alice", &buy("SU100", 1000, false))
                .await
        })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    // Both read 300 and both wrote 400; one accrual is lost
    assert_eq!(harness.privileges.history_entries().await.len(), 2);
    assert_eq!(harness.privileges.balance("alice").await, Some(400));
}

#[tokio::test]
async fn test_serialized_purchases_apply_both_updates() {
    let harness = TestHarness::new().await;
    let orchestrator = Arc::new(harness.orchestrator(BookingConfig {
        loyalty_failure_policy: LoyaltyFailurePolicy::BestEffort,
        serialize_purchases: true,
    }));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                orchestrator
                    .purchase("alice", &buy("SU100", 1000, false))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(harness.privileges.balance("alice").await, Some(500));
}

#[tokio::test]
async fn test_timeout_is_reported_as_upstream_timeout() {
    let harness = TestHarness::new().await;
    harness
        .tickets
        .fail(TicketOp::Create, fixtures::timeout("ticket"))
        .await;

    let err = harness
        .best_effort()
        .purchase("alice", &buy("SU100", 1000, false))
        .await
        .unwrap_err();

    assert!(err.upstream().is_some_and(UpstreamError::is_timeout));
}
