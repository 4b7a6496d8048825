//! Gateway-side coordination of the flight, ticket and privilege ledgers.

use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use tracing::{debug, error, info, warn};

use crate::clients::{FlightDirectory, PrivilegeLedger, TicketLedger, UpstreamError};
use crate::config::{GatewayConfig, LoyaltyFailurePolicy};
use crate::flight::{FlightDescriptor, Paging};
use crate::metrics::{CANCELLATIONS, COMPENSATIONS, LOYALTY_SYNC_FAILURES, PURCHASES_TOTAL};
use crate::privilege::{NewHistoryEntry, PrivilegeSnapshot};
use crate::ticket::{NewTicket, TicketDescriptor, TicketStatus};

use super::decision::PurchaseDecision;
use super::error::BookingError;
use super::locks::AccountLocks;
use super::types::{
    FlightsPage, PrivilegeInfo, PrivilegeSummary, PurchaseRequest, PurchaseResult, TicketInfo,
    UserInfo,
};

/// Purchase flow settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingConfig {
    pub loyalty_failure_policy: LoyaltyFailurePolicy,
    pub serialize_purchases: bool,
}

impl From<&GatewayConfig> for BookingConfig {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            loyalty_failure_policy: config.loyalty_failure_policy,
            serialize_purchases: config.serialize_purchases,
        }
    }
}

/// Coordinates purchases and read views across the three ledgers.
pub struct BookingOrchestrator {
    flights: Arc<dyn FlightDirectory>,
    tickets: Arc<dyn TicketLedger>,
    privileges: Arc<dyn PrivilegeLedger>,
    config: BookingConfig,
    locks: Option<AccountLocks>,
}

impl BookingOrchestrator {
    pub fn new(
        flights: Arc<dyn FlightDirectory>,
        tickets: Arc<dyn TicketLedger>,
        privileges: Arc<dyn PrivilegeLedger>,
        config: BookingConfig,
    ) -> Self {
        let locks = config.serialize_purchases.then(AccountLocks::new);
        Self {
            flights,
            tickets,
            privileges,
            config,
            locks,
        }
    }

    /// Buy a ticket for `username`.
    ///
    /// Steps, each attempted once:
    /// 1. resolve the flight (fails fast, nothing written yet)
    /// 2. read the buyer's loyalty account
    /// 3. settle the price between money and points
    /// 4. create the ticket
    /// 5. append the history entry and persist the new balance
    /// 6. assemble the result
    ///
    /// Failures in step 5 are handled per [`LoyaltyFailurePolicy`]. Under
    /// `Compensate` only the ticket is rolled back: a history entry appended
    /// before a failed balance update stays in the ledger. With
    /// `serialize_purchases` set, steps 2 to 5 hold a per-buyer lock.
    pub async fn purchase(
        &self,
        username: &str,
        request: &PurchaseRequest,
    ) -> Result<PurchaseResult, BookingError> {
        let result = self.run_purchase(username, request).await;

        let outcome = match &result {
            Ok(_) => "completed",
            Err(BookingError::InvalidRequest(_)) => "rejected",
            Err(BookingError::FlightNotFound(_)) => "flight_not_found",
            Err(BookingError::LoyaltySyncFailed { .. }) => "compensated",
            Err(_) => "failed",
        };
        PURCHASES_TOTAL.with_label_values(&[outcome]).inc();

        result
    }

    async fn run_purchase(
        &self,
        username: &str,
        request: &PurchaseRequest,
    ) -> Result<PurchaseResult, BookingError> {
        validate_purchase(request)?;

        let flight = self.resolve_flight(&request.flight_number).await?;

        let _guard = match &self.locks {
            Some(locks) => Some(locks.acquire(username).await),
            None => None,
        };

        let privilege = self.resolve_privilege(username).await?;

        let decision =
            PurchaseDecision::compute(privilege.balance, request.price, request.paid_from_balance);
        let new_balance = decision.new_balance(privilege.balance);
        debug!(
            user = username,
            flight = %request.flight_number,
            paid_by_bonuses = decision.paid_by_bonuses,
            paid_by_money = decision.paid_by_money,
            balance_diff = decision.balance_diff,
            "Purchase settled"
        );

        let new_ticket = NewTicket {
            ticket_uid: String::new(),
            flight_number: request.flight_number.clone(),
            username: username.to_string(),
            price: request.price,
            status: TicketStatus::Paid,
        };
        let ticket_uid = self.tickets.create_ticket(&new_ticket).await.map_err(|e| {
            error!(
                user = username,
                flight = %request.flight_number,
                "Ticket creation failed: {}", e
            );
            BookingError::Upstream(e)
        })?;

        let updated = PrivilegeSnapshot {
            id: privilege.id,
            balance: new_balance,
            status: privilege.status.clone(),
        };
        if let Err(source) = self
            .sync_loyalty(username, &ticket_uid, &decision, &updated)
            .await
        {
            self.compensate(username, &ticket_uid, &new_ticket).await;
            return Err(BookingError::LoyaltySyncFailed { ticket_uid, source });
        }

        info!(
            user = username,
            ticket = %ticket_uid,
            flight = %request.flight_number,
            balance = new_balance,
            "Ticket purchased"
        );

        Ok(PurchaseResult {
            ticket_uid,
            flight_number: flight.flight_number,
            from_airport: flight.from_airport,
            to_airport: flight.to_airport,
            date: flight.date,
            price: request.price,
            paid_by_money: decision.paid_by_money,
            paid_by_bonuses: decision.paid_by_bonuses,
            status: TicketStatus::Paid,
            privilege: PrivilegeInfo {
                balance: updated.balance,
                status: updated.status,
            },
        })
    }

    /// Record the history entry and persist the new balance.
    ///
    /// Best-effort attempts both writes and only logs failures, so it never
    /// returns an error. Compensate stops at the first failure and returns it.
    /// Neither policy reverts the history entry when only the balance update
    /// fails.
    async fn sync_loyalty(
        &self,
        username: &str,
        ticket_uid: &str,
        decision: &PurchaseDecision,
        updated: &PrivilegeSnapshot,
    ) -> Result<(), UpstreamError> {
        let entry = NewHistoryEntry {
            privilege_id: updated.id,
            ticket_uid: ticket_uid.to_string(),
            operation_type: decision.operation_type,
            balance_diff: decision.balance_diff,
            date: Utc::now(),
        };
        let compensate = self.config.loyalty_failure_policy == LoyaltyFailurePolicy::Compensate;

        if let Err(e) = self.privileges.append_history(&entry).await {
            LOYALTY_SYNC_FAILURES
                .with_label_values(&["append_history"])
                .inc();
            error!(
                user = username,
                ticket = ticket_uid,
                "Failed to append loyalty history: {}", e
            );
            if compensate {
                return Err(e);
            }
        }

        if let Err(e) = self.privileges.update_privilege(updated).await {
            LOYALTY_SYNC_FAILURES
                .with_label_values(&["update_balance"])
                .inc();
            error!(
                user = username,
                ticket = ticket_uid,
                balance = updated.balance,
                "Failed to persist loyalty balance: {}", e
            );
            if compensate {
                return Err(e);
            }
        }

        Ok(())
    }

    /// Cancel a ticket whose loyalty sync failed.
    async fn compensate(&self, username: &str, ticket_uid: &str, ticket: &NewTicket) {
        let canceled = TicketDescriptor {
            ticket_uid: ticket_uid.to_string(),
            flight_number: ticket.flight_number.clone(),
            price: ticket.price,
            status: TicketStatus::Canceled,
        };

        match self.tickets.update_ticket(&canceled).await {
            Ok(()) => {
                COMPENSATIONS.with_label_values(&["success"]).inc();
                warn!(
                    user = username,
                    ticket = ticket_uid,
                    "Canceled ticket after loyalty sync failure"
                );
            }
            Err(e) => {
                COMPENSATIONS.with_label_values(&["error"]).inc();
                error!(
                    user = username,
                    ticket = ticket_uid,
                    "Compensating cancellation failed, ticket left PAID: {}", e
                );
            }
        }
    }

    async fn resolve_flight(&self, flight_number: &str) -> Result<FlightDescriptor, BookingError> {
        match self.flights.find_flight(flight_number).await {
            Ok(Some(flight)) => Ok(flight),
            Ok(None) => {
                warn!(flight = flight_number, "Flight not found");
                Err(BookingError::FlightNotFound(flight_number.to_string()))
            }
            Err(source) => {
                error!(flight = flight_number, "Flight lookup failed: {}", source);
                Err(BookingError::FlightLookupFailed {
                    flight_number: flight_number.to_string(),
                    source,
                })
            }
        }
    }

    async fn resolve_privilege(&self, username: &str) -> Result<PrivilegeSnapshot, BookingError> {
        match self.privileges.get_privilege(username).await {
            Ok(Some(privilege)) => Ok(privilege),
            Ok(None) => Err(BookingError::PrivilegeNotFound(username.to_string())),
            Err(e) => {
                error!(user = username, "Privilege lookup failed: {}", e);
                Err(BookingError::Upstream(e))
            }
        }
    }

    async fn describe(&self, ticket: TicketDescriptor) -> Result<TicketInfo, BookingError> {
        let flight = self.resolve_flight(&ticket.flight_number).await?;
        Ok(TicketInfo::compose(ticket, flight))
    }

    /// One page of the flight listing. Raw query values are normalized.
    pub async fn list_flights(
        &self,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<FlightsPage, BookingError> {
        let paging = Paging::from_query(page, size);
        let listing = self.flights.list_flights(paging).await?;

        Ok(FlightsPage {
            page: paging.page,
            page_size: paging.size,
            total_elements: listing.total,
            items: listing.items,
        })
    }

    /// All of the user's tickets with their flights. Any failed flight
    /// lookup fails the whole view.
    pub async fn my_tickets(&self, username: &str) -> Result<Vec<TicketInfo>, BookingError> {
        let tickets = self.tickets.list_tickets(username).await?;
        try_join_all(tickets.into_iter().map(|ticket| self.describe(ticket))).await
    }

    /// One ticket by UID, scoped to its owner.
    pub async fn ticket(&self, username: &str, ticket_uid: &str) -> Result<TicketInfo, BookingError> {
        let ticket = self
            .tickets
            .find_ticket(username, ticket_uid)
            .await?
            .ok_or_else(|| BookingError::TicketNotFound(ticket_uid.to_string()))?;
        self.describe(ticket).await
    }

    /// Mark a ticket `CANCELED`. The loyalty ledger is not touched.
    pub async fn cancel_ticket(&self, username: &str, ticket_uid: &str) -> Result<(), BookingError> {
        let ticket = self
            .tickets
            .find_ticket(username, ticket_uid)
            .await?
            .ok_or_else(|| BookingError::TicketNotFound(ticket_uid.to_string()))?;

        if ticket.status == TicketStatus::Canceled {
            debug!(user = username, ticket = ticket_uid, "Ticket already canceled");
            return Ok(());
        }

        let canceled = TicketDescriptor {
            status: TicketStatus::Canceled,
            ..ticket
        };
        self.tickets.update_ticket(&canceled).await?;
        CANCELLATIONS.inc();
        info!(user = username, ticket = ticket_uid, "Ticket canceled");

        Ok(())
    }

    /// Tickets plus loyalty account.
    pub async fn user_info(&self, username: &str) -> Result<UserInfo, BookingError> {
        let (tickets, privilege) =
            futures::try_join!(self.my_tickets(username), self.resolve_privilege(username))?;

        Ok(UserInfo {
            tickets,
            privilege: privilege.into(),
        })
    }

    /// Loyalty account with its unmodified history.
    pub async fn privilege_summary(&self, username: &str) -> Result<PrivilegeSummary, BookingError> {
        let privilege = self.resolve_privilege(username).await?;
        let history = self.privileges.history(username).await?;

        Ok(PrivilegeSummary {
            balance: privilege.balance,
            status: privilege.status,
            history,
        })
    }
}

fn validate_purchase(request: &PurchaseRequest) -> Result<(), BookingError> {
    if request.flight_number.trim().is_empty() {
        return Err(BookingError::InvalidRequest(
            "flightNumber must not be empty".to_string(),
        ));
    }
    if request.flight_number.chars().any(char::is_control) {
        return Err(BookingError::InvalidRequest(
            "flightNumber must not contain control characters".to_string(),
        ));
    }
    if request.price <= 0 {
        return Err(BookingError::InvalidRequest(format!(
            "price must be positive, got {}",
            request.price
        )));
    }
    Ok(())
}
