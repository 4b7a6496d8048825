use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{flights, gateway, handlers, privileges, tickets};
use super::middleware::metrics_middleware;
use crate::state::{BonusServiceState, FlightServiceState, GatewayState, TicketServiceState};

/// Endpoints shared by every service, plus the common layers.
fn finish(api_routes: Router) -> Router {
    Router::new()
        .route("/manage/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}

pub fn create_gateway_router(state: Arc<GatewayState>) -> Router {
    let api_routes = Router::new()
        .route("/flights", get(gateway::list_flights))
        .route("/me", get(gateway::me))
        .route(
            "/tickets",
            get(gateway::list_tickets).post(gateway::purchase),
        )
        .route(
            "/tickets/{ticket_uid}",
            get(gateway::get_ticket).delete(gateway::cancel_ticket),
        )
        .route("/privilege", get(gateway::privilege))
        .with_state(state);

    finish(api_routes)
}

pub fn create_flight_router(state: Arc<FlightServiceState>) -> Router {
    let api_routes = Router::new()
        .route(
            "/flights",
            get(flights::list_flights).post(flights::create_flight),
        )
        .route("/flightsPaginate", get(flights::list_flights_page))
        .route(
            "/flights/{id}",
            get(flights::get_flight)
                .patch(flights::update_flight)
                .delete(flights::delete_flight),
        )
        .route("/airports", post(flights::create_airport))
        .with_state(state);

    finish(api_routes)
}

pub fn create_ticket_router(state: Arc<TicketServiceState>) -> Router {
    let api_routes = Router::new()
        .route(
            "/tickets",
            get(tickets::list_tickets)
                .post(tickets::create_ticket)
                .patch(tickets::update_ticket),
        )
        .route("/ticketsByUID", get(tickets::get_ticket_by_uid))
        .route(
            "/tickets/{id}",
            get(tickets::get_ticket).delete(tickets::delete_ticket),
        )
        .with_state(state);

    finish(api_routes)
}

pub fn create_bonus_router(state: Arc<BonusServiceState>) -> Router {
    let api_routes = Router::new()
        .route(
            "/privileges",
            get(privileges::get_privileges)
                .post(privileges::create_privilege)
                .patch(privileges::update_privilege),
        )
        .route(
            "/privileges/{id}",
            get(privileges::get_privilege).delete(privileges::delete_privilege),
        )
        .route("/privileges/history", post(privileges::append_history))
        .route("/privilegeHistory", get(privileges::history))
        .with_state(state);

    finish(api_routes)
}
