pub mod error;
pub mod flights;
pub mod gateway;
pub mod handlers;
pub mod middleware;
pub mod privileges;
pub mod routes;
pub mod tickets;

pub use error::{ApiError, ErrorResponse};
pub use routes::{
    create_bonus_router, create_flight_router, create_gateway_router, create_ticket_router,
};
