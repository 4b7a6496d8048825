pub mod booking;
pub mod clients;
pub mod config;
pub mod flight;
pub mod metrics;
pub mod privilege;
pub mod store;
pub mod testing;
pub mod ticket;

pub use booking::{
    BookingConfig, BookingError, BookingOrchestrator, PurchaseDecision, PurchaseRequest,
    PurchaseResult,
};
pub use clients::{FlightDirectory, PrivilegeLedger, TicketLedger, UpstreamError};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError,
    LoyaltyFailurePolicy, ServiceRole,
};
pub use store::StoreError;
