use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl Config {
    /// Address to bind, falling back to the role's conventional port.
    pub fn listen_addr(&self) -> SocketAddr {
        let port = self
            .server
            .port
            .unwrap_or_else(|| self.service.role.default_port());
        SocketAddr::new(self.server.host, port)
    }
}

/// Which of the four services this process runs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub role: ServiceRole,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServiceRole {
    Gateway,
    Flight,
    Ticket,
    Bonus,
}

impl ServiceRole {
    pub fn default_port(&self) -> u16 {
        match self {
            ServiceRole::Gateway => 8080,
            ServiceRole::Bonus => 8050,
            ServiceRole::Flight => 8060,
            ServiceRole::Ticket => 8070,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceRole::Gateway => "gateway",
            ServiceRole::Flight => "flight",
            ServiceRole::Ticket => "ticket",
            ServiceRole::Bonus => "bonus",
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    /// Listening port. When unset the role's default port is used.
    #[serde(default)]
    pub port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

/// Database configuration (ledger services only; the gateway is stateless)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("skyward.db")
}

/// What the gateway does when recording loyalty history or persisting the
/// new balance fails after the ticket already exists.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoyaltyFailurePolicy {
    /// Log and count the failure, keep the purchase.
    #[default]
    BestEffort,
    /// Cancel the freshly created ticket and fail the purchase.
    Compensate,
}

/// Gateway configuration: where the downstream services live and how the
/// purchase flow treats partial failures.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    #[serde(default = "default_flight_url")]
    pub flight_url: String,
    #[serde(default = "default_ticket_url")]
    pub ticket_url: String,
    #[serde(default = "default_bonus_url")]
    pub bonus_url: String,
    /// Per-call timeout for downstream requests, in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub loyalty_failure_policy: LoyaltyFailurePolicy,
    /// Serialize purchases per buyer inside this gateway process.
    #[serde(default)]
    pub serialize_purchases: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            flight_url: default_flight_url(),
            ticket_url: default_ticket_url(),
            bonus_url: default_bonus_url(),
            timeout_secs: default_timeout(),
            loyalty_failure_policy: LoyaltyFailurePolicy::default(),
            serialize_purchases: false,
        }
    }
}

fn default_flight_url() -> String {
    "http://flight_msv:8060".to_string()
}

fn default_ticket_url() -> String {
    "http://ticket_msv:8070".to_string()
}

fn default_bonus_url() -> String {
    "http://bonus_msv:8050".to_string()
}

fn default_timeout() -> u64 {
    10
}
