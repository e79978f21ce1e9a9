use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Coarse service status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Unhealthy,
}

/// Liveness report of the driver process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealth {
    pub status: ServiceStatus,
    pub checked_at: Timestamp,
    /// Driver name, absent when the backend name is not configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
}
