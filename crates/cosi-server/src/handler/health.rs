//! Liveness endpoint.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use cosi_provisioner::DriverIdentity;
use jiff::Timestamp;

use super::response::{ServiceHealth, ServiceStatus};
use crate::extract::Json;
use crate::service::ServiceState;

/// Tracing target for health checks.
const TRACING_TARGET: &str = "cosi_server::handler::health";

/// Reports that the process is serving requests.
///
/// The appliance is not contacted. A driver without a backend name is
/// reported as unhealthy.
async fn health(State(identity): State<DriverIdentity>) -> (StatusCode, Json<ServiceHealth>) {
    let driver = identity.driver_name().ok();
    let (status, code) = match driver {
        Some(_) => (ServiceStatus::Healthy, StatusCode::OK),
        None => (ServiceStatus::Unhealthy, StatusCode::SERVICE_UNAVAILABLE),
    };

    tracing::trace!(target: TRACING_TARGET, ?status, "Health check");

    let health = ServiceHealth {
        status,
        checked_at: Timestamp::now(),
        driver,
    };
    (code, Json(health))
}

/// Returns a [`Router`] with the health route.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use cosi_powerscale::MockPowerscale;
    use cosi_provisioner::ProvisionerConfig;

    use super::*;
    use crate::handler::test::create_test_server;
    use crate::routes;

    #[tokio::test]
    async fn reports_healthy_without_backend_calls() -> anyhow::Result<()> {
        let mock = MockPowerscale::default();
        let server = create_test_server(&mock)?;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let health = response.json::<ServiceHealth>();
        assert_eq!(health.status, ServiceStatus::Healthy);
        assert_eq!(
            health.driver.as_deref(),
            Some("backendX.powerscale.cosi.japannext.co.jp")
        );
        let age = Timestamp::now().duration_since(health.checked_at);
        assert!(age.as_secs() < 60);
        assert!(mock.calls().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn missing_backend_name_is_unhealthy() -> anyhow::Result<()> {
        let state = ServiceState::new(
            MockPowerscale::default(),
            ProvisionerConfig::new("", "https://s3"),
        );
        let server = TestServer::new(routes(state))?;

        let response = server.get("/health").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let health = response.json::<ServiceHealth>();
        assert_eq!(health.status, ServiceStatus::Unhealthy);
        Ok(())
    }
}
