//! Identity service handlers.

use axum::Router;
use axum::extract::State;
use axum::routing::post;
use cosi_provisioner::DriverIdentity;

use super::request::DriverInfoRequest;
use super::response::DriverInfoResponse;
use crate::extract::Json;
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for identity handlers.
const TRACING_TARGET: &str = "cosi_server::handler::identity";

/// Reports the driver name.
#[tracing::instrument(skip_all)]
async fn driver_info(
    State(identity): State<DriverIdentity>,
    _request: Option<Json<DriverInfoRequest>>,
) -> Result<Json<DriverInfoResponse>> {
    let info = identity.driver_info()?;
    tracing::debug!(target: TRACING_TARGET, driver = %info.name, "Driver info served");
    Ok(Json(info.into()))
}

/// Returns a [`Router`] with the identity routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/v1alpha1/identity/driver-info", post(driver_info))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use cosi_powerscale::MockPowerscale;
    use cosi_provisioner::ProvisionerConfig;

    use super::*;
    use crate::handler::test::create_test_server;
    use crate::routes;

    #[tokio::test]
    async fn reports_driver_name() -> anyhow::Result<()> {
        let server = create_test_server(&MockPowerscale::default())?;
        let response = server
            .post("/v1alpha1/identity/driver-info")
            .json(&DriverInfoRequest::default())
            .await;
        response.assert_status_ok();

        let info = response.json::<DriverInfoResponse>();
        assert_eq!(info.name, "backendX.powerscale.cosi.japannext.co.jp");
        Ok(())
    }

    #[tokio::test]
    async fn empty_backend_is_bad_request() -> anyhow::Result<()> {
        let state = ServiceState::new(
            MockPowerscale::default(),
            ProvisionerConfig::new("", "https://s3"),
        );
        let server = TestServer::new(routes(state))?;

        let response = server.post("/v1alpha1/identity/driver-info").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }
}
