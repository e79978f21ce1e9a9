//! Provisioner service handlers.
//!
//! Each handler unpacks its request body, delegates to [`Provisioner`] and
//! converts the outcome. Failures are mapped onto HTTP statuses by
//! [`Error`](crate::handler::Error).

use axum::Router;
use axum::extract::State;
use axum::routing::post;
use cosi_provisioner::Provisioner;

use super::request::{
    CreateBucketRequest, DeleteBucketRequest, GrantBucketAccessRequest,
    RevokeBucketAccessRequest,
};
use super::response::{
    CreateBucketResponse, DeleteBucketResponse, GrantBucketAccessResponse,
    RevokeBucketAccessResponse,
};
use crate::extract::Json;
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for provisioner handlers.
const TRACING_TARGET: &str = "cosi_server::handler::provisioner";

#[tracing::instrument(skip_all, fields(bucket = %request.name))]
async fn create_bucket(
    State(provisioner): State<Provisioner>,
    Json(request): Json<CreateBucketRequest>,
) -> Result<Json<CreateBucketResponse>> {
    tracing::debug!(
        target: TRACING_TARGET,
        parameters = request.parameters.len(),
        "Create bucket requested"
    );

    let bucket_id = provisioner.create_bucket(&request.name).await?;
    Ok(Json(bucket_id.into()))
}

#[tracing::instrument(skip_all, fields(bucket_id = %request.bucket_id))]
async fn delete_bucket(
    State(provisioner): State<Provisioner>,
    Json(request): Json<DeleteBucketRequest>,
) -> Result<Json<DeleteBucketResponse>> {
    provisioner.delete_bucket(&request.bucket_id).await?;
    Ok(Json(DeleteBucketResponse::default()))
}

#[tracing::instrument(
    skip_all,
    fields(bucket_id = %request.bucket_id, user_name = %request.name)
)]
async fn grant_bucket_access(
    State(provisioner): State<Provisioner>,
    Json(request): Json<GrantBucketAccessRequest>,
) -> Result<Json<GrantBucketAccessResponse>> {
    tracing::debug!(
        target: TRACING_TARGET,
        authentication_type = %request.authentication_type,
        parameters = request.parameters.len(),
        "Grant bucket access requested"
    );

    let access = provisioner
        .grant_bucket_access(
            &request.bucket_id,
            &request.name,
            request.authentication_type,
        )
        .await?;
    Ok(Json(access.into()))
}

#[tracing::instrument(
    skip_all,
    fields(bucket_id = %request.bucket_id, user_name = %request.account_id)
)]
async fn revoke_bucket_access(
    State(provisioner): State<Provisioner>,
    Json(request): Json<RevokeBucketAccessRequest>,
) -> Result<Json<RevokeBucketAccessResponse>> {
    provisioner
        .revoke_bucket_access(&request.bucket_id, &request.account_id)
        .await?;
    Ok(Json(RevokeBucketAccessResponse::default()))
}

/// Returns a [`Router`] with the provisioner routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/v1alpha1/provisioner/create-bucket", post(create_bucket))
        .route("/v1alpha1/provisioner/delete-bucket", post(delete_bucket))
        .route(
            "/v1alpha1/provisioner/grant-bucket-access",
            post(grant_bucket_access),
        )
        .route(
            "/v1alpha1/provisioner/revoke-bucket-access",
            post(revoke_bucket_access),
        )
}
