//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod health;
mod identity;
mod provisioner;
pub mod request;
pub mod response;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::middleware::RouterExt;
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns the complete router with state and middleware applied.
pub fn routes(state: ServiceState) -> Router {
    Router::new()
        .merge(identity::routes())
        .merge(provisioner::routes())
        .merge(health::routes())
        .fallback(fallback)
        .with_state(state)
        .with_default_layers()
}
