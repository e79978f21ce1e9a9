//! Panic recovery.

use std::any::Any;

use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;

use crate::handler::ErrorKind;

/// Tracing target for panic recovery.
const TRACING_TARGET_PANIC: &str = "cosi_server::recovery::panic";

type Panic = Box<dyn Any + Send + 'static>;

/// Creates a layer turning handler panics into `internal_server_error`
/// responses.
pub fn create_catch_panic_layer() -> CatchPanicLayer<fn(Panic) -> Response> {
    CatchPanicLayer::custom(handle_panic as fn(Panic) -> Response)
}

fn handle_panic(panic: Panic) -> Response {
    let details = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic payload"
    };

    tracing::error!(target: TRACING_TARGET_PANIC, panic = %details, "Handler panicked");
    ErrorKind::InternalServerError.into_response()
}
