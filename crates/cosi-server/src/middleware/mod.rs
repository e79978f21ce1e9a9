//! Tower layers applied to the whole router.

mod observability;
mod recovery;

use axum::Router;

pub use self::observability::{
    create_propagate_request_id_layer, create_request_id_layer, create_sensitive_headers_layer,
    create_trace_layer,
};
pub use self::recovery::create_catch_panic_layer;

/// Extension trait adding the standard layer stack to a [`Router`].
pub trait RouterExt<S> {
    /// Adds request IDs, request tracing and panic recovery.
    fn with_default_layers(self) -> Self;
}

impl<S> RouterExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_default_layers(self) -> Self {
        // Layers run bottom to top on the way in.
        self.layer(create_catch_panic_layer())
            .layer(create_propagate_request_id_layer())
            .layer(create_trace_layer())
            .layer(create_sensitive_headers_layer())
            .layer(create_request_id_layer())
    }
}
