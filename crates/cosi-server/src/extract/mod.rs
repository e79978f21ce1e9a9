//! Request extractors with error responses in the handler format.

mod json;

pub use json::Json;
