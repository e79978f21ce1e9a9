//! Application state and dependency injection.

mod error;
mod state;

pub use error::{Error, Result};
pub use state::ServiceState;
