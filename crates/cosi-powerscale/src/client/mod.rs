//! Reqwest-based client for the OneFS platform API.

mod powerscale_client;
mod tls;

pub use powerscale_client::PowerscaleClient;
