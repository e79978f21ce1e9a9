//! Response bodies.

mod error_response;
mod health;
mod identity;
mod provisioner;

pub use error_response::ErrorResponse;
pub use health::{ServiceHealth, ServiceStatus};
pub use identity::DriverInfoResponse;
pub use provisioner::{
    CreateBucketResponse, DeleteBucketResponse, GrantBucketAccessResponse,
    RevokeBucketAccessResponse,
};
