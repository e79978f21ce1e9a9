//! Request bodies.

mod identity;
mod provisioner;

pub use identity::DriverInfoRequest;
pub use provisioner::{
    CreateBucketRequest, DeleteBucketRequest, GrantBucketAccessRequest,
    RevokeBucketAccessRequest,
};
