#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod bucket_id;
mod config;
pub mod credentials;
mod error;
mod identity;
mod provisioner;

pub use crate::bucket_id::BucketId;
pub use crate::config::{DEFAULT_OPERATION_TIMEOUT_SECS, ProvisionerConfig};
pub use crate::credentials::{CredentialDetails, Credentials};
pub use crate::error::{Action, Error, ErrorKind, Result};
pub use crate::identity::{DRIVER_NAME_SUFFIX, DriverIdentity, DriverInfo};
pub use crate::provisioner::{AuthenticationType, BucketAccess, Provisioner};

/// Tracing target for provisioning operations.
pub const TRACING_TARGET: &str = "cosi_provisioner::provisioner";

/// Tracing target for the driver identity service.
pub const TRACING_TARGET_IDENTITY: &str = "cosi_provisioner::identity";
