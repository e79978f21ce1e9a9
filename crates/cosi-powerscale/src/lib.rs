#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod acl;
mod api;
mod client;
mod config;
mod error;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod fake_appliance;
#[cfg(feature = "test-utils")]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub use reqwest::StatusCode;

pub use crate::api::PowerscaleApi;
pub use crate::client::PowerscaleClient;
pub use crate::config::{DEFAULT_HTTP_TIMEOUT_SECS, PowerscaleConfig};
pub use crate::error::{Error, Result};
#[cfg(feature = "test-utils")]
pub use crate::fake_appliance::FakeAppliance;
#[cfg(feature = "test-utils")]
pub use crate::mock::{MockCall, MockPowerscale};
pub use crate::types::{AccessKey, AclEntry, AclPermission, Bucket, Grantee, ObjectAclPolicy, User};

/// Tracing target for the HTTP client.
pub const TRACING_TARGET_CLIENT: &str = "cosi_powerscale::client";

/// Tracing target for ACL read-modify-write cycles.
pub const TRACING_TARGET_ACL: &str = "cosi_powerscale::acl";
