//! Error types for provisioning operations.

use std::time::Duration;

use strum::{AsRefStr, Display, IntoStaticStr};

/// Result type alias for provisioning operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The provisioner call an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, IntoStaticStr)]
pub enum Action {
    #[strum(serialize = "DriverCreateBucket")]
    CreateBucket,
    #[strum(serialize = "DriverDeleteBucket")]
    DeleteBucket,
    #[strum(serialize = "DriverGrantBucketAccess")]
    GrantBucketAccess,
    #[strum(serialize = "DriverRevokeBucketAccess")]
    RevokeBucketAccess,
}

/// Categories of provisioning failures.
///
/// Callers map these onto their own status vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// A required request field was empty or malformed.
    InvalidArgument,
    /// The targeted bucket does not exist.
    NotFound,
    /// The request asked for something the driver does not implement.
    Unsupported,
    /// The appliance rejected a call or could not be reached.
    Remote,
    /// The operation did not finish in time.
    Timeout,
}

/// Error type for provisioning operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors should be handled appropriately"]
pub enum Error {
    /// A required request field was empty.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A bucket identifier could not be split into backend and bucket name.
    #[error("Invalid bucket ID '{0}'")]
    InvalidBucketId(String),

    /// The request asked for an unimplemented feature.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// A remote call failed.
    #[error("{action}: {step}: {source}")]
    Remote {
        action: Action,
        step: &'static str,
        #[source]
        source: cosi_powerscale::Error,
    },

    /// The operation exceeded its deadline.
    #[error("{action}: timed out after {}s", .timeout.as_secs())]
    Timeout { action: Action, timeout: Duration },
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) | Self::InvalidBucketId(_) => ErrorKind::InvalidArgument,
            Self::Unsupported(_) => ErrorKind::Unsupported,
            Self::Remote {
                source: cosi_powerscale::Error::BucketNotFound(_),
                ..
            } => ErrorKind::NotFound,
            Self::Remote { .. } => ErrorKind::Remote,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    /// Returns whether re-issuing the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Remote { source, .. } => source.is_retryable(),
            Self::Timeout { .. } => true,
            Self::InvalidArgument(_) | Self::InvalidBucketId(_) | Self::Unsupported(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use cosi_powerscale::Error as BackendError;

    use super::*;

    fn remote(source: BackendError) -> Error {
        Error::Remote {
            action: Action::GrantBucketAccess,
            step: "failed to update bucket ACL",
            source,
        }
    }

    #[test]
    fn display_names_the_action_and_step() {
        let error = remote(BackendError::Config("no zone".into()));
        assert_eq!(
            error.to_string(),
            "DriverGrantBucketAccess: failed to update bucket ACL: Configuration error: no zone"
        );

        let error = Error::Timeout {
            action: Action::CreateBucket,
            timeout: Duration::from_secs(20),
        };
        assert_eq!(error.to_string(), "DriverCreateBucket: timed out after 20s");
    }

    #[test]
    fn action_names_match_driver_calls() {
        let names: Vec<&'static str> = [
            Action::CreateBucket,
            Action::DeleteBucket,
            Action::GrantBucketAccess,
            Action::RevokeBucketAccess,
        ]
        .into_iter()
        .map(Into::into)
        .collect();
        assert_eq!(
            names,
            [
                "DriverCreateBucket",
                "DriverDeleteBucket",
                "DriverGrantBucketAccess",
                "DriverRevokeBucketAccess",
            ]
        );
    }

    #[test]
    fn kinds() {
        let bad_id = Error::InvalidBucketId("x".into());
        assert_eq!(bad_id.kind(), ErrorKind::InvalidArgument);
        let missing = remote(BackendError::BucketNotFound("reports".into()));
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        let config = remote(BackendError::Config("x".into()));
        assert_eq!(config.kind(), ErrorKind::Remote);
        assert_eq!(ErrorKind::InvalidArgument.as_ref(), "invalid_argument");
    }

    #[test]
    fn retryability_follows_the_cause() {
        let invalid = Error::InvalidArgument("empty bucket name".into());
        assert!(!invalid.is_retryable());
        let config = remote(BackendError::Config("x".into()));
        assert!(!config.is_retryable());
        let missing = remote(BackendError::BucketNotFound("x".into()));
        assert!(missing.is_retryable());
    }
}
