/// Result type alias for service construction.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures while assembling the service state.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The appliance client could not be built.
    #[error("PowerScale client: {0}")]
    Backend(#[from] cosi_powerscale::Error),

    /// The provisioner settings are invalid.
    #[error("Provisioner: {0}")]
    Provisioner(#[from] cosi_provisioner::Error),
}
