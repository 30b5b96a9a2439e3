//! Error handling in [`discovery_cache`][crate]
use thiserror::Error;

/// Possible errors from a discovery refresh
#[derive(Error, Debug)]
pub enum Error {
    /// Any error from the discovery source when enumerating server resources
    ///
    /// Treated as transient: the refresh loop logs it and keeps serving the
    /// previously published snapshot (or none, if nothing was published yet).
    #[error("ServiceError: {0}")]
    Service(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Discovery data errors
    ///
    /// The source returned data that violates its contract. The refresh
    /// attempt is aborted without publishing, so a corrupt catalog can never
    /// replace a valid snapshot.
    #[error("Error from discovery: {0}")]
    Discovery(#[source] DiscoveryError),
}

#[derive(Error, Debug)]
// Redundant with the error messages and machine names
#[allow(missing_docs)]
/// Possible errors when parsing the discovery catalog
pub enum DiscoveryError {
    #[error("Invalid GroupVersion: {0}")]
    InvalidGroupVersion(String),
}
