//! A self-refreshing, read-optimized cache of a cluster's API surface
//!
//! [`ResourceMap`] periodically enumerates every resource type served by the
//! apiserver through an opaque [`DiscoverySource`], denormalizes the catalog
//! into an immutable [`Snapshot`], and publishes it with a single reference
//! swap. Lookups clone the current snapshot reference under a read lock and
//! resolve against it lock-free, so any number of concurrent readers proceed
//! without contending with each other or delaying the refresh loop.
//!
//! A failed refresh never disturbs published data: the previous snapshot
//! stays authoritative until a newer complete one replaces it. Dependents
//! that must not act before the type catalog is known can gate on
//! [`ResourceMap::is_synced`] or await [`ResourceMap::synced`].

pub mod discovery;
pub mod error;
pub mod gvk;
pub mod map;
pub mod source;

pub use discovery::ApiResource;
pub use error::{DiscoveryError, Error};
pub use gvk::{GroupResource, GroupVersion, GroupVersionKind, GroupVersionResource};
pub use map::{ResourceMap, Snapshot};
pub use source::{ApiResourceList, ApiResourceSpec, DiscoverySource};

/// Convient alias for `Result<T, Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;
