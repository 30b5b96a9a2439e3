//! A periodically refreshed map of the cluster's API surface
use std::{collections::HashMap, sync::Arc, time::Duration};

use parking_lot::RwLock;
use tokio::{task::JoinHandle, time};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use crate::{
    discovery::ApiResource,
    error::{DiscoveryError, Error},
    gvk::{GroupVersion, ParseGroupVersionError},
    source::{ApiResourceList, DiscoverySource},
    Result,
};

/// Lookup indices for every resource served under one group-version
#[derive(Debug, Default, PartialEq)]
struct GroupVersionEntry {
    /// Descriptors by plural resource name
    resources: HashMap<String, Arc<ApiResource>>,
    /// The same descriptors by kind
    kinds: HashMap<String, Arc<ApiResource>>,
}

/// One complete, immutable view of the cluster's API surface
///
/// Built from a single enumeration of the discovery source and never mutated
/// afterwards, so holders of a snapshot reference can traverse it freely
/// while newer snapshots are being published.
#[derive(Debug, Default, PartialEq)]
pub struct Snapshot {
    group_versions: HashMap<String, GroupVersionEntry>,
}

impl Snapshot {
    /// Denormalize a raw catalog into lookup indices.
    ///
    /// Group/version fields left blank by the source are defaulted from the
    /// owning group-version before anything is indexed. Subresource records
    /// (raw names containing `/`) are folded into the subresource set of
    /// their owning resource; ones without an owner in the same
    /// group-version are skipped.
    fn build(catalog: &[ApiResourceList]) -> Result<Self, DiscoveryError> {
        let mut group_versions = HashMap::with_capacity(catalog.len());
        for list in catalog {
            let gv: GroupVersion = list
                .group_version
                .parse()
                .map_err(|ParseGroupVersionError(gv)| DiscoveryError::InvalidGroupVersion(gv))?;

            let mut resources = HashMap::with_capacity(list.resources.len());
            let mut subresource_names = Vec::new();
            for spec in &list.resources {
                if spec.name.contains('/') {
                    subresource_names.push(spec.name.as_str());
                } else {
                    resources.insert(spec.name.clone(), ApiResource::from_spec(spec, &gv));
                }
            }

            for name in subresource_names {
                // names are of the form `resource/subresource`
                let Some((owner, subresource)) = name.split_once('/') else {
                    continue;
                };
                match resources.get_mut(owner) {
                    Some(ar) => {
                        ar.subresources.insert(subresource.to_string());
                    }
                    // incomplete server response, not an error
                    None => trace!(subresource = name, "skipping subresource without an owning resource"),
                }
            }

            let mut entry = GroupVersionEntry::default();
            for (name, ar) in resources {
                let ar = Arc::new(ar);
                entry.kinds.insert(ar.kind.clone(), Arc::clone(&ar));
                entry.resources.insert(name, ar);
            }
            group_versions.insert(list.group_version.clone(), entry);
        }
        Ok(Snapshot { group_versions })
    }

    /// Returns the resource with the given plural name under an apiVersion, if known
    pub fn get(&self, api_version: &str, resource: &str) -> Option<Arc<ApiResource>> {
        self.group_versions
            .get(api_version)?
            .resources
            .get(resource)
            .cloned()
    }

    /// Returns the resource with the given kind under an apiVersion, if known
    pub fn get_kind(&self, api_version: &str, kind: &str) -> Option<Arc<ApiResource>> {
        self.group_versions.get(api_version)?.kinds.get(kind).cloned()
    }

    /// Returns all apiVersion strings this snapshot has entries for
    pub fn api_versions(&self) -> impl Iterator<Item = &str> {
        self.group_versions.keys().map(String::as_str)
    }

    /// Returns all resources served under the given apiVersion
    pub fn resources(&self, api_version: &str) -> Vec<Arc<ApiResource>> {
        self.group_versions
            .get(api_version)
            .map(|gve| gve.resources.values().cloned().collect())
            .unwrap_or_default()
    }
}

struct Inner {
    source: Box<dyn DiscoverySource>,
    /// The only locked field; held for an `Arc` clone on reads and a
    /// reference swap on writes, never while traversing or building.
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    /// Marked once the first snapshot is published, never unmarked.
    ready: CancellationToken,
}

impl Inner {
    async fn refresh(&self) -> Result<()> {
        debug!("refreshing API discovery info");
        // Fetch and denormalize before taking the lock so a slow or hung
        // enumeration never blocks readers.
        let catalog = self.source.server_resources().await?;
        let snapshot = Arc::new(Snapshot::build(&catalog).map_err(Error::Discovery)?);
        *self.snapshot.write() = Some(snapshot);
        self.ready.cancel();
        Ok(())
    }
}

struct RefreshTask {
    stop: CancellationToken,
    handle: JoinHandle<()>,
}

/// A self-refreshing cache of every API resource type served by the cluster
///
/// Translates an apiVersion plus a plural resource name or kind into a
/// resolved [`ApiResource`] without a network call per lookup. A background
/// task started with [`ResourceMap::start`] re-enumerates the
/// [`DiscoverySource`] on an interval and atomically swaps in a fully-built
/// [`Snapshot`]; on enumeration failure the previous snapshot stays
/// authoritative, so lookups degrade to stale rather than empty.
///
/// Lookups before the first successful refresh return `None`; dependents
/// that need the catalog populated should gate on [`ResourceMap::is_synced`]
/// or await [`ResourceMap::synced`] first.
pub struct ResourceMap {
    inner: Arc<Inner>,
    task: Option<RefreshTask>,
}

impl ResourceMap {
    /// Construct a cache over the given discovery source
    ///
    /// The cache is empty (and not synced) until the first successful
    /// [`ResourceMap::refresh`], usually triggered by [`ResourceMap::start`].
    pub fn new(source: impl DiscoverySource + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                source: Box::new(source),
                snapshot: RwLock::new(None),
                ready: CancellationToken::new(),
            }),
            task: None,
        }
    }

    /// Returns the resource with the given plural name under an apiVersion
    ///
    /// `None` means the type is not currently known to the cluster (or the
    /// cache has not synced yet); this is an expected outcome when probing
    /// for optional CRDs, not an error.
    pub fn get(&self, api_version: &str, resource: &str) -> Option<Arc<ApiResource>> {
        let snapshot = self.inner.snapshot.read().clone()?;
        snapshot.get(api_version, resource)
    }

    /// Returns the resource with the given kind under an apiVersion
    pub fn get_kind(&self, api_version: &str, kind: &str) -> Option<Arc<ApiResource>> {
        let snapshot = self.inner.snapshot.read().clone()?;
        snapshot.get_kind(api_version, kind)
    }

    /// Returns the currently published snapshot, if any
    ///
    /// The returned snapshot stays valid (and unchanged) even if the refresh
    /// loop publishes a newer one while it is held.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.snapshot.read().clone()
    }

    /// Whether at least one refresh has successfully published a snapshot
    ///
    /// Monotonic: stays `true` even if later refreshes fail.
    pub fn is_synced(&self) -> bool {
        self.inner.snapshot.read().is_some()
    }

    /// Wait until at least one refresh has successfully published a snapshot
    pub async fn synced(&self) {
        self.inner.ready.cancelled().await;
    }

    /// Enumerate the discovery source once and publish a new snapshot
    ///
    /// On failure nothing is published and the previous snapshot (if any)
    /// remains authoritative. The background loop calls this on every tick;
    /// it can also be called directly for an on-demand refresh.
    pub async fn refresh(&self) -> Result<()> {
        self.inner.refresh().await
    }

    /// Spawn the background refresh loop
    ///
    /// The first refresh happens immediately, then once per `interval`.
    /// Starting an already started map leaks the previous loop's stop
    /// handle; callers are expected to [`ResourceMap::stop`] first.
    pub fn start(&mut self, interval: Duration) {
        let inner = Arc::clone(&self.inner);
        let stop = CancellationToken::new();
        let token = stop.clone();
        let handle = tokio::spawn(async move {
            let mut tick = time::interval(interval);
            tick.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
            // the first tick completes immediately; consume it so the select
            // below waits a full interval between refreshes
            tick.tick().await;
            loop {
                if let Err(err) = inner.refresh().await {
                    match &err {
                        Error::Discovery(_) => {
                            error!(%err, "discovery source returned a corrupt catalog; keeping previous snapshot")
                        }
                        Error::Service(_) => {
                            warn!(%err, "failed to refresh API discovery info; keeping previous snapshot")
                        }
                    }
                }
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = tick.tick() => {}
                }
            }
        });
        self.task = Some(RefreshTask { stop, handle });
    }

    /// Stop the background refresh loop and wait for it to exit
    ///
    /// Cancellation is cooperative: an in-flight enumeration is not
    /// interrupted, so this can block for up to the duration of one fetch.
    /// Once `stop` returns, no further refresh will run. No-op if the loop
    /// was never started.
    pub async fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.stop.cancel();
            let _ = task.handle.await;
        }
    }
}

impl Drop for ResourceMap {
    fn drop(&mut self) {
        // signal the loop to exit; it owns an Arc to Inner so it cannot be
        // joined here, only told to stop at its next wait point
        if let Some(task) = &self.task {
            task.stop.cancel();
        }
    }
}
