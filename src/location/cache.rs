//! Volume location cache
//!
//! Memoizes master lookups per volume id and hands back one server address
//! per call. Entries are written once, on the first successful non-empty
//! lookup, and never invalidated. Empty lookups are not cached, so the next
//! resolve for that volume asks the master again.
//!
//! Hits only take the shared read lock. Lookups run outside any lock; two
//! callers racing on the same missing volume may both look it up, and the
//! last insert wins.

use crate::common::{Error, Result, ToVolumeId, VolumeId};
use crate::location::{DirectoryClient, LocationLookup, SelectionStrategy};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct VolumeLocationCache<L = DirectoryClient> {
    lookup: L,
    table: RwLock<HashMap<VolumeId, SelectionStrategy>>,
}

impl<L> VolumeLocationCache<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            table: RwLock::new(HashMap::new()),
        }
    }

    /// The lookup backing this cache
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Number of cached volumes
    pub fn len(&self) -> usize {
        self.read_table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_table().is_empty()
    }

    pub fn contains(&self, volume_id: VolumeId) -> bool {
        self.read_table().contains_key(&volume_id)
    }

    /// Snapshot of the strategy cached for a volume
    pub fn strategy(&self, volume_id: VolumeId) -> Option<SelectionStrategy> {
        self.read_table().get(&volume_id).cloned()
    }

    // Inserts are a single `HashMap::insert`, so a poisoned lock still guards
    // a consistent table.
    fn read_table(&self) -> RwLockReadGuard<'_, HashMap<VolumeId, SelectionStrategy>> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_table(&self) -> RwLockWriteGuard<'_, HashMap<VolumeId, SelectionStrategy>> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<L: LocationLookup> VolumeLocationCache<L> {
    /// Resolve a volume to one server address.
    ///
    /// A cached volume is answered from memory. Otherwise the master is
    /// asked once; transport and parse errors are returned unchanged, and an
    /// empty answer is [`Error::NoAvailableServer`].
    pub async fn resolve<V: ToVolumeId>(&self, volume: V) -> Result<String> {
        let volume_id = volume.to_volume_id()?;

        if let Some(address) = self.resolve_cached(volume_id) {
            tracing::debug!("Volume {} cache hit: {}", volume_id, address);
            return Ok(address);
        }

        tracing::debug!("Volume {} cache miss", volume_id);
        let locations = self.lookup.lookup(volume_id).await?;

        let Some(strategy) = SelectionStrategy::from_locations(locations) else {
            tracing::warn!("No available volume server for volume {}", volume_id);
            return Err(Error::NoAvailableServer { volume_id });
        };

        let address = strategy.pick().to_string();
        tracing::info!(
            "Caching {} location(s) for volume {}",
            strategy.addresses().len(),
            volume_id
        );
        self.write_table().insert(volume_id, strategy);

        Ok(address)
    }

    fn resolve_cached(&self, volume_id: VolumeId) -> Option<String> {
        self.read_table()
            .get(&volume_id)
            .map(|strategy| strategy.pick().to_string())
    }
}
