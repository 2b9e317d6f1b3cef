//! The zone store.
//!
//! A [`Zone`] owns an ordered index from [`CanonicalKey`] to
//! [`ZoneData`] handles, guarded by a zone-wide reader/writer lock. The
//! zone-wide lock is taken for writing only to add a new owner name or to
//! prune an emptied one; changes to a name that already exists happen under
//! that name's own lock.
//!
//! Lock order is always zone lock, then name lock.

use crate::error::{Result, ZoneError};
use crate::index::{BTreeIndex, OrderedIndex};
use crate::key::CanonicalKey;
use crate::node::{RecordRole, ZoneData};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, trace};
use zonehold_config::ZoneConfig;
use zonehold_proto::{Name, RecordType, ResourceRecord};

/// Index state guarded by the zone-wide lock.
struct ZoneIndex<I> {
    entries: I,
    /// Number of wildcard owner names in `entries`.
    wildcards: usize,
}

/// An authoritative zone held in memory.
///
/// `Zone` is `Send + Sync`; share it between threads with an `Arc`.
pub struct Zone<I = BTreeIndex<Arc<ZoneData>>> {
    origin: Name,
    state: RwLock<ZoneIndex<I>>,
}

impl Zone {
    /// Creates an empty zone, parsing the origin from presentation format.
    ///
    /// A missing trailing dot is implied.
    pub fn new(origin: &str) -> Result<Self> {
        let name = Name::from_str(origin).map_err(|source| ZoneError::InvalidOrigin {
            name: origin.to_string(),
            source,
        })?;
        Ok(Self::with_origin(name))
    }

    /// Creates an empty zone rooted at `origin`.
    pub fn with_origin(origin: Name) -> Self {
        Self::with_index(origin, BTreeIndex::new())
    }

    /// Creates an empty zone for a loaded configuration.
    pub fn from_config(config: &ZoneConfig) -> Result<Self> {
        Self::new(&config.origin)
    }
}

impl<I: OrderedIndex<Arc<ZoneData>>> Zone<I> {
    /// Creates a zone on top of a caller-supplied index.
    pub fn with_index(origin: Name, entries: I) -> Self {
        let wildcards = entries.entries().filter(|(key, _)| key.is_wildcard()).count();
        Self {
            origin,
            state: RwLock::new(ZoneIndex { entries, wildcards }),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The zone origin.
    #[inline]
    pub fn origin(&self) -> &Name {
        &self.origin
    }

    /// Number of wildcard owner names in the zone.
    pub fn wildcard(&self) -> usize {
        self.state.read().wildcards
    }

    /// Number of owner names in the zone.
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    /// Returns true if the zone holds no names.
    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// Returns true if `name` is the origin or below it.
    pub fn contains_name(&self, name: &Name) -> bool {
        name.is_subdomain_of(&self.origin)
    }

    /// Owner names in canonical order.
    pub fn names(&self) -> Vec<Name> {
        let state = self.state.read();
        let names = state
            .entries
            .entries()
            .map(|(_, node)| node.name().clone())
            .collect();
        names
    }

    /// Handles to every owner name in canonical order.
    pub fn nodes(&self) -> Vec<Arc<ZoneData>> {
        let state = self.state.read();
        let nodes = state.entries.entries().map(|(_, node)| Arc::clone(node)).collect();
        nodes
    }

    /// The apex SOA record, if present.
    pub fn soa(&self) -> Option<ResourceRecord> {
        let apex = self.find(&self.origin)?;
        let sets = apex.read();
        sets.records(RecordType::SOA).first().cloned()
    }

    // ========================================================================
    // Updates
    // ========================================================================

    /// Adds a record to the zone.
    ///
    /// Duplicates are kept. Fails without touching the zone if the owner
    /// lies outside it.
    pub fn insert(&self, record: ResourceRecord) -> Result<()> {
        if !self.contains_name(record.name()) {
            debug!(zone = %self.origin, name = %record.name(), "rejecting out-of-zone record");
            return Err(ZoneError::out_of_zone(record.name(), &self.origin));
        }

        let key = CanonicalKey::from_name(record.name());
        let role = RecordRole::classify(&record, &self.origin);

        loop {
            if let Some(node) = self.lookup(&key) {
                let mut sets = node.write();
                if sets.is_detached() {
                    // Pruned after the lookup; resolve the key again.
                    continue;
                }
                trace!(zone = %self.origin, name = %node.name(), rtype = %record.rtype(), "adding record");
                sets.add(record, role);
                return Ok(());
            }

            let state = self.state.upgradable_read();
            if state.entries.get(&key).is_some() {
                continue;
            }
            let mut state = RwLockUpgradableReadGuard::upgrade(state);

            let node = Arc::new(ZoneData::new(record.name().clone()));
            debug!(zone = %self.origin, name = %node.name(), rtype = %record.rtype(), "adding owner name");
            node.write().add(record, role);

            if key.is_wildcard() {
                state.wildcards += 1;
            }
            state.entries.insert(key, node);
            return Ok(());
        }
    }

    /// Removes every stored copy of `record` and returns how many were
    /// removed.
    ///
    /// Removing a record that is not present, including one outside the
    /// zone, is a no-op. A name left without records is dropped from the
    /// index.
    pub fn remove(&self, record: &ResourceRecord) -> usize {
        if !self.contains_name(record.name()) {
            return 0;
        }

        let key = CanonicalKey::from_name(record.name());
        let role = RecordRole::classify(record, &self.origin);

        loop {
            let Some(node) = self.lookup(&key) else {
                return 0;
            };

            let mut sets = node.write();
            if sets.is_detached() {
                continue;
            }
            let removed = sets.remove(record, role);
            let emptied = removed > 0 && sets.is_empty();
            drop(sets);

            if removed > 0 {
                trace!(zone = %self.origin, name = %node.name(), rtype = %record.rtype(), removed, "removed record");
            }
            if emptied {
                self.prune(&key, &node);
            }
            return removed;
        }
    }

    /// Drops `node` from the index if it is still indexed under `key` and
    /// still empty.
    fn prune(&self, key: &CanonicalKey, node: &Arc<ZoneData>) {
        let mut state = self.state.write();
        let indexed = state
            .entries
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, node));
        if !indexed {
            return;
        }

        let mut sets = node.write();
        if !sets.is_empty() {
            return;
        }
        sets.detach();
        state.entries.remove(key);
        if key.is_wildcard() {
            state.wildcards = state.wildcards.saturating_sub(1);
        }
        debug!(zone = %self.origin, name = %node.name(), "pruned empty owner name");
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    fn lookup(&self, key: &CanonicalKey) -> Option<Arc<ZoneData>> {
        self.state.read().entries.get(key).cloned()
    }

    /// Exact-match lookup.
    pub fn find(&self, name: &Name) -> Option<Arc<ZoneData>> {
        self.lookup(&CanonicalKey::from_name(name))
    }

    /// Exact-match lookup by presentation-format name.
    pub fn find_str(&self, name: &str) -> Result<Option<Arc<ZoneData>>> {
        Ok(self.find(&Name::from_str(name)?))
    }

    /// The name that immediately precedes `name` in canonical order.
    ///
    /// `name` itself need not be present.
    pub fn predecessor(&self, name: &Name) -> Option<Arc<ZoneData>> {
        let key = CanonicalKey::from_name(name);
        let state = self.state.read();
        state.entries.predecessor(&key).map(|(_, node)| Arc::clone(node))
    }

    /// [`predecessor`](Self::predecessor) by presentation-format name.
    pub fn predecessor_str(&self, name: &str) -> Result<Option<Arc<ZoneData>>> {
        Ok(self.predecessor(&Name::from_str(name)?))
    }

    /// The name that immediately follows `name` in canonical order.
    pub fn successor(&self, name: &Name) -> Option<Arc<ZoneData>> {
        let key = CanonicalKey::from_name(name);
        let state = self.state.read();
        state.entries.successor(&key).map(|(_, node)| Arc::clone(node))
    }

    /// The first name in canonical order, normally the apex.
    pub fn first(&self) -> Option<Arc<ZoneData>> {
        let state = self.state.read();
        state.entries.first().map(|(_, node)| Arc::clone(node))
    }
}

impl<I: OrderedIndex<Arc<ZoneData>>> fmt::Debug for Zone<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Zone")
            .field("origin", &self.origin)
            .field("names", &state.entries.len())
            .field("wildcards", &state.wildcards)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn name(s: &str) -> Name {
        Name::from_str(s).unwrap()
    }

    fn a(owner: &str, last: u8) -> ResourceRecord {
        ResourceRecord::a(name(owner), 300, Ipv4Addr::new(192, 0, 2, last))
    }

    #[test]
    fn test_invalid_origin() {
        let long = "a".repeat(64);
        assert!(matches!(
            Zone::new(&long),
            Err(ZoneError::InvalidOrigin { .. })
        ));
        assert_eq!(Zone::new("example.com").unwrap().origin(), &name("example.com."));
    }

    #[test]
    fn test_from_config() {
        let config = ZoneConfig::from_yaml("origin: Example.COM").unwrap();
        let zone = Zone::from_config(&config).unwrap();
        assert_eq!(zone.origin(), &name("example.com."));

        let bad = ZoneConfig {
            origin: "a..b".to_string(),
            ..ZoneConfig::default()
        };
        assert!(Zone::from_config(&bad).is_err());
    }

    #[test]
    fn test_insert_find() {
        let zone = Zone::new("example.com.").unwrap();
        zone.insert(a("www.example.com.", 1)).unwrap();
        zone.insert(a("WWW.example.com.", 2)).unwrap();

        let node = zone.find(&name("www.example.com")).unwrap();
        assert_eq!(node.records(RecordType::A).len(), 2);
        assert_eq!(zone.len(), 1);
        assert!(zone.find(&name("ftp.example.com")).is_none());
    }

    #[test]
    fn test_out_of_zone() {
        let zone = Zone::new("example.com.").unwrap();
        let err = zone.insert(a("www.example.org.", 1)).unwrap_err();
        assert!(matches!(err, ZoneError::OutOfZone { .. }));
        assert!(zone.is_empty());
        assert_eq!(zone.remove(&a("www.example.org.", 1)), 0);
    }

    #[test]
    fn test_remove_prunes() {
        let zone = Zone::new("example.com.").unwrap();
        let rr = a("*.example.com.", 1);
        zone.insert(rr.clone()).unwrap();
        zone.insert(rr.clone()).unwrap();
        assert_eq!(zone.wildcard(), 1);

        let held = zone.find(&name("*.example.com")).unwrap();
        assert_eq!(zone.remove(&rr), 2);
        assert!(zone.find(&name("*.example.com")).is_none());
        assert_eq!(zone.wildcard(), 0);
        assert!(held.read().is_detached());

        zone.insert(rr).unwrap();
        assert_eq!(zone.wildcard(), 1);
        assert!(!Arc::ptr_eq(&held, &zone.find(&name("*.example.com")).unwrap()));
    }

    #[test]
    fn test_with_index_counts_wildcards() {
        let zone = Zone::with_origin(name("example.com"));
        zone.insert(a("*.example.com.", 1)).unwrap();
        zone.insert(a("www.example.com.", 1)).unwrap();

        let entries: BTreeIndex<_> = zone
            .nodes()
            .into_iter()
            .map(|node| (CanonicalKey::from_name(node.name()), node))
            .collect();
        let copy = Zone::with_index(name("example.com"), entries);
        assert_eq!(copy.wildcard(), 1);
        assert_eq!(copy.len(), 2);
    }

    #[test]
    fn test_zone_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Zone>();
        assert_send_sync::<Arc<ZoneData>>();
    }
}
