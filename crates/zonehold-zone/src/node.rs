//! Per-name record sets.
//!
//! Every owner name present in a zone has one [`ZoneData`], shared through
//! an `Arc` between the index and any reader that looked it up. Its records
//! sit behind their own lock so updates to different names never contend.

use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use zonehold_proto::{Name, RecordType, ResourceRecord, Type};

// ============================================================================
// Record Classification
// ============================================================================

/// Where a record is filed inside a [`ZoneData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordRole {
    /// RRSIG, filed under the type it covers.
    Signature {
        /// The covered type.
        covered: Type,
    },
    /// NS below the apex; marks the owner as a zone cut.
    Delegation,
    /// Any other record, filed under its own type.
    Plain(Type),
}

impl RecordRole {
    /// Classifies a record for a zone rooted at `origin`.
    pub fn classify(record: &ResourceRecord, origin: &Name) -> Self {
        if let Some(covered) = record.covered_type() {
            return Self::Signature { covered };
        }
        if record.rtype().is(RecordType::NS) && record.name() != origin {
            return Self::Delegation;
        }
        Self::Plain(record.rtype())
    }
}

// ============================================================================
// Record Sets
// ============================================================================

/// The records held at one owner name.
///
/// Obtain a consistent view through [`ZoneData::read`].
#[derive(Debug, Clone, Default)]
pub struct RecordSets {
    records: HashMap<Type, Vec<ResourceRecord>>,
    signatures: HashMap<Type, Vec<ResourceRecord>>,
    non_auth: bool,
    detached: bool,
}

impl RecordSets {
    /// Records of one type, in insertion order.
    pub fn records(&self, rtype: impl Into<Type>) -> &[ResourceRecord] {
        self.records.get(&rtype.into()).map_or(&[][..], Vec::as_slice)
    }

    /// RRSIGs covering one type, in insertion order.
    pub fn signatures(&self, covered: impl Into<Type>) -> &[ResourceRecord] {
        self.signatures.get(&covered.into()).map_or(&[][..], Vec::as_slice)
    }

    /// Types with at least one record, in ascending numeric order.
    pub fn types(&self) -> Vec<Type> {
        let mut types: Vec<Type> = self.records.keys().copied().collect();
        types.sort_unstable_by_key(|t| t.to_u16());
        types
    }

    /// Types with at least one covering RRSIG, in ascending numeric order.
    pub fn signed_types(&self) -> Vec<Type> {
        let mut types: Vec<Type> = self.signatures.keys().copied().collect();
        types.sort_unstable_by_key(|t| t.to_u16());
        types
    }

    /// Iterates over every non-signature record.
    pub fn iter_records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.records.values().flatten()
    }

    /// Iterates over every RRSIG.
    pub fn iter_signatures(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.signatures.values().flatten()
    }

    /// Returns true if the owner is a delegation point.
    #[inline]
    pub fn is_non_authoritative(&self) -> bool {
        self.non_auth
    }

    /// Number of records, signatures included.
    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum::<usize>()
            + self.signatures.values().map(Vec::len).sum::<usize>()
    }

    /// Returns true if no records or signatures remain.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.signatures.is_empty()
    }

    pub(crate) fn is_detached(&self) -> bool {
        self.detached
    }

    pub(crate) fn detach(&mut self) {
        self.detached = true;
    }

    /// Files a record. Duplicates are kept.
    pub(crate) fn add(&mut self, record: ResourceRecord, role: RecordRole) {
        match role {
            RecordRole::Signature { covered } => {
                self.signatures.entry(covered).or_default().push(record);
            }
            RecordRole::Delegation => {
                self.non_auth = true;
                self.records
                    .entry(Type::Known(RecordType::NS))
                    .or_default()
                    .push(record);
            }
            RecordRole::Plain(rtype) => {
                self.records.entry(rtype).or_default().push(record);
            }
        }
    }

    /// Removes every record equal to `record`, returning how many were
    /// dropped. Lists left empty are removed.
    pub(crate) fn remove(&mut self, record: &ResourceRecord, role: RecordRole) -> usize {
        let (map, key) = match role {
            RecordRole::Signature { covered } => (&mut self.signatures, covered),
            RecordRole::Delegation => (&mut self.records, Type::Known(RecordType::NS)),
            RecordRole::Plain(rtype) => (&mut self.records, rtype),
        };

        let Some(list) = map.get_mut(&key) else {
            return 0;
        };
        let before = list.len();
        list.retain(|existing| existing != record);
        let removed = before - list.len();
        if list.is_empty() {
            map.remove(&key);
            if role == RecordRole::Delegation {
                self.non_auth = false;
            }
        }
        removed
    }

    /// Replaces every RRSIG and the NSEC RRset.
    pub(crate) fn replace_signing_output(
        &mut self,
        signatures: Vec<ResourceRecord>,
        nsec: Vec<ResourceRecord>,
    ) {
        self.signatures.clear();
        for sig in signatures {
            if let Some(covered) = sig.covered_type() {
                self.signatures.entry(covered).or_default().push(sig);
            }
        }

        let nsec_type = Type::Known(RecordType::NSEC);
        if nsec.is_empty() {
            self.records.remove(&nsec_type);
        } else {
            self.records.insert(nsec_type, nsec);
        }
    }
}

// ============================================================================
// Zone Data
// ============================================================================

/// All records of a zone at one owner name.
pub struct ZoneData {
    name: Name,
    inner: RwLock<RecordSets>,
}

impl ZoneData {
    pub(crate) fn new(name: Name) -> Self {
        Self {
            name,
            inner: RwLock::new(RecordSets::default()),
        }
    }

    /// The owner name, with the case of the first record inserted here.
    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Locks the record sets for reading.
    ///
    /// Hold the guard briefly; writers to this name wait on it.
    pub fn read(&self) -> RwLockReadGuard<'_, RecordSets> {
        self.inner.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, RecordSets> {
        self.inner.write()
    }

    pub(crate) fn lock(&self) -> &RwLock<RecordSets> {
        &self.inner
    }

    /// Returns true if the name carries a delegation NS RRset.
    pub fn is_non_authoritative(&self) -> bool {
        self.inner.read().is_non_authoritative()
    }

    /// Copies the records of one type.
    pub fn records(&self, rtype: impl Into<Type>) -> Vec<ResourceRecord> {
        self.inner.read().records(rtype).to_vec()
    }

    /// Copies the RRSIGs covering one type.
    pub fn signatures(&self, covered: impl Into<Type>) -> Vec<ResourceRecord> {
        self.inner.read().signatures(covered).to_vec()
    }

    /// Types with at least one record.
    pub fn types(&self) -> Vec<Type> {
        self.inner.read().types()
    }

    /// Number of records, signatures included.
    pub fn record_count(&self) -> usize {
        self.inner.read().record_count()
    }

    /// Returns true if nothing is stored at this name.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl fmt::Debug for ZoneData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sets = self.inner.read();
        f.debug_struct("ZoneData")
            .field("name", &self.name)
            .field("types", &sets.types())
            .field("non_auth", &sets.non_auth)
            .field("records", &sets.record_count())
            .finish()
    }
}
