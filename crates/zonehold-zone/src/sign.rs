//! Zone signing.
//!
//! [`Zone::sign`] prepares everything a DNSSEC signer needs: it validates the
//! policy and key set, publishes the keys at the apex, fixes the signature
//! validity window and walks the zone in canonical order, pairing every
//! authoritative name with the next one so an NSEC chain can be built. The
//! cryptography itself lives behind [`ZoneSigner`].
//!
//! Names below a zone cut are occluded: they are neither signed nor part of
//! the NSEC chain.

use crate::error::{Result, ZoneError};
use crate::index::OrderedIndex;
use crate::node::{RecordRole, RecordSets, ZoneData};
use crate::zone::Zone;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use zonehold_config::SignatureConfig;
use zonehold_proto::rdata::DNSKEY;
use zonehold_proto::{Name, RecordType, ResourceRecord, Type};

/// Negative-caching TTL used for NSEC records when the SOA says nothing.
const DEFAULT_NSEC_TTL: u32 = 3600;

// ============================================================================
// Signing Inputs
// ============================================================================

/// DNSKEY records split by role.
#[derive(Debug, Clone, Default)]
pub struct SigningKeys {
    key_signing: Vec<ResourceRecord>,
    zone_signing: Vec<ResourceRecord>,
}

impl SigningKeys {
    /// Splits validated DNSKEY records by their SEP flag.
    fn split(keys: &[ResourceRecord]) -> Self {
        let mut split = Self::default();
        for key in keys {
            if key.rdata().as_dnskey().is_some_and(DNSKEY::is_sep) {
                split.key_signing.push(key.clone());
            } else {
                split.zone_signing.push(key.clone());
            }
        }
        split
    }

    /// Keys with the SEP flag, used for the apex DNSKEY RRset.
    pub fn key_signing(&self) -> &[ResourceRecord] {
        &self.key_signing
    }

    /// Keys for every other RRset.
    ///
    /// Falls back to the key-signing keys when the set has no separate
    /// zone-signing key.
    pub fn zone_signing(&self) -> &[ResourceRecord] {
        if self.zone_signing.is_empty() {
            &self.key_signing
        } else {
            &self.zone_signing
        }
    }

    /// Keys that should sign an RRset of `rtype`.
    pub fn for_type(&self, rtype: Type) -> &[ResourceRecord] {
        if rtype.is(RecordType::DNSKEY) && !self.key_signing.is_empty() {
            &self.key_signing
        } else {
            self.zone_signing()
        }
    }

    /// Every key.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.key_signing.iter().chain(&self.zone_signing)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.key_signing.len() + self.zone_signing.len()
    }

    /// Returns true if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Inception and expiration of the signatures made in one signing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SigningWindow {
    /// Start of validity.
    pub inception: DateTime<Utc>,
    /// End of validity.
    pub expiration: DateTime<Utc>,
}

impl SigningWindow {
    /// Computes the window for signatures made at `now`.
    ///
    /// # Errors
    ///
    /// Fails if either end of the window is not a representable time.
    pub fn from_config(config: &SignatureConfig, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            inception: config.inception(now)?,
            expiration: config.expiration(now)?,
        })
    }

    /// Inception as an RRSIG timestamp.
    pub fn inception_serial(&self) -> u32 {
        to_serial(self.inception)
    }

    /// Expiration as an RRSIG timestamp.
    pub fn expiration_serial(&self) -> u32 {
        to_serial(self.expiration)
    }
}

/// Converts a time to a 32-bit RRSIG timestamp (seconds modulo 2^32).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_serial(time: DateTime<Utc>) -> u32 {
    time.timestamp().rem_euclid(1 << 32) as u32
}

/// Resolves an RRSIG timestamp to the time closest to `now` (RFC 4034
/// section 3.1.5).
#[allow(clippy::cast_possible_wrap)]
fn from_serial(serial: u32, now: DateTime<Utc>) -> DateTime<Utc> {
    let offset = serial.wrapping_sub(to_serial(now)) as i32;
    now + TimeDelta::seconds(i64::from(offset))
}

/// Everything a signer sees for one owner name.
#[derive(Debug)]
pub struct NodeContext<'a> {
    /// Zone origin, the signer name of every RRSIG.
    pub origin: &'a Name,
    /// Owner name being signed.
    pub name: &'a Name,
    /// Next authoritative name in canonical order, wrapping to the apex.
    pub next: &'a Name,
    /// The records at `name`.
    pub records: &'a RecordSets,
    /// Keys to sign with.
    pub keys: &'a SigningKeys,
    /// Validity window for new signatures.
    pub window: SigningWindow,
    /// TTL for the NSEC record.
    pub nsec_ttl: u32,
}

impl NodeContext<'_> {
    /// Returns true at the zone apex.
    pub fn is_apex(&self) -> bool {
        self.name == self.origin
    }

    /// Returns true at a zone cut.
    pub fn is_delegation(&self) -> bool {
        self.records.is_non_authoritative()
    }

    /// Types whose RRsets need signatures.
    ///
    /// At a zone cut only DS is authoritative. NSEC is left out since the
    /// signer produces it afresh.
    pub fn signable_types(&self) -> Vec<Type> {
        self.records
            .types()
            .into_iter()
            .filter(|t| !t.is(RecordType::NSEC))
            .filter(|t| {
                !self.is_delegation() || t.as_known().is_some_and(RecordType::is_signed_at_delegation)
            })
            .collect()
    }

    /// Types the NSEC bitmap must list.
    pub fn nsec_types(&self) -> Vec<Type> {
        let mut types: Vec<Type> = self
            .records
            .types()
            .into_iter()
            .filter(|t| !t.is(RecordType::NSEC))
            .collect();
        types.push(Type::Known(RecordType::RRSIG));
        types.push(Type::Known(RecordType::NSEC));
        types.sort_unstable_by_key(|t| t.to_u16());
        types
    }
}

/// What a signer returns for one owner name.
#[derive(Debug, Clone, Default)]
pub struct NodeSignatures {
    /// RRSIGs replacing every signature at the name.
    pub signatures: Vec<ResourceRecord>,
    /// NSEC record for the name.
    pub nsec: Option<ResourceRecord>,
}

/// Produces DNSSEC signatures for a zone.
///
/// Implementations hold the private keys matching [`SigningKeys`].
pub trait ZoneSigner {
    /// Signs the RRsets at one owner name and builds its NSEC record.
    fn sign_node(&self, ctx: &NodeContext<'_>) -> Result<NodeSignatures>;
}

impl<S: ZoneSigner + ?Sized> ZoneSigner for &S {
    fn sign_node(&self, ctx: &NodeContext<'_>) -> Result<NodeSignatures> {
        (**self).sign_node(ctx)
    }
}

/// Summary of a signing pass.
#[derive(Debug, Clone, Serialize)]
pub struct SignReport {
    /// Names handed to the signer.
    pub names_signed: usize,
    /// Names skipped below zone cuts.
    pub names_occluded: usize,
    /// RRSIG records stored.
    pub signatures: usize,
    /// NSEC records stored.
    pub nsec_records: usize,
    /// DNSKEY records added to the apex.
    pub keys_added: usize,
    /// Validity window used.
    pub window: SigningWindow,
}

// ============================================================================
// Signing Walk
// ============================================================================

impl<I: OrderedIndex<Arc<ZoneData>>> Zone<I> {
    /// Signs the zone with `keys`, using `config` or the default policy.
    ///
    /// Every name is signed before anything is stored. If the policy, the
    /// keys, the signer or its output is rejected, the zone is left as it
    /// was.
    pub fn sign<S: ZoneSigner>(
        &self,
        keys: &[ResourceRecord],
        config: Option<&SignatureConfig>,
        signer: &S,
    ) -> Result<SignReport> {
        self.sign_at(keys, config, signer, Utc::now())
    }

    /// Signs the zone as of `now`.
    #[instrument(skip(self, keys, config, signer), fields(zone = %self.origin()))]
    pub fn sign_at<S: ZoneSigner>(
        &self,
        keys: &[ResourceRecord],
        config: Option<&SignatureConfig>,
        signer: &S,
        now: DateTime<Utc>,
    ) -> Result<SignReport> {
        let config = config.copied().unwrap_or_default();
        config.validate()?;
        self.validate_keys(keys)?;
        let window = SigningWindow::from_config(&config, now)?;
        let keys = SigningKeys::split(keys);

        let soa = self
            .soa()
            .ok_or_else(|| ZoneError::signing("zone has no SOA record at the apex"))?;
        let nsec_ttl = soa
            .rdata()
            .as_soa()
            .map_or(DEFAULT_NSEC_TTL, |data| soa.ttl().min(data.minimum()));

        let (chain, names_occluded) = self.authoritative_chain();
        debug!(
            names = chain.len(),
            occluded = names_occluded,
            ksk = keys.key_signing().len(),
            zsk = keys.zone_signing.len(),
            "signing zone"
        );

        let mut outputs = Vec::with_capacity(chain.len());
        for (position, node) in chain.iter().enumerate() {
            let next = chain[(position + 1) % chain.len()].name();
            let sets = node.read();
            if sets.is_detached() {
                warn!(name = %node.name(), "name removed while signing");
                continue;
            }

            let apex_sets;
            let records = if node.name() == self.origin() {
                apex_sets = with_keys(&sets, &keys);
                &apex_sets
            } else {
                &*sets
            };
            let ctx = NodeContext {
                origin: self.origin(),
                name: node.name(),
                next,
                records,
                keys: &keys,
                window,
                nsec_ttl,
            };
            let output = signer.sign_node(&ctx)?;
            check_output(node.name(), &output)?;
            outputs.push((Arc::clone(node), output));
        }

        let mut report = SignReport {
            names_signed: 0,
            names_occluded,
            signatures: 0,
            nsec_records: 0,
            keys_added: self.publish_keys(&keys)?,
            window,
        };

        for (node, output) in outputs {
            let mut sets = node.write();
            if sets.is_detached() {
                warn!(name = %node.name(), "name removed while signing");
                continue;
            }
            report.names_signed += 1;
            report.signatures += output.signatures.len();
            report.nsec_records += usize::from(output.nsec.is_some());
            sets.replace_signing_output(output.signatures, output.nsec.into_iter().collect());
        }

        info!(
            names = report.names_signed,
            signatures = report.signatures,
            keys_added = report.keys_added,
            "zone signed"
        );
        Ok(report)
    }

    /// Returns true if any stored signature expires within the refresh
    /// window of `config` as of `now`.
    pub fn needs_refresh(&self, config: &SignatureConfig, now: DateTime<Utc>) -> bool {
        self.nodes().iter().any(|node| {
            node.read().iter_signatures().any(|sig| {
                sig.rdata().as_rrsig().is_some_and(|rrsig| {
                    config.needs_refresh(from_serial(rrsig.expiration(), now), now)
                })
            })
        })
    }

    fn validate_keys(&self, keys: &[ResourceRecord]) -> Result<()> {
        if keys.is_empty() {
            return Err(ZoneError::signing("no signing keys"));
        }
        for key in keys {
            let Some(dnskey) = key.rdata().as_dnskey() else {
                return Err(ZoneError::signing(format!(
                    "{} {} is not a DNSKEY record",
                    key.name(),
                    key.rtype()
                )));
            };
            if key.name() != self.origin() {
                return Err(ZoneError::signing(format!(
                    "key {} is owned by {}, not the apex",
                    dnskey.key_tag(),
                    key.name()
                )));
            }
            dnskey.validate().map_err(|err| {
                ZoneError::signing(format!("key {}: {err}", dnskey.key_tag()))
            })?;
        }
        Ok(())
    }

    /// Adds the keys missing from the apex DNSKEY RRset.
    fn publish_keys(&self, keys: &SigningKeys) -> Result<usize> {
        let published = self
            .find(self.origin())
            .map(|apex| apex.records(RecordType::DNSKEY))
            .unwrap_or_default();

        let mut added = 0;
        for key in keys.iter() {
            if !published.contains(key) {
                debug!(key_tag = key.rdata().as_dnskey().map(DNSKEY::key_tag), "publishing key");
                self.insert(key.clone())?;
                added += 1;
            }
        }
        Ok(added)
    }

    /// Authoritative names in canonical order and the number of occluded
    /// names skipped.
    fn authoritative_chain(&self) -> (Vec<Arc<ZoneData>>, usize) {
        let mut chain = Vec::new();
        let mut occluded = 0;
        let mut cut: Option<Name> = None;

        for node in self.nodes() {
            if cut.as_ref().is_some_and(|cut| node.name().is_subdomain_of(cut)) {
                occluded += 1;
                continue;
            }
            if node.is_non_authoritative() {
                cut = Some(node.name().clone());
            }
            chain.push(node);
        }
        (chain, occluded)
    }
}

/// A copy of the apex record sets with every signing key published.
fn with_keys(apex: &RecordSets, keys: &SigningKeys) -> RecordSets {
    let mut sets = apex.clone();
    for key in keys.iter() {
        if !sets.records(RecordType::DNSKEY).contains(key) {
            sets.add(key.clone(), RecordRole::Plain(Type::Known(RecordType::DNSKEY)));
        }
    }
    sets
}

/// Rejects signer output that does not belong at `name`.
fn check_output(name: &Name, output: &NodeSignatures) -> Result<()> {
    for sig in &output.signatures {
        if sig.name() != name || sig.covered_type().is_none() {
            return Err(ZoneError::signing(format!(
                "signer returned {} {} for {name}",
                sig.name(),
                sig.rtype()
            )));
        }
    }
    if let Some(nsec) = &output.nsec {
        if nsec.name() != name || !nsec.rtype().is(RecordType::NSEC) {
            return Err(ZoneError::signing(format!(
                "signer returned {} {} as NSEC for {name}",
                nsec.name(),
                nsec.rtype()
            )));
        }
    }
    Ok(())
}
