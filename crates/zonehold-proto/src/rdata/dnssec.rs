//! DNSSEC RDATA: DNSKEY, DS, RRSIG and NSEC (RFC 4034).

use crate::error::{Error, Result};
use crate::name::Name;
use crate::rtype::Type;
use data_encoding::{BASE64, HEXUPPER};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Algorithms
// ============================================================================

/// Signing algorithms still in use for zone signing (RFC 8624).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum DnsSecAlgorithm {
    /// RSA with SHA-1; validate only.
    RsaSha1 = 5,
    /// RSA with SHA-1, NSEC3 alias; validate only.
    RsaSha1Nsec3Sha1 = 7,
    /// RSA with SHA-256.
    RsaSha256 = 8,
    /// RSA with SHA-512.
    RsaSha512 = 10,
    /// ECDSA P-256 with SHA-256.
    EcdsaP256Sha256 = 13,
    /// ECDSA P-384 with SHA-384.
    EcdsaP384Sha384 = 14,
    /// Ed25519.
    Ed25519 = 15,
    /// Ed448.
    Ed448 = 16,
}

impl DnsSecAlgorithm {
    /// Looks up an algorithm number.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// Returns true if new signatures may be made with this algorithm.
    pub const fn may_sign(self) -> bool {
        !matches!(self, Self::RsaSha1 | Self::RsaSha1Nsec3Sha1 | Self::RsaSha512)
    }
}

// ============================================================================
// DNSKEY
// ============================================================================

/// A zone's public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DNSKEY {
    flags: u16,
    protocol: u8,
    algorithm: u8,
    key: Box<[u8]>,
}

impl DNSKEY {
    /// Set on every key that signs zone data.
    pub const FLAG_ZONE_KEY: u16 = 1 << 8;
    /// Secure entry point; marks a key-signing key.
    pub const FLAG_SEP: u16 = 1;
    /// Required protocol octet.
    pub const PROTOCOL: u8 = 3;

    /// Builds a key from its four presentation fields.
    pub fn new(flags: u16, protocol: u8, algorithm: u8, key: impl Into<Vec<u8>>) -> Self {
        Self {
            flags,
            protocol,
            algorithm,
            key: key.into().into_boxed_slice(),
        }
    }

    /// The flags field.
    pub const fn flags(&self) -> u16 {
        self.flags
    }

    /// The protocol octet.
    pub const fn protocol(&self) -> u8 {
        self.protocol
    }

    /// The algorithm number.
    pub const fn algorithm(&self) -> u8 {
        self.algorithm
    }

    /// The public key bytes.
    pub fn public_key(&self) -> &[u8] {
        &self.key
    }

    /// Returns true if the key may sign zone data.
    pub const fn is_zone_key(&self) -> bool {
        self.flags & Self::FLAG_ZONE_KEY != 0
    }

    /// Returns true for a key-signing key.
    pub const fn is_sep(&self) -> bool {
        self.flags & Self::FLAG_SEP != 0
    }

    /// Computes the key tag over the RDATA (RFC 4034 appendix B).
    pub fn key_tag(&self) -> u16 {
        let [f0, f1] = self.flags.to_be_bytes();
        let rdata = [f0, f1, self.protocol, self.algorithm]
            .into_iter()
            .chain(self.key.iter().copied());

        let sum = rdata.enumerate().fold(0u32, |sum, (i, byte)| {
            let byte = u32::from(byte);
            sum + if i % 2 == 0 { byte << 8 } else { byte }
        });
        let folded = sum.wrapping_add(sum >> 16) & 0xFFFF;
        u16::try_from(folded).unwrap_or_default()
    }

    /// Checks that the key can sign a zone.
    ///
    /// # Errors
    ///
    /// Fails on a protocol other than 3, a missing zone key flag, or an
    /// empty key.
    pub fn validate(&self) -> Result<()> {
        if self.protocol != Self::PROTOCOL {
            return Err(Error::invalid_rdata(
                "DNSKEY",
                format!("protocol {} is not 3", self.protocol),
            ));
        }
        if !self.is_zone_key() {
            return Err(Error::invalid_rdata("DNSKEY", "not a zone key"));
        }
        if self.key.is_empty() {
            return Err(Error::invalid_rdata("DNSKEY", "empty public key"));
        }
        Ok(())
    }
}

impl fmt::Display for DNSKEY {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = BASE64.encode(&self.key);
        write!(f, "{} {} {} {key}", self.flags, self.protocol, self.algorithm)
    }
}

// ============================================================================
// DS
// ============================================================================

/// Digest of a child zone's key, held at the delegation point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DS {
    key_tag: u16,
    algorithm: u8,
    digest_type: u8,
    digest: Box<[u8]>,
}

impl DS {
    /// Builds a DS from its presentation fields.
    pub fn new(key_tag: u16, algorithm: u8, digest_type: u8, digest: impl Into<Vec<u8>>) -> Self {
        Self {
            key_tag,
            algorithm,
            digest_type,
            digest: digest.into().into_boxed_slice(),
        }
    }

    /// Tag of the digested key.
    pub const fn key_tag(&self) -> u16 {
        self.key_tag
    }

    /// Algorithm of the digested key.
    pub const fn algorithm(&self) -> u8 {
        self.algorithm
    }

    /// Digest algorithm number.
    pub const fn digest_type(&self) -> u8 {
        self.digest_type
    }

    /// Digest bytes.
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }
}

impl fmt::Display for DS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digest = HEXUPPER.encode(&self.digest);
        write!(
            f,
            "{} {} {} {digest}",
            self.key_tag, self.algorithm, self.digest_type
        )
    }
}

// ============================================================================
// RRSIG
// ============================================================================

/// Signature over one RRset.
///
/// Timestamps are 32-bit serials (RFC 4034 section 3.1.5) and are compared
/// with RFC 1982 arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RRSIG {
    covered: Type,
    algorithm: u8,
    labels: u8,
    original_ttl: u32,
    expiration: u32,
    inception: u32,
    key_tag: u16,
    signer: Name,
    signature: Box<[u8]>,
}

impl RRSIG {
    /// Builds an RRSIG from its nine presentation fields.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        covered: impl Into<Type>,
        algorithm: u8,
        labels: u8,
        original_ttl: u32,
        expiration: u32,
        inception: u32,
        key_tag: u16,
        signer: Name,
        signature: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            covered: covered.into(),
            algorithm,
            labels,
            original_ttl,
            expiration,
            inception,
            key_tag,
            signer,
            signature: signature.into().into_boxed_slice(),
        }
    }

    /// The type of the signed RRset.
    pub const fn type_covered(&self) -> Type {
        self.covered
    }

    /// The algorithm number.
    pub const fn algorithm(&self) -> u8 {
        self.algorithm
    }

    /// Labels in the signed owner, not counting root or a leading `*`.
    pub const fn labels(&self) -> u8 {
        self.labels
    }

    /// TTL of the RRset when it was signed.
    pub const fn original_ttl(&self) -> u32 {
        self.original_ttl
    }

    /// End of validity.
    pub const fn expiration(&self) -> u32 {
        self.expiration
    }

    /// Start of validity.
    pub const fn inception(&self) -> u32 {
        self.inception
    }

    /// Tag of the signing key.
    pub const fn key_tag(&self) -> u16 {
        self.key_tag
    }

    /// Owner of the signing key.
    pub fn signer(&self) -> &Name {
        &self.signer
    }

    /// Signature bytes.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Returns true if `now` lies within inception..=expiration.
    pub fn is_valid_at(&self, now: u32) -> bool {
        let not_before = now.wrapping_sub(self.inception) < 1 << 31;
        let not_after = self.expiration.wrapping_sub(now) < 1 << 31;
        not_before && not_after
    }
}

impl fmt::Display for RRSIG {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {} ",
            self.covered,
            self.algorithm,
            self.labels,
            self.original_ttl,
            self.expiration,
            self.inception,
            self.key_tag,
            self.signer,
        )?;
        f.write_str(&BASE64.encode(&self.signature))
    }
}

// ============================================================================
// NSEC
// ============================================================================

/// Link in the authenticated denial chain.
///
/// The type list is kept sorted and deduplicated; [`NSEC::type_bitmap`]
/// renders it in the window-block form of RFC 4034 section 4.1.2.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NSEC {
    next_name: Name,
    types: Vec<Type>,
}

impl NSEC {
    /// Builds an NSEC listing `types`, given in any order.
    pub fn from_types<I>(next_name: Name, types: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Type>,
    {
        let mut types: Vec<Type> = types.into_iter().map(Into::into).collect();
        types.sort_unstable_by_key(|t| t.to_u16());
        types.dedup();
        Self { next_name, types }
    }

    /// The next owner name in canonical order.
    pub fn next_name(&self) -> &Name {
        &self.next_name
    }

    /// The listed types, in ascending numeric order.
    pub fn types(&self) -> &[Type] {
        &self.types
    }

    /// Returns true if `rtype` is listed.
    pub fn covers(&self, rtype: impl Into<Type>) -> bool {
        let number = rtype.into().to_u16();
        self.types
            .binary_search_by_key(&number, |t| t.to_u16())
            .is_ok()
    }

    /// Encodes the type list as window blocks.
    pub fn type_bitmap(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut rest = self.types.as_slice();
        while let Some(first) = rest.first() {
            let [window, _] = first.to_u16().to_be_bytes();
            let split = rest
                .iter()
                .position(|t| t.to_u16().to_be_bytes()[0] != window)
                .unwrap_or(rest.len());
            let (block, tail) = rest.split_at(split);

            let mut bits = [0u8; 32];
            for rtype in block {
                let low = rtype.to_u16().to_be_bytes()[1];
                bits[usize::from(low >> 3)] |= 0x80 >> (low & 7);
            }
            let used = bits.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
            out.push(window);
            out.push(u8::try_from(used).unwrap_or(32));
            out.extend_from_slice(&bits[..used]);
            rest = tail;
        }
        out
    }
}

impl fmt::Display for NSEC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.next_name.fmt(f)?;
        self.types.iter().try_for_each(|t| write!(f, " {t}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtype::RecordType;
    use std::str::FromStr;

    #[test]
    fn test_key_tag() {
        // 0x0100 + 0x0308 + 0x0102 + 0x0304
        let key = DNSKEY::new(256, 3, 8, vec![1, 2, 3, 4]);
        assert_eq!(key.key_tag(), 0x080E);
    }

    #[test]
    fn test_key_tag_odd_length_and_carry() {
        let key = DNSKEY::new(257, 3, 13, vec![0xFF; 65]);
        let mut sum: u32 = 0x0101 + 0x030D;
        for i in 0..65 {
            sum += if i % 2 == 0 { 0xFF00 } else { 0xFF };
        }
        sum += sum >> 16;
        assert_eq!(u32::from(key.key_tag()), sum & 0xFFFF);
    }

    #[test]
    fn test_key_roles() {
        let zsk = DNSKEY::new(DNSKEY::FLAG_ZONE_KEY, 3, 13, vec![1]);
        assert!(!zsk.is_sep());
        assert!(zsk.validate().is_ok());

        let ksk = DNSKEY::new(257, 3, 13, vec![1]);
        assert!(ksk.is_sep());

        assert!(DNSKEY::new(257, 2, 13, vec![1]).validate().is_err());
        assert!(DNSKEY::new(1, 3, 13, vec![1]).validate().is_err());
        assert!(DNSKEY::new(256, 3, 13, Vec::new()).validate().is_err());
    }

    #[test]
    fn test_nsec_bitmap() {
        let nsec = NSEC::from_types(
            Name::from_str("b.example.").unwrap(),
            [
                RecordType::MX,
                RecordType::A,
                RecordType::RRSIG,
                RecordType::NSEC,
                RecordType::A,
                RecordType::CAA,
            ],
        );

        // RFC 4034 section 4.3, plus a window 1 block for CAA.
        assert_eq!(
            nsec.type_bitmap(),
            [0x00, 0x06, 0x40, 0x01, 0x00, 0x00, 0x00, 0x03, 0x01, 0x01, 0x40]
        );
        assert!(nsec.covers(RecordType::CAA));
        assert!(!nsec.covers(RecordType::AAAA));
        assert_eq!(nsec.to_string(), "b.example. A MX RRSIG NSEC CAA");
    }

    #[test]
    fn test_rrsig_validity() {
        let sig = |inception, expiration| {
            RRSIG::new(
                RecordType::A,
                13,
                2,
                3600,
                expiration,
                inception,
                1,
                Name::from_str("example.").unwrap(),
                vec![0],
            )
        };
        let plain = sig(1_000, 2_000);
        assert!(plain.is_valid_at(1_000));
        assert!(plain.is_valid_at(2_000));
        assert!(!plain.is_valid_at(999));
        assert!(!plain.is_valid_at(2_001));

        assert!(sig(u32::MAX - 100, 100).is_valid_at(5));
    }

    #[test]
    fn test_algorithms() {
        assert_eq!(DnsSecAlgorithm::from_u8(15), Some(DnsSecAlgorithm::Ed25519));
        assert_eq!(DnsSecAlgorithm::from_u8(3), None);
        assert!(DnsSecAlgorithm::EcdsaP256Sha256.may_sign());
        assert!(!DnsSecAlgorithm::RsaSha1.may_sign());
    }
}
