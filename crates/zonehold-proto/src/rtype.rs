//! DNS record types.
//!
//! [`RecordType`] names the types a zone store files and signs; every other
//! type number is carried as [`Type::Unknown`] (RFC 3597).

use crate::error::{Error, Result};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares [`RecordType`] together with its mnemonic table.
macro_rules! record_types {
    ($($(#[$doc:meta])* $variant:ident = $code:literal,)+) => {
        /// A record type with a registered mnemonic.
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            IntoPrimitive,
            TryFromPrimitive,
            Serialize,
            Deserialize,
        )]
        #[repr(u16)]
        pub enum RecordType {
            $($(#[$doc])* $variant = $code,)+
        }

        impl RecordType {
            /// Every variant, in ascending numeric order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// The presentation mnemonic, e.g. `"AAAA"`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }
        }
    };
}

record_types! {
    /// Host address (RFC 1035).
    A = 1,
    /// Authoritative name server (RFC 1035).
    NS = 2,
    /// Alias (RFC 1035).
    CNAME = 5,
    /// Start of a zone of authority (RFC 1035).
    SOA = 6,
    /// Reverse pointer (RFC 1035).
    PTR = 12,
    /// Host information (RFC 8482).
    HINFO = 13,
    /// Mail exchange (RFC 1035).
    MX = 15,
    /// Character strings (RFC 1035).
    TXT = 16,
    /// IPv6 host address (RFC 3596).
    AAAA = 28,
    /// Service location (RFC 2782).
    SRV = 33,
    /// Subtree redirection (RFC 6672).
    DNAME = 39,
    /// Delegation signer (RFC 4034).
    DS = 43,
    /// RRset signature (RFC 4034).
    RRSIG = 46,
    /// Authenticated denial of existence (RFC 4034).
    NSEC = 47,
    /// Zone public key (RFC 4034).
    DNSKEY = 48,
    /// Hashed denial of existence (RFC 5155).
    NSEC3 = 50,
    /// NSEC3 chain parameters (RFC 5155).
    NSEC3PARAM = 51,
    /// DANE certificate association (RFC 6698).
    TLSA = 52,
    /// DS published by the child (RFC 7344).
    CDS = 59,
    /// DNSKEY published by the child (RFC 7344).
    CDNSKEY = 60,
    /// Zone digest (RFC 8976).
    ZONEMD = 63,
    /// Service binding (RFC 9460).
    SVCB = 64,
    /// Service binding for HTTPS (RFC 9460).
    HTTPS = 65,
    /// Issuance authorization (RFC 8659).
    CAA = 257,
}

impl RecordType {
    /// The type number.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Looks up a type number.
    #[inline]
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// Returns true for the record types DNSSEC adds to a zone.
    #[inline]
    pub const fn is_dnssec(self) -> bool {
        matches!(
            self,
            Self::DS
                | Self::RRSIG
                | Self::NSEC
                | Self::DNSKEY
                | Self::NSEC3
                | Self::NSEC3PARAM
                | Self::CDS
                | Self::CDNSKEY
        )
    }

    /// Returns true if the parent side of a zone cut is authoritative for
    /// this type, so it is signed there (RFC 4035 section 2.2).
    #[inline]
    pub const fn is_signed_at_delegation(self) -> bool {
        matches!(self, Self::DS | Self::NSEC)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Any record type number.
///
/// Known numbers always map to [`Type::Known`], so two `Type` values
/// compare equal exactly when their numbers do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Type {
    /// A type with a mnemonic.
    Known(RecordType),
    /// Any other type number, shown as `TYPEnnn`.
    Unknown(u16),
}

impl Type {
    /// Maps a type number.
    #[inline]
    pub fn from_u16(value: u16) -> Self {
        RecordType::from_u16(value).map_or(Self::Unknown(value), Self::Known)
    }

    /// The type number.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::Known(known) => known.to_u16(),
            Self::Unknown(value) => value,
        }
    }

    /// The mnemonic type, if there is one.
    #[inline]
    pub const fn as_known(self) -> Option<RecordType> {
        match self {
            Self::Known(known) => Some(known),
            Self::Unknown(_) => None,
        }
    }

    /// Returns true if this is `rtype`.
    #[inline]
    pub fn is(self, rtype: RecordType) -> bool {
        self == Self::Known(rtype)
    }
}

impl Default for Type {
    fn default() -> Self {
        Self::Known(RecordType::A)
    }
}

impl From<RecordType> for Type {
    fn from(known: RecordType) -> Self {
        Self::Known(known)
    }
}

impl From<u16> for Type {
    fn from(value: u16) -> Self {
        Self::from_u16(value)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(known) => known.fmt(f),
            Self::Unknown(value) => write!(f, "TYPE{value}"),
        }
    }
}

impl FromStr for Type {
    type Err = Error;

    /// Accepts a mnemonic in any case, or `TYPEnnn`.
    fn from_str(s: &str) -> Result<Self> {
        let known = RecordType::ALL
            .iter()
            .copied()
            .find(|rtype| rtype.name().eq_ignore_ascii_case(s));
        if let Some(known) = known {
            return Ok(Self::Known(known));
        }

        let generic = match s.get(..4) {
            Some(prefix) if prefix.eq_ignore_ascii_case("TYPE") => s[4..].parse::<u16>().ok(),
            _ => None,
        };
        generic
            .map(Self::from_u16)
            .ok_or_else(|| Error::invalid_rdata("TYPE", format!("unknown record type '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers() {
        assert_eq!(RecordType::AAAA.to_u16(), 28);
        assert_eq!(RecordType::CAA.to_u16(), 257);
        assert_eq!(RecordType::from_u16(48), Some(RecordType::DNSKEY));
        assert_eq!(RecordType::from_u16(4), None);
    }

    #[test]
    fn test_table_is_sorted() {
        let numbers: Vec<u16> = RecordType::ALL.iter().map(|t| t.to_u16()).collect();
        let mut sorted = numbers.clone();
        sorted.sort_unstable();
        assert_eq!(numbers, sorted);
        assert_eq!(RecordType::NSEC3PARAM.name(), "NSEC3PARAM");
    }

    #[test]
    fn test_predicates() {
        assert!(RecordType::RRSIG.is_dnssec());
        assert!(!RecordType::MX.is_dnssec());
        assert!(RecordType::DS.is_signed_at_delegation());
        assert!(!RecordType::NS.is_signed_at_delegation());
    }

    #[test]
    fn test_unknown_numbers() {
        assert!(Type::from_u16(1).is(RecordType::A));
        let private = Type::from_u16(65_280);
        assert_eq!(private.as_known(), None);
        assert_eq!(private.to_string(), "TYPE65280");
        assert_eq!(Type::from(RecordType::MX).to_u16(), 15);
    }

    #[test]
    fn test_parse() {
        assert_eq!("aaaa".parse::<Type>().unwrap(), Type::Known(RecordType::AAAA));
        assert_eq!("TYPE46".parse::<Type>().unwrap(), Type::Known(RecordType::RRSIG));
        assert_eq!("type999".parse::<Type>().unwrap(), Type::Unknown(999));
        assert!("BOGUS".parse::<Type>().is_err());
        assert!("TYPE".parse::<Type>().is_err());
    }
}
