//! Record data.
//!
//! One struct per modelled type, grouped by what the record does:
//! [`address`], [`name`] targets, [`text`], the zone apex in [`authority`]
//! and the signing types in [`dnssec`]. Anything else stays opaque as
//! [`Unknown`].

pub mod address;
pub mod authority;
pub mod dnssec;
pub mod name;
pub mod text;
pub mod unknown;

pub use address::{A, AAAA};
pub use authority::SOA;
pub use dnssec::{DNSKEY, DS, DnsSecAlgorithm, NSEC, RRSIG};
pub use name::{CNAME, DNAME, MX, NS, PTR};
pub use text::TXT;
pub use unknown::Unknown;

use crate::rtype::{RecordType, Type};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares [`RData`] with one variant per modelled record type.
///
/// Each variant is named after its type mnemonic, which is also the name of
/// its payload struct.
macro_rules! rdata_variants {
    ($($rtype:ident),+ $(,)?) => {
        /// Parsed record data.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[non_exhaustive]
        pub enum RData {
            $(
                #[doc = concat!("`", stringify!($rtype), "` data.")]
                $rtype($rtype),
            )+
            /// Data of any other type, kept as bytes.
            Unknown(Unknown),
        }

        impl RData {
            /// The type this data belongs to.
            pub fn record_type(&self) -> Type {
                match self {
                    $(Self::$rtype(_) => Type::Known(RecordType::$rtype),)+
                    Self::Unknown(opaque) => Type::from_u16(opaque.type_code()),
                }
            }
        }

        impl fmt::Display for RData {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Self::$rtype(data) => data.fmt(f),)+
                    Self::Unknown(opaque) => opaque.fmt(f),
                }
            }
        }

        $(
            impl From<$rtype> for RData {
                fn from(data: $rtype) -> Self {
                    Self::$rtype(data)
                }
            }
        )+
    };
}

rdata_variants!(A, AAAA, NS, CNAME, PTR, DNAME, MX, SOA, TXT, DNSKEY, DS, RRSIG, NSEC);

impl From<Unknown> for RData {
    fn from(opaque: Unknown) -> Self {
        Self::Unknown(opaque)
    }
}

impl RData {
    /// The signature, for RRSIG data.
    pub fn as_rrsig(&self) -> Option<&RRSIG> {
        if let Self::RRSIG(sig) = self {
            Some(sig)
        } else {
            None
        }
    }

    /// The key, for DNSKEY data.
    pub fn as_dnskey(&self) -> Option<&DNSKEY> {
        if let Self::DNSKEY(key) = self {
            Some(key)
        } else {
            None
        }
    }

    /// The apex fields, for SOA data.
    pub fn as_soa(&self) -> Option<&SOA> {
        if let Self::SOA(soa) = self {
            Some(soa)
        } else {
            None
        }
    }
}
