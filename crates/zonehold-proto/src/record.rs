//! Resource records.

use crate::class::Class;
use crate::name::Name;
use crate::rdata::{self, RData};
use crate::rtype::{RecordType, Type};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// One record: owner, type, class, TTL and data.
///
/// Records are values. A zone changes by inserting and removing whole
/// records, never by editing one in place. Equality covers every field, and
/// names inside it compare without regard to ASCII case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRecord {
    owner: Name,
    rtype: Type,
    class: Class,
    ttl: u32,
    data: RData,
}

/// Shorthand constructors for IN records of the modelled types.
macro_rules! shorthand {
    ($($(#[$doc:meta])* $method:ident($($arg:ident: $ty:ty),*) => $build:expr;)+) => {
        $(
            $(#[$doc])*
            pub fn $method(owner: Name, ttl: u32, $($arg: $ty),*) -> Self {
                Self::from_rdata(owner, ttl, $build)
            }
        )+
    };
}

impl ResourceRecord {
    /// Builds a record from every field.
    ///
    /// `rtype` is taken as given; a record whose type disagrees with its
    /// data is stored as such.
    pub fn new(owner: Name, rtype: Type, class: Class, ttl: u32, data: RData) -> Self {
        Self {
            owner,
            rtype,
            class,
            ttl,
            data,
        }
    }

    /// Builds an IN record typed after its data.
    pub fn from_rdata(owner: Name, ttl: u32, data: impl Into<RData>) -> Self {
        let data = data.into();
        Self::new(owner, data.record_type(), Class::IN, ttl, data)
    }

    shorthand! {
        /// An A record.
        a(address: Ipv4Addr) => rdata::A::new(address);
        /// An AAAA record.
        aaaa(address: Ipv6Addr) => rdata::AAAA::new(address);
        /// An NS record.
        ns(host: Name) => rdata::NS::new(host);
        /// A CNAME record.
        cname(target: Name) => rdata::CNAME::new(target);
        /// An MX record.
        mx(preference: u16, exchange: Name) => rdata::MX::new(preference, exchange);
        /// A TXT record, split into 255-byte strings.
        txt(text: impl AsRef<[u8]>) => rdata::TXT::from_string(text);
        /// An SOA record.
        soa(data: rdata::SOA) => data;
        /// A DNSKEY record.
        dnskey(key: rdata::DNSKEY) => key;
        /// An RRSIG record.
        rrsig(sig: rdata::RRSIG) => sig;
        /// An NSEC record.
        nsec(link: rdata::NSEC) => link;
    }

    /// The owner name.
    #[inline]
    pub fn name(&self) -> &Name {
        &self.owner
    }

    /// The type field.
    #[inline]
    pub fn rtype(&self) -> Type {
        self.rtype
    }

    /// The type field, when it has a mnemonic.
    #[inline]
    pub fn record_type(&self) -> Option<RecordType> {
        self.rtype.as_known()
    }

    /// The class.
    #[inline]
    pub fn rclass(&self) -> Class {
        self.class
    }

    /// The TTL in seconds.
    #[inline]
    pub const fn ttl(&self) -> u32 {
        self.ttl
    }

    /// The data.
    #[inline]
    pub fn rdata(&self) -> &RData {
        &self.data
    }

    /// For an RRSIG, the type it signs.
    pub fn covered_type(&self) -> Option<Type> {
        self.data.as_rrsig().map(rdata::RRSIG::type_covered)
    }

    /// Returns true for the record types DNSSEC adds.
    pub fn is_dnssec(&self) -> bool {
        self.record_type().is_some_and(RecordType::is_dnssec)
    }

    /// The same record with another TTL.
    #[must_use]
    pub fn with_ttl(&self, ttl: u32) -> Self {
        Self {
            ttl,
            ..self.clone()
        }
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            owner,
            rtype,
            class,
            ttl,
            data,
        } = self;
        write!(f, "{owner}\t{ttl}\t{class}\t{rtype}\t{data}")
    }
}
