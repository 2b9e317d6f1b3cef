//! Host address RDATA.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// IPv4 host address (RFC 1035).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct A(Ipv4Addr);

/// IPv6 host address (RFC 3596).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AAAA(Ipv6Addr);

impl A {
    /// Wraps an address.
    #[inline]
    pub const fn new(address: Ipv4Addr) -> Self {
        Self(address)
    }

    /// The address.
    #[inline]
    pub const fn address(&self) -> Ipv4Addr {
        self.0
    }
}

impl AAAA {
    /// Wraps an address.
    #[inline]
    pub const fn new(address: Ipv6Addr) -> Self {
        Self(address)
    }

    /// The address.
    #[inline]
    pub const fn address(&self) -> Ipv6Addr {
        self.0
    }
}

impl From<Ipv4Addr> for A {
    fn from(address: Ipv4Addr) -> Self {
        Self(address)
    }
}

impl From<Ipv6Addr> for AAAA {
    fn from(address: Ipv6Addr) -> Self {
        Self(address)
    }
}

impl fmt::Display for A {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for AAAA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
