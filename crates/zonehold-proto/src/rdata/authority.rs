//! Zone apex data: SOA.

use crate::name::Name;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Start of authority (RFC 1035).
///
/// Every zone carries exactly one at its apex. The five counters are held in
/// presentation order: serial, refresh, retry, expire, minimum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SOA {
    mname: Name,
    rname: Name,
    counters: [u32; 5],
}

impl SOA {
    /// Builds an SOA from its seven presentation fields.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mname: Name,
        rname: Name,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    ) -> Self {
        Self {
            mname,
            rname,
            counters: [serial, refresh, retry, expire, minimum],
        }
    }

    /// The primary server.
    #[inline]
    pub fn mname(&self) -> &Name {
        &self.mname
    }

    /// The responsible mailbox, local part in the first label.
    #[inline]
    pub fn rname(&self) -> &Name {
        &self.rname
    }

    /// The zone serial.
    #[inline]
    pub const fn serial(&self) -> u32 {
        self.counters[0]
    }

    /// Seconds between secondary refreshes.
    #[inline]
    pub const fn refresh(&self) -> u32 {
        self.counters[1]
    }

    /// Seconds between failed refresh retries.
    #[inline]
    pub const fn retry(&self) -> u32 {
        self.counters[2]
    }

    /// Seconds until a secondary stops answering.
    #[inline]
    pub const fn expire(&self) -> u32 {
        self.counters[3]
    }

    /// The negative caching TTL.
    ///
    /// NSEC records are published with the smaller of this and the SOA's own
    /// TTL (RFC 4035 section 2.3, RFC 9077).
    #[inline]
    pub const fn minimum(&self) -> u32 {
        self.counters[4]
    }

    /// Compares two serials with RFC 1982 arithmetic.
    ///
    /// Returns `None` when the two are exactly half the number space apart,
    /// where the ordering is undefined.
    pub fn compare_serials(a: u32, b: u32) -> Option<Ordering> {
        match a.wrapping_sub(b) {
            0 => Some(Ordering::Equal),
            0x8000_0000 => None,
            diff if diff < 0x8000_0000 => Some(Ordering::Greater),
            _ => Some(Ordering::Less),
        }
    }
}

impl fmt::Display for SOA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mname, self.rname)?;
        for counter in self.counters {
            write!(f, " {counter}")?;
        }
        Ok(())
    }
}
