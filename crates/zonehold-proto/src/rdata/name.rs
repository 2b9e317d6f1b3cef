//! RDATA that points at another name: NS, CNAME, PTR, DNAME and MX.

use crate::name::Name;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a record whose RDATA is a single domain name.
macro_rules! name_target {
    ($(#[$doc:meta])* $rtype:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $rtype(Name);

        impl $rtype {
            /// Wraps the target name.
            #[inline]
            pub fn new(target: Name) -> Self {
                Self(target)
            }

            /// The name this record points at.
            #[inline]
            pub fn target(&self) -> &Name {
                &self.0
            }
        }

        impl From<Name> for $rtype {
            fn from(target: Name) -> Self {
                Self(target)
            }
        }

        impl fmt::Display for $rtype {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

name_target! {
    /// Authoritative server for the owner (RFC 1035).
    ///
    /// Below the zone apex an NS RRset marks a delegation point.
    NS
}

name_target! {
    /// Alias for the owner (RFC 1035).
    CNAME
}

name_target! {
    /// Reverse-mapping pointer (RFC 1035).
    PTR
}

name_target! {
    /// Redirection of the subtree below the owner (RFC 6672).
    DNAME
}

impl NS {
    /// The name server host; same as [`NS::target`].
    #[inline]
    pub fn nsdname(&self) -> &Name {
        &self.0
    }
}

/// Mail exchange for the owner (RFC 1035).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MX {
    preference: u16,
    exchange: Name,
}

impl MX {
    /// Builds an MX; lower preference wins.
    #[inline]
    pub fn new(preference: u16, exchange: Name) -> Self {
        Self {
            preference,
            exchange,
        }
    }

    /// The preference value.
    #[inline]
    pub const fn preference(&self) -> u16 {
        self.preference
    }

    /// The mail host.
    #[inline]
    pub fn exchange(&self) -> &Name {
        &self.exchange
    }
}

impl fmt::Display for MX {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.preference, self.exchange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn name(s: &str) -> Name {
        Name::from_str(s).unwrap()
    }

    #[test]
    fn test_targets_display_absolute() {
        assert_eq!(CNAME::new(name("alias.example")).to_string(), "alias.example.");
        assert_eq!(
            MX::new(10, name("mail.example.com")).to_string(),
            "10 mail.example.com."
        );
    }

    #[test]
    fn test_target_equality_ignores_case() {
        assert_eq!(NS::new(name("NS1.example.com")), NS::from(name("ns1.EXAMPLE.com.")));
        assert_ne!(PTR::new(name("a.example")), PTR::new(name("b.example")));
    }
}
