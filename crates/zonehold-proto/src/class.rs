//! Record classes.
//!
//! A zone holds records of one class, nearly always IN, so the class is kept
//! as its bare number with named constants for the registered values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A record class number (RFC 1035 section 3.2.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Class(u16);

impl Class {
    /// The Internet.
    pub const IN: Self = Self(1);
    /// Chaosnet.
    pub const CH: Self = Self(3);
    /// Hesiod.
    pub const HS: Self = Self(4);

    /// Wraps a class number.
    #[inline]
    pub const fn from_u16(value: u16) -> Self {
        Self(value)
    }

    /// The class number.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        self.0
    }

    /// The registered mnemonic, if any.
    pub const fn mnemonic(self) -> Option<&'static str> {
        match self.0 {
            1 => Some("IN"),
            3 => Some("CH"),
            4 => Some("HS"),
            _ => None,
        }
    }
}

impl Default for Class {
    fn default() -> Self {
        Self::IN
    }
}

impl From<u16> for Class {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mnemonic() {
            Some(mnemonic) => f.write_str(mnemonic),
            None => write!(f, "CLASS{}", self.0),
        }
    }
}
