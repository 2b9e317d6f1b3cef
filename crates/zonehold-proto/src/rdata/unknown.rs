//! RDATA kept as opaque bytes.

use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};
use std::fmt;

/// RDATA of a type this crate has no model for.
///
/// Displays in the generic `\# <length> <hex>` form of RFC 3597.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unknown {
    rtype: u16,
    data: Box<[u8]>,
}

impl Unknown {
    /// Keeps `data` as the RDATA of type number `rtype`.
    pub fn new(rtype: u16, data: impl Into<Vec<u8>>) -> Self {
        Self {
            rtype,
            data: data.into().into_boxed_slice(),
        }
    }

    /// The type number the data belongs to.
    #[inline]
    pub const fn type_code(&self) -> u16 {
        self.rtype
    }

    /// The raw bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for Unknown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\\# ")?;
        if self.data.is_empty() {
            return f.write_str("0");
        }
        write!(f, "{} {}", self.data.len(), HEXLOWER.encode(&self.data))
    }
}
