//! TXT RDATA.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt::{self, Write as _};

/// Longest single character-string.
const CHUNK: usize = 255;

/// One or more character-strings (RFC 1035).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TXT {
    chunks: SmallVec<[Box<[u8]>; 1]>,
}

impl TXT {
    /// Builds a TXT from explicit character-strings.
    ///
    /// # Errors
    ///
    /// Fails if any string is longer than 255 bytes or none is given.
    pub fn new<I, S>(strings: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut chunks = SmallVec::new();
        for s in strings {
            let s = s.as_ref();
            if s.len() > CHUNK {
                return Err(Error::invalid_rdata(
                    "TXT",
                    format!("{}-byte string does not fit a character-string", s.len()),
                ));
            }
            chunks.push(Box::from(s));
        }
        if chunks.is_empty() {
            return Err(Error::invalid_rdata("TXT", "at least one string is required"));
        }
        Ok(Self { chunks })
    }

    /// Builds a TXT from one run of text, cut into 255-byte strings.
    pub fn from_string(text: impl AsRef<[u8]>) -> Self {
        let text = text.as_ref();
        let mut chunks: SmallVec<[Box<[u8]>; 1]> = text.chunks(CHUNK).map(Box::from).collect();
        if chunks.is_empty() {
            chunks.push(Box::default());
        }
        Self { chunks }
    }

    /// The character-strings in order.
    pub fn strings(&self) -> impl Iterator<Item = &[u8]> {
        self.chunks.iter().map(AsRef::as_ref)
    }

    /// All strings joined.
    pub fn data(&self) -> Vec<u8> {
        self.chunks.concat()
    }
}

impl fmt::Display for TXT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for chunk in &self.chunks {
            write!(f, "{sep}\"")?;
            for &byte in chunk.iter() {
                match byte {
                    b'"' | b'\\' => write!(f, "\\{}", char::from(byte))?,
                    b' ' | 0x21..=0x7e => f.write_char(char::from(byte))?,
                    _ => write!(f, "\\{byte:03}")?,
                }
            }
            f.write_char('"')?;
            sep = " ";
        }
        Ok(())
    }
}
