//! Single name labels.

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

/// One label of a name, borrowed from its owner.
///
/// Holds raw octets: a label may contain a dot or any other byte, and only
/// its presentation form escapes them. Comparison ignores ASCII case.
#[derive(Clone, Copy)]
pub struct Label<'a>(&'a [u8]);

impl<'a> Label<'a> {
    /// Views raw label octets.
    #[inline]
    pub const fn from_bytes(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }

    /// The raw octets.
    #[inline]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    /// Length in octets.
    #[inline]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for a zero-length label.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true for `*`.
    #[inline]
    pub fn is_wildcard(&self) -> bool {
        self.0 == b"*"
    }

    /// Compares as lowercased octet strings (RFC 4034 section 6.1), so a
    /// label sorts before any longer label it is a prefix of.
    pub fn cmp_canonical(&self, other: &Label<'_>) -> Ordering {
        let theirs = other.0.iter().map(u8::to_ascii_lowercase);
        self.0.iter().map(u8::to_ascii_lowercase).cmp(theirs)
    }
}

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in self.0 {
            let special = matches!(byte, b'.' | b'\\' | b'"' | b'(' | b')' | b';' | b'@' | b'$');
            if special {
                write!(f, "\\{}", char::from(byte))?;
            } else if byte.is_ascii_graphic() {
                fmt::Write::write_char(f, char::from(byte))?;
            } else {
                write!(f, "\\{byte:03}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Label").field(&format_args!("{self}")).finish()
    }
}

impl PartialEq for Label<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(other.0)
    }
}

impl Eq for Label<'_> {}

impl PartialOrd for Label<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_canonical(other)
    }
}

/// Walks length-prefixed label data, leftmost label first.
///
/// Stops at a zero length byte, at the end of the data, or at a length
/// byte that runs past the end.
#[derive(Clone)]
pub struct LabelIter<'a> {
    rest: &'a [u8],
}

impl<'a> LabelIter<'a> {
    pub(crate) fn new(packed: &'a [u8]) -> Self {
        Self { rest: packed }
    }
}

impl<'a> Iterator for LabelIter<'a> {
    type Item = Label<'a>;

    fn next(&mut self) -> Option<Label<'a>> {
        let (&len, tail) = self.rest.split_first()?;
        let label = tail.get(..usize::from(len)).filter(|l| !l.is_empty());
        match label {
            Some(label) => {
                self.rest = &tail[label.len()..];
                Some(Label(label))
            }
            None => {
                self.rest = &[];
                None
            }
        }
    }
}

impl FusedIterator for LabelIter<'_> {}
