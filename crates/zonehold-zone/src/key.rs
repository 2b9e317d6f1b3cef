//! Canonical index keys.
//!
//! A [`CanonicalKey`] holds the labels of a domain name lowercased and in
//! reverse order, so `www.Example.COM.` becomes `com`, `example`, `www`.
//! Comparing two keys label by label as plain octet strings then yields
//! exactly the DNSSEC canonical name order of RFC 4034 section 6.1: a parent
//! sorts before all of its descendants, and a label that is a prefix of
//! another sorts first. Any ordered map keyed by [`CanonicalKey`] therefore
//! iterates a zone in canonical order.

use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use zonehold_proto::name::Label;
use zonehold_proto::Name;

/// Index key for a domain name in DNSSEC canonical order.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CanonicalKey {
    /// Lowercased labels, rightmost (closest to the root) first.
    labels: SmallVec<[Box<[u8]>; 6]>,
}

impl CanonicalKey {
    /// The key of the root name.
    pub const ROOT: Self = Self {
        labels: SmallVec::new_const(),
    };

    /// Computes the key of a name.
    pub fn from_name(name: &Name) -> Self {
        let mut labels: SmallVec<[Box<[u8]>; 6]> = name
            .labels()
            .map(|label| label.as_bytes().to_ascii_lowercase().into_boxed_slice())
            .collect();
        labels.reverse();
        Self { labels }
    }

    /// Number of labels, not counting the root.
    #[inline]
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Returns true for the key of the root name.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns true if the name's leftmost label is `*`.
    #[inline]
    pub fn is_wildcard(&self) -> bool {
        self.labels.last().is_some_and(|label| &**label == b"*")
    }

    /// Iterates over the lowercased labels, rightmost first.
    pub fn reversed_labels(&self) -> impl Iterator<Item = &[u8]> {
        self.labels.iter().map(|label| &**label)
    }

    /// Returns true if `self` is the key of `ancestor` or of a name below it.
    pub fn starts_with(&self, ancestor: &CanonicalKey) -> bool {
        self.labels.starts_with(&ancestor.labels)
    }

    /// Rebuilds the (lowercased) name this key was computed from.
    pub fn to_name(&self) -> zonehold_proto::Result<Name> {
        Name::from_labels(self.labels.iter().rev().map(|label| &**label))
    }
}

impl From<&Name> for CanonicalKey {
    fn from(name: &Name) -> Self {
        Self::from_name(name)
    }
}

impl FromStr for CanonicalKey {
    type Err = zonehold_proto::Error;

    /// Parses a presentation-format name and computes its key.
    ///
    /// Escaped dots stay inside their label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Name::from_str(s).map(|name| Self::from_name(&name))
    }
}

impl fmt::Display for CanonicalKey {
    /// Writes `.com.example.www.` for `www.example.com.`, and `.` for the
    /// root.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(".")?;
        for label in &self.labels {
            write!(f, "{}.", Label::from_bytes(label))?;
        }
        Ok(())
    }
}

impl fmt::Debug for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanonicalKey(\"{self}\")")
    }
}
